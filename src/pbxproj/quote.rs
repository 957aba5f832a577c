/// Renders `s` as a double-quoted plist string token.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\U{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pbxproj::parse;

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote("echo hello"), "\"echo hello\"");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(
            quote("echo \"a\\b\"\n\tdone"),
            r#""echo \"a\\b\"\n\tdone""#
        );
    }

    #[test]
    fn test_quote_control_chars() {
        assert_eq!(quote("\u{1b}[0m"), "\"\\U001b[0m\"");
    }

    #[test]
    fn test_quoted_text_parses_back() {
        let samples = [
            "",
            "start_time=$(date +%s)\necho \"[time] Starting phase Run Script\"\n",
            "if [ \"$CONFIGURATION\" == \"Release\" ]; then\n\texit 0\nfi\r\n",
            "echo 'single' \\ backslash ünïcödé \u{7}",
        ];
        for sample in samples {
            let parsed = parse(&quote(sample)).unwrap();
            assert_eq!(parsed.as_str(), Some(sample));
        }
    }
}
