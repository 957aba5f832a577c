use super::value::{Dictionary, PlistString, Value};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input at line {line}, column {column}")]
    UnexpectedEof { line: usize, column: usize },

    #[error("unexpected character '{found}' at line {line}, column {column}, expected {expected}")]
    UnexpectedChar {
        found: char,
        expected: &'static str,
        line: usize,
        column: usize,
    },

    #[error("unterminated string starting at line {line}, column {column}")]
    UnterminatedString { line: usize, column: usize },

    #[error("unterminated comment starting at line {line}, column {column}")]
    UnterminatedComment { line: usize, column: usize },

    #[error("invalid data literal at line {line}, column {column}: {reason}")]
    InvalidData {
        reason: &'static str,
        line: usize,
        column: usize,
    },

    #[error("unexpected content after the root value at line {line}, column {column}")]
    TrailingContent { line: usize, column: usize },
}

/// Parses a complete OpenStep property list.
pub fn parse(source: &str) -> Result<Value, ParseError> {
    let mut parser = Parser::new(source);
    let value = parser.parse_value()?;
    parser.skip_trivia()?;
    if parser.pos < parser.bytes.len() {
        let (line, column) = parser.location(parser.pos);
        return Err(ParseError::TrailingContent { line, column });
    }
    Ok(value)
}

fn is_unquoted_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'+' | b'/' | b':' | b'.' | b'-')
}

struct Parser<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
        }
    }

    /// 1-based line and column of a byte offset
    fn location(&self, offset: usize) -> (usize, usize) {
        let before = &self.src[..offset.min(self.src.len())];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn eof_error(&self) -> ParseError {
        let (line, column) = self.location(self.pos);
        ParseError::UnexpectedEof { line, column }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let found = self.src[self.pos..].chars().next().unwrap_or('\0');
        let (line, column) = self.location(self.pos);
        ParseError::UnexpectedChar {
            found,
            expected,
            line,
            column,
        }
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        loop {
            match self.peek() {
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.bytes.get(self.pos + 1) == Some(&b'*') => {
                    let start = self.pos;
                    match self.src[self.pos + 2..].find("*/") {
                        Some(end) => self.pos += 2 + end + 2,
                        None => {
                            let (line, column) = self.location(start);
                            return Err(ParseError::UnterminatedComment { line, column });
                        }
                    }
                }
                Some(b'/') if self.bytes.get(self.pos + 1) == Some(&b'/') => {
                    match self.src[self.pos..].find('\n') {
                        Some(end) => self.pos += end + 1,
                        None => self.pos = self.bytes.len(),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, byte: u8, expected: &'static str) -> Result<(), ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b) if b == byte => {
                self.pos += 1;
                Ok(())
            }
            Some(_) => Err(self.unexpected(expected)),
            None => Err(self.eof_error()),
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b'{') => self.parse_dictionary().map(Value::Dictionary),
            Some(b'(') => self.parse_array().map(Value::Array),
            Some(b'<') => self.parse_data().map(Value::Data),
            Some(b'"') | Some(b'\'') => self.parse_quoted().map(Value::String),
            Some(b) if is_unquoted_byte(b) => Ok(Value::String(self.parse_unquoted())),
            Some(_) => Err(self.unexpected("a value")),
            None => Err(self.eof_error()),
        }
    }

    fn parse_key(&mut self) -> Result<PlistString, ParseError> {
        match self.peek() {
            Some(b'"') | Some(b'\'') => self.parse_quoted(),
            Some(b) if is_unquoted_byte(b) => Ok(self.parse_unquoted()),
            Some(_) => Err(self.unexpected("a dictionary key or '}'")),
            None => Err(self.eof_error()),
        }
    }

    fn parse_dictionary(&mut self) -> Result<Dictionary, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut entries = Vec::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b'}') {
                self.pos += 1;
                break;
            }
            let key = self.parse_key()?;
            self.expect(b'=', "'='")?;
            let value = self.parse_value()?;
            self.expect(b';', "';'")?;
            entries.push((key, value));
        }

        Ok(Dictionary {
            entries,
            span: start..self.pos,
        })
    }

    fn parse_array(&mut self) -> Result<Vec<Value>, ParseError> {
        self.pos += 1;
        let mut items = Vec::new();

        loop {
            self.skip_trivia()?;
            if self.peek() == Some(b')') {
                self.pos += 1;
                return Ok(items);
            }
            items.push(self.parse_value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {}
                Some(_) => return Err(self.unexpected("',' or ')'")),
                None => return Err(self.eof_error()),
            }
        }
    }

    fn parse_unquoted(&mut self) -> PlistString {
        let start = self.pos;
        while self.peek().map_or(false, is_unquoted_byte) {
            self.pos += 1;
        }
        PlistString {
            value: self.src[start..self.pos].to_string(),
            span: start..self.pos,
        }
    }

    fn parse_quoted(&mut self) -> Result<PlistString, ParseError> {
        let start = self.pos;
        let delimiter = self.bytes[start] as char;
        let unterminated = || {
            let (line, column) = self.location(start);
            ParseError::UnterminatedString { line, column }
        };

        let mut value = String::new();
        let mut chars = self.src[start + 1..].char_indices().peekable();

        let end = loop {
            let Some((offset, c)) = chars.next() else {
                return Err(unterminated());
            };
            if c == delimiter {
                break start + 1 + offset + 1;
            }
            if c != '\\' {
                value.push(c);
                continue;
            }

            let Some((_, escaped)) = chars.next() else {
                return Err(unterminated());
            };
            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                'a' => value.push('\u{7}'),
                'b' => value.push('\u{8}'),
                'f' => value.push('\u{c}'),
                'v' => value.push('\u{b}'),
                'U' => {
                    let mut code = 0u32;
                    for _ in 0..4 {
                        match chars.peek().and_then(|(_, c)| c.to_digit(16)) {
                            Some(digit) => {
                                code = code * 16 + digit;
                                chars.next();
                            }
                            None => break,
                        }
                    }
                    value.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                '0'..='7' => {
                    let mut code = escaped.to_digit(8).unwrap_or(0);
                    for _ in 0..2 {
                        match chars.peek().and_then(|(_, c)| c.to_digit(8)) {
                            Some(digit) => {
                                code = code * 8 + digit;
                                chars.next();
                            }
                            None => break,
                        }
                    }
                    value.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
                }
                other => value.push(other),
            }
        };

        self.pos = end;
        Ok(PlistString {
            value,
            span: start..end,
        })
    }

    fn parse_data(&mut self) -> Result<Vec<u8>, ParseError> {
        let start = self.pos;
        self.pos += 1;
        let mut digits = Vec::new();

        loop {
            match self.peek() {
                Some(b'>') => {
                    self.pos += 1;
                    break;
                }
                Some(b) if b.is_ascii_whitespace() => self.pos += 1,
                Some(b) if b.is_ascii_hexdigit() => {
                    digits.push(b);
                    self.pos += 1;
                }
                Some(_) => {
                    let (line, column) = self.location(self.pos);
                    return Err(ParseError::InvalidData {
                        reason: "non-hex character",
                        line,
                        column,
                    });
                }
                None => return Err(self.eof_error()),
            }
        }

        if digits.len() % 2 != 0 {
            let (line, column) = self.location(start);
            return Err(ParseError::InvalidData {
                reason: "odd number of hex digits",
                line,
                column,
            });
        }

        Ok(digits
            .chunks(2)
            .map(|pair| (hex_value(pair[0]) << 4) | hex_value(pair[1]))
            .collect())
    }
}

fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL_PROJECT: &str = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	classes = {
	};
	objectVersion = 56;
	objects = {

/* Begin PBXShellScriptBuildPhase section */
		AA0000000000000000000001 /* Run Script */ = {
			isa = PBXShellScriptBuildPhase;
			buildActionMask = 2147483647;
			files = (
			);
			inputPaths = (
			);
			name = "Run Script";
			runOnlyForDeploymentPostprocessing = 0;
			shellPath = /bin/sh;
			shellScript = "echo \"hello\"\n";
		};
/* End PBXShellScriptBuildPhase section */
	};
	rootObject = AA0000000000000000000009 /* Project object */;
}
"#;

    #[test]
    fn test_parse_project_skeleton() {
        let root = parse(SMALL_PROJECT).unwrap();
        let root = root.as_dict().unwrap();
        assert_eq!(root.get_str("archiveVersion"), Some("1"));
        assert_eq!(root.get_str("rootObject"), Some("AA0000000000000000000009"));
        assert!(root.get_dict("classes").unwrap().is_empty());

        let objects = root.get_dict("objects").unwrap();
        assert_eq!(objects.len(), 1);
        let phase = objects.get_dict("AA0000000000000000000001").unwrap();
        assert_eq!(phase.get_str("isa"), Some("PBXShellScriptBuildPhase"));
        assert_eq!(phase.get_str("name"), Some("Run Script"));
        assert_eq!(phase.get_str("shellPath"), Some("/bin/sh"));
        assert_eq!(phase.get_str("shellScript"), Some("echo \"hello\"\n"));
        assert_eq!(phase.get_array("files").map(|f| f.len()), Some(0));
    }

    #[test]
    fn test_string_span_covers_token() {
        let root = parse(SMALL_PROJECT).unwrap();
        let phase = root
            .as_dict()
            .and_then(|r| r.get_dict("objects"))
            .and_then(|o| o.get_dict("AA0000000000000000000001"))
            .unwrap();
        let script = phase.get("shellScript").and_then(Value::as_string).unwrap();
        assert_eq!(&SMALL_PROJECT[script.span.clone()], r#""echo \"hello\"\n""#);
        assert_eq!(&SMALL_PROJECT[phase.closing_brace()..phase.closing_brace() + 1], "}");
    }

    #[test]
    fn test_parse_array_with_trailing_comma() {
        let value = parse("( a, \"b c\", d, )").unwrap();
        let items: Vec<&str> = value
            .as_array()
            .unwrap()
            .iter()
            .filter_map(Value::as_str)
            .collect();
        assert_eq!(items, vec!["a", "b c", "d"]);
    }

    #[test]
    fn test_parse_escapes() {
        let value = parse(r#""tab\there \U00e9 \101 \q""#).unwrap();
        assert_eq!(value.as_str(), Some("tab\there é A q"));
    }

    #[test]
    fn test_parse_single_quoted() {
        let value = parse("'it''s'").err();
        assert!(matches!(value, Some(ParseError::TrailingContent { .. })));
        assert_eq!(parse("'quoted'").unwrap().as_str(), Some("quoted"));
    }

    #[test]
    fn test_parse_data() {
        let value = parse("<0fA1 ff>").unwrap();
        assert_eq!(value, Value::Data(vec![0x0f, 0xa1, 0xff]));
    }

    #[test]
    fn test_parse_data_odd_digits() {
        let err = parse("<abc>").unwrap_err();
        assert!(matches!(err, ParseError::InvalidData { .. }));
    }

    #[test]
    fn test_unterminated_string_reports_location() {
        let err = parse("{\n  key = \"never closed;\n}").unwrap_err();
        assert_eq!(err, ParseError::UnterminatedString { line: 2, column: 9 });
    }

    #[test]
    fn test_unterminated_comment() {
        let err = parse("/* open { }").unwrap_err();
        assert!(matches!(err, ParseError::UnterminatedComment { line: 1, column: 1 }));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("{ a = b }").unwrap_err();
        match err {
            ParseError::UnexpectedChar { found, expected, .. } => {
                assert_eq!(found, '}');
                assert_eq!(expected, "';'");
            }
            other => panic!("Expected UnexpectedChar, got {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_eof() {
        let err = parse("{ a = (b, c").unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse("  // nothing\n").unwrap_err(), ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_error_message_mentions_position() {
        let err = parse("{ a = ; }").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("line 1"));
        assert!(message.contains("column 7"));
    }
}
