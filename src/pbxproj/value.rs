use std::ops::Range;

/// A string token together with where it sits in the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlistString {
    pub value: String,
    pub span: Range<usize>,
}

impl PlistString {
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

/// A `{ key = value; ... }` block. Entries keep their source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dictionary {
    pub entries: Vec<(PlistString, Value)>,
    /// Covers the opening through the closing brace
    pub span: Range<usize>,
}

impl Dictionary {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.value == key)
            .map(|(_, v)| v)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn get_dict(&self, key: &str) -> Option<&Dictionary> {
        self.get(key).and_then(Value::as_dict)
    }

    pub fn get_array(&self, key: &str) -> Option<&[Value]> {
        self.get(key).and_then(Value::as_array)
    }

    /// Byte offset of the closing `}`
    pub fn closing_brace(&self) -> usize {
        self.span.end - 1
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(PlistString),
    Array(Vec<Value>),
    Dictionary(Dictionary),
    Data(Vec<u8>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(&s.value),
            _ => None,
        }
    }

    pub fn as_string(&self) -> Option<&PlistString> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dictionary> {
        match self {
            Value::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Dictionary(_) => "dictionary",
            Value::Data(_) => "data",
        }
    }
}
