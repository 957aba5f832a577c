//! Reader for the OpenStep property-list format used by `project.pbxproj`
//!
//! Parsing keeps the byte span of every string token and dictionary so callers
//! can splice replacement tokens into the original text without reformatting
//! anything they did not touch.

mod parser;
mod quote;
mod value;

pub use parser::{parse, ParseError};
pub use quote::quote;
pub use value::{Dictionary, PlistString, Value};
