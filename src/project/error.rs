use crate::pbxproj::ParseError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("Failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{path:?}: missing '{key}' in {context}")]
    MissingKey {
        path: PathBuf,
        key: &'static str,
        context: String,
    },

    #[error("{path:?}: expected '{key}' to be a {expected}, found a {found}")]
    UnexpectedType {
        path: PathBuf,
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{path:?}: object {id} referenced by {context} does not exist")]
    DanglingReference {
        path: PathBuf,
        id: String,
        context: String,
    },

    #[error("{path:?}: {id} is not a shell script build phase")]
    NotShellScriptPhase { path: PathBuf, id: String },
}
