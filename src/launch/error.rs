use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed launch description `{path}`: {message}")]
    Xml { path: PathBuf, message: String },

    #[error("invalid predicate `{expression}`: {message}")]
    Predicate { expression: String, message: String },

    #[error("`<{tag}>` entry in `{path}` has no `{attribute}` attribute")]
    MissingAttribute {
        path: PathBuf,
        tag: String,
        attribute: &'static str,
    },

    #[error("no {what} entry in `{path}` matches robot `{robot}`")]
    NoMatch {
        what: &'static str,
        path: PathBuf,
        robot: String,
    },

    #[error("`{variable}` is not assigned in `{path}`")]
    MissingVariable { variable: String, path: PathBuf },

    #[error("`{variable}` is assigned more than once in `{path}` (lines {first} and {second})")]
    DuplicateVariable {
        variable: String,
        path: PathBuf,
        first: usize,
        second: usize,
    },

    #[error("`{variable}` at `{path}` line {line} is not a single string: `{value}`")]
    InvalidValue {
        variable: String,
        path: PathBuf,
        line: usize,
        value: String,
    },

    #[error("unsupported substitution in `{0}`")]
    UnsupportedSubstitution(String),

    #[error("cannot locate package `{package}`: {message}")]
    PackageNotFound { package: String, message: String },
}
