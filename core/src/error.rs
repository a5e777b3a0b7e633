//! Error types for request building and data-table parsing.
//!
//! # Design
//! Nothing here is recoverable: every variant aborts construction before a
//! specification exists. Variants carry the offending field and raw text so a
//! failing scenario points straight at the bad table cell.

use std::fmt;

/// Errors returned by `RequestBuilder::build` and `build_request*`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A required descriptor key is absent or blank.
    MissingField(&'static str),

    /// A list entry in `headers` or `query_params` has no separator or no name.
    MalformedEntry {
        field: &'static str,
        entry: String,
        separator: char,
    },

    /// The data table could not be read into a descriptor.
    Table(TableError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::MissingField(key) => write!(f, "missing required field `{key}`"),
            BuildError::MalformedEntry {
                field,
                entry,
                separator,
            } => {
                write!(
                    f,
                    "malformed `{field}` entry {entry:?}: expected `name{separator}value`"
                )
            }
            BuildError::Table(err) => write!(f, "invalid data table: {err}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Table(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TableError> for BuildError {
    fn from(err: TableError) -> Self {
        BuildError::Table(err)
    }
}

/// Errors returned by `parse_table`. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A non-blank, non-comment line is not delimited by `|`.
    NotARow { line: usize },

    /// A row does not have exactly a key cell and a value cell.
    WrongColumnCount { line: usize, found: usize },

    /// The same key appears on two rows.
    DuplicateKey { line: usize, key: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::NotARow { line } => {
                write!(f, "line {line}: expected a `| key | value |` row")
            }
            TableError::WrongColumnCount { line, found } => {
                write!(f, "line {line}: expected 2 cells, found {found}")
            }
            TableError::DuplicateKey { line, key } => {
                write!(f, "line {line}: duplicate key `{key}`")
            }
        }
    }
}

impl std::error::Error for TableError {}
