use thiserror::Error;

/// Errors that can occur when parsing a table from text.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TableParseError {
    /// The input contains no rows, or a markdown document no table
    #[error("table has no rows")]
    Empty,

    /// A markdown document holds more than one table
    #[error("found {0} tables, expected exactly one")]
    MultipleTables(usize),

    /// The markdown parser rejected the input
    #[error("invalid markdown: {0}")]
    Markdown(String)
}

/// Reasons a table roller cannot bind to its content.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SetupError {
    /// No table below the host element
    #[error("the <table-roller> element needs to wrap a <table> (e.g. as a child element), but could not find one")]
    NoTable,

    /// More than one table below the host element
    #[error("the <table-roller> element wraps {0} tables, which is not supported; wrap each table separately")]
    MultipleTables(usize)
}

/// Errors that can occur when defining a component.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// Custom element names start with a lowercase ASCII letter and
    /// contain a hyphen
    #[error("'{0}' is not a valid custom element name")]
    InvalidName(String),

    /// The name already has a component
    #[error("'{0}' has already been defined")]
    AlreadyDefined(String)
}

/// Errors that can occur when driving a document.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum DocumentError {
    /// No element in the document has the given id
    #[error("no element with id '{0}'")]
    UnknownElement(String)
}
