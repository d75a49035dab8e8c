use thiserror::Error;

/// Rejected draft update
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The name is not one of the thirteen record fields
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// The value is outside the closed set of a selection field
    #[error("invalid value {value:?} for {field}, expected one of: {}", .allowed.join(", "))]
    InvalidChoice {
        field: &'static str,
        value: String,
        allowed: &'static [&'static str],
    },
}

/// Failure while encoding the record store
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode xlsx: {0}")]
    Encode(#[from] rust_xlsxwriter::XlsxError),
}

/// Failure while reading an exported report back
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open workbook: {0}")]
    Open(#[from] calamine::XlsxError),

    #[error("sheet {0:?} not found in workbook")]
    MissingSheet(String),

    #[error("header row has no {0:?} column")]
    MissingColumn(String),

    #[error("row {row}: {source}")]
    Field {
        /// 1-based sheet row, header included
        row: usize,
        #[source]
        source: FieldError,
    },
}
