use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Missing required configuration: {0}")]
    MissingConfiguration(&'static str),

    #[error("Worksheet '{0}' not found in spreadsheet")]
    WorksheetNotFound(String),

    #[error("No extranet mapping for ledger tab '{0}'")]
    UnmappedHotel(String),

    #[error("Extranet query failed: {0}")]
    SourceQuery(String),

    #[error("Spreadsheet read failed: {0}")]
    SheetRead(String),

    #[error("Spreadsheet update rejected: {0}")]
    SheetWrite(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
