use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid score for {field}: '{value}' is not a finite number")]
    InvalidScore { field: String, value: String },

    #[error("Invalid gender marker '{0}': expected M or F")]
    InvalidGender(String),

    #[error("Invalid table: {0}")]
    InvalidTable(String),

    #[error("Malformed prompt template: {0}")]
    Template(String),

    #[error("{0}")]
    Generation(String),

    #[error("GEMINI_API_KEY not found. Set it in the environment or a .env file.")]
    MissingApiKey,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "xlsx")]
    #[error("Excel read error: {0}")]
    XlsxRead(#[from] calamine::XlsxError),

    #[cfg(feature = "xlsx")]
    #[error("Excel write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[cfg(feature = "gemini")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
