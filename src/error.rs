use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrateError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(reqwest::Error),

    #[error("Service unavailable at {url}: {source}")]
    ServiceUnavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Service at {url} returned an error status: {status}")]
    ServiceStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to decode JSON response from {url}: {source}")]
    ResponseDecode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Missing required CSV header: {0}")]
    MissingHeader(String),

    #[error("Missing required value in column '{column}' at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("Failed to initialize logger: {0}")]
    LoggerInit(String),
}

impl CrateError {
    /// True for failures reaching a remote service, whether at the transport
    /// level or as a non-success HTTP status.
    pub fn is_service_unavailable(&self) -> bool {
        matches!(
            self,
            CrateError::ServiceUnavailable { .. } | CrateError::ServiceStatus { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CrateError>;
