use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CertEvalError {
    #[error("Unknown LLM provider: {0}")]
    UnknownProvider(String),

    #[error("No credential supplied for provider {provider}")]
    MissingCredential { provider: String },

    #[error("Product not found in dataset: {0}")]
    ProductNotFound(String),

    #[error("No mandates defined for certification {0}")]
    NoMandates(String),

    #[error("Dataset not registered in catalog: {0}")]
    DatasetNotFound(String),

    #[error("Column not found in data dictionary: {0}")]
    ColumnNotFound(String),

    #[error("Store {path} has unexpected columns: {detail}")]
    StoreSchema { path: PathBuf, detail: String },

    #[error("Store {path} is not accessible: {source}")]
    StoreAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Neither the recommendation log nor the summary was written: {log}; {summary}")]
    PersistFailed {
        log: Box<CertEvalError>,
        summary: Box<CertEvalError>,
    },

    #[error("Invalid command line arguments: {0}")]
    InvalidArguments(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CertEvalError {
    /// Store failures are fatal to the running operation.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            CertEvalError::StoreSchema { .. }
                | CertEvalError::StoreAccess { .. }
                | CertEvalError::CsvError(_)
                | CertEvalError::IoError(_)
                | CertEvalError::PersistFailed { .. }
        )
    }

    /// Process exit status reported by the binary for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CertEvalError::InvalidArguments(_) => 2,
            CertEvalError::UnknownProvider(_) | CertEvalError::MissingCredential { .. } => 3,
            CertEvalError::DatasetNotFound(_)
            | CertEvalError::ProductNotFound(_)
            | CertEvalError::NoMandates(_)
            | CertEvalError::ColumnNotFound(_) => 4,
            e if e.is_persistence() => 5,
            CertEvalError::NetworkError(_) => 6,
            _ => 1,
        }
    }
}
