pub mod cli;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod store;

pub use error::CertEvalError;

// Re-export commonly used types
pub use models::{CandidateAssessment, LogEntry, Mandate, Product, SummaryRecord, Verdict};

pub use evaluator::{
    Credentials, EvaluationOrchestrator, EvaluationReport, EvaluationSession, LlmGateway,
    ProviderRegistry, RetryPolicy,
};

pub use store::WorkspaceLayout;

pub use cli::CliHandler;
