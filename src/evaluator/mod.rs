// Evaluator module - provider access, prompting, classification and aggregation

pub mod aggregator;
pub mod classifier;
pub mod definitions;
pub mod gateway;
pub mod llm_client;
pub mod orchestrator;
pub mod prompts;
pub mod replicate;
pub mod retry;

pub use aggregator::{pass_percentage, EvaluationAggregator, VerdictTally, GOOD_CANDIDATE_THRESHOLD};
pub use classifier::{classify, ResponseClassifier, SubstringClassifier};
pub use definitions::{extract_definition, DefinitionCandidate, DefinitionRequester, ID_COLUMN_DEFINITION};
pub use gateway::{Credentials, LlmGateway, ProviderRegistry, COHERE, DEFAULT_PROVIDERS, GPT_35, LLAMA2};
pub use llm_client::{GenerationOutcome, LlmConfig, RigBackend, RigLlmClient, TextGenerator};
pub use orchestrator::{
    CertificationReport, EvaluationOrchestrator, EvaluationReport, EvaluationSession, ProviderRun,
};
pub use prompts::PromptTemplate;
pub use replicate::ReplicateClient;
pub use retry::RetryPolicy;
