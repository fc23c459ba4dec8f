use crate::error::CertEvalError;
use crate::evaluator::aggregator::EvaluationAggregator;
use crate::evaluator::classifier::{ResponseClassifier, SubstringClassifier};
use crate::evaluator::gateway::{Credentials, LlmGateway};
use crate::evaluator::llm_client::GenerationOutcome;
use crate::evaluator::prompts::PromptTemplate;
use crate::models::{
    CandidateAssessment, LogEntry, Mandate, Product, SummaryRecord, Verdict, TIMESTAMP_FORMAT,
};
use crate::store::{LogStore, MandateCatalog, SummaryStore};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Everything one evaluation request needs, passed explicitly.
#[derive(Debug, Clone)]
pub struct EvaluationSession {
    pub product: Product,
    pub certifications: Vec<String>,
    pub providers: Vec<String>,
    pub credentials: Credentials,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRun {
    pub summary: SummaryRecord,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CertificationReport {
    pub assessment: CandidateAssessment,
    pub runs: Vec<ProviderRun>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub product_name: String,
    pub certifications: Vec<CertificationReport>,
}

/// Drives certification, then provider, then mandate evaluation, one provider call
/// at a time, and persists each provider run as soon as it completes.
pub struct EvaluationOrchestrator {
    gateway: LlmGateway,
    classifier: Box<dyn ResponseClassifier>,
    aggregator: EvaluationAggregator,
    log_store: LogStore,
    summary_store: SummaryStore,
}

impl EvaluationOrchestrator {
    pub fn new(gateway: LlmGateway, log_store: LogStore, summary_store: SummaryStore) -> Self {
        Self {
            gateway,
            classifier: Box::new(SubstringClassifier),
            aggregator: EvaluationAggregator::new(),
            log_store,
            summary_store,
        }
    }

    pub fn with_classifier(mut self, classifier: Box<dyn ResponseClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub async fn evaluate(
        &self,
        session: &EvaluationSession,
        catalog: &MandateCatalog,
    ) -> Result<EvaluationReport, CertEvalError> {
        self.validate(session, catalog)?;

        info!(
            product = %session.product.name,
            certifications = ?session.certifications,
            providers = ?session.providers,
            "starting evaluation"
        );

        let mut certifications = Vec::new();
        for certification in &session.certifications {
            let mandates = catalog.for_certification(certification);
            let mut runs = Vec::new();

            for provider in &session.providers {
                let run = self
                    .evaluate_provider(session, certification, provider, &mandates)
                    .await?;
                runs.push(run);
            }

            let percentages = runs
                .iter()
                .map(|run| (run.summary.provider_name.clone(), run.summary.pass_percentage))
                .collect();
            let assessment = self.aggregator.assess(certification, percentages);

            info!(
                certification = %certification,
                minimum_percentage = ?assessment.minimum_percentage,
                verdict = assessment.headline(),
                "certification assessed"
            );
            certifications.push(CertificationReport { assessment, runs });
        }

        Ok(EvaluationReport {
            product_name: session.product.name.clone(),
            certifications,
        })
    }

    fn validate(
        &self,
        session: &EvaluationSession,
        catalog: &MandateCatalog,
    ) -> Result<(), CertEvalError> {
        if session.certifications.is_empty() {
            return Err(CertEvalError::InvalidArguments(
                "At least one certification is required".to_string(),
            ));
        }
        if session.providers.is_empty() {
            return Err(CertEvalError::InvalidArguments(
                "At least one provider is required".to_string(),
            ));
        }

        for provider in &session.providers {
            if !self.gateway.registry().contains(provider) {
                return Err(CertEvalError::UnknownProvider(provider.clone()));
            }
            session.credentials.get(provider)?;
        }

        for certification in &session.certifications {
            if catalog.for_certification(certification).is_empty() {
                return Err(CertEvalError::NoMandates(certification.clone()));
            }
        }

        Ok(())
    }

    async fn evaluate_provider(
        &self,
        session: &EvaluationSession,
        certification: &str,
        provider: &str,
        mandates: &[&Mandate],
    ) -> Result<ProviderRun, CertEvalError> {
        let credential = session.credentials.get(provider)?;
        let start_time = Instant::now();
        let mut entries = Vec::with_capacity(mandates.len());

        for (index, mandate) in mandates.iter().enumerate() {
            let entry = self
                .evaluate_mandate(&session.product, mandate, provider, credential)
                .await?;
            info!(
                provider,
                certification,
                mandate = %mandate.number,
                verdict = %entry.verdict,
                "{} of {} mandates complete",
                index + 1,
                mandates.len()
            );
            entries.push(entry);
        }

        let summary = self.aggregator.summarize(
            &session.product.name,
            certification,
            provider,
            &entries,
            start_time.elapsed(),
        );

        self.persist(&entries, &summary)?;
        Ok(ProviderRun { summary, entries })
    }

    async fn evaluate_mandate(
        &self,
        product: &Product,
        mandate: &Mandate,
        provider: &str,
        credential: &str,
    ) -> Result<LogEntry, CertEvalError> {
        let prompt = PromptTemplate::build_compliance_prompt(mandate, product);
        debug!(provider, mandate = %mandate.label(), prompt_chars = prompt.len(), "querying provider");

        let outcome = self.gateway.generate(&prompt, provider, credential).await?;

        let failure = match outcome {
            GenerationOutcome::Text(text) => {
                let verdict = self.classifier.classify(&text);
                return Ok(LogEntry::new(product, mandate, prompt, text, verdict, provider));
            }
            GenerationOutcome::RateLimited => "rate limit still in effect after retry".to_string(),
            GenerationOutcome::ServiceUnavailable => "service unavailable after retry".to_string(),
            GenerationOutcome::Error(detail) => detail,
        };

        warn!(provider, mandate = %mandate.label(), error = %failure, "mandate not evaluated");
        let response = format!("Error in {} response: {}", provider, failure);

        Ok(LogEntry::new(
            product,
            mandate,
            prompt,
            response,
            Verdict::Error,
            provider,
        ))
    }

    /// Writes both stores even if the first write fails. Whatever could not be
    /// written is emitted through `error!` so the run is never lost.
    fn persist(&self, entries: &[LogEntry], summary: &SummaryRecord) -> Result<(), CertEvalError> {
        let log_result = self.log_store.prepend(entries);
        if let Err(err) = &log_result {
            error!(
                error = %err,
                path = %self.log_store.path().display(),
                entries = entries.len(),
                "failed to write recommendation log"
            );
            for entry in entries {
                error!(
                    product = %entry.product_name,
                    certification = %entry.certification,
                    mandate = %entry.mandate_number,
                    provider = %entry.provider_name,
                    verdict = %entry.verdict,
                    timestamp = %entry.timestamp.format(TIMESTAMP_FORMAT),
                    response = %entry.raw_response,
                    "unsaved recommendation"
                );
            }
        }

        let summary_result = self.summary_store.prepend(summary);
        if let Err(err) = &summary_result {
            error!(
                error = %err,
                path = %self.summary_store.path().display(),
                product = %summary.product_name,
                provider = %summary.provider_name,
                certification = %summary.certification,
                passed = summary.passed_count,
                failed = summary.failed_count,
                na = summary.indeterminate_count,
                percentage = summary.pass_percentage,
                elapsed_secs = summary.elapsed_seconds,
                "unsaved recommendation summary"
            );
        }

        match (log_result, summary_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(err), Ok(())) | (Ok(()), Err(err)) => Err(err),
            (Err(log), Err(summary)) => Err(CertEvalError::PersistFailed {
                log: Box::new(log),
                summary: Box::new(summary),
            }),
        }
    }
}
