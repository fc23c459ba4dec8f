pub mod args;
pub mod reporter;

pub use args::{Cli, Command};
pub use reporter::ReportFormatter;

use crate::error::CertEvalError;
use crate::evaluator::{
    DefinitionRequester, EvaluationOrchestrator, EvaluationSession, LlmGateway, ProviderRegistry,
    RetryPolicy,
};
use crate::store::{
    ColumnSummaries, DataDictionary, DatasetCatalog, LogStore, MandateCatalog, ProductDataset,
    SummaryStore,
};
use args::{selected_providers, ApproveArgs, DefineArgs, EvaluateArgs, MandatesArgs};
use tracing::{debug, info};

pub struct CliHandler {
    cli: Cli,
    registry: ProviderRegistry,
    policy: RetryPolicy,
}

impl CliHandler {
    pub fn new(cli: Cli) -> Self {
        let registry = ProviderRegistry::with_defaults(cli.get_timeout_seconds());
        Self {
            cli,
            registry,
            policy: RetryPolicy::default(),
        }
    }

    pub fn with_registry(mut self, registry: ProviderRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn run(&self) -> Result<i32, CertEvalError> {
        let output = self.execute().await?;
        println!("{}", output);
        Ok(0)
    }

    /// Runs the selected command and returns the rendered report.
    pub async fn execute(&self) -> Result<String, CertEvalError> {
        debug!(root = %self.cli.root.display(), command = ?self.cli.command, "running command");

        match &self.cli.command {
            Command::Evaluate(args) => self.evaluate(args).await,
            Command::Define(args) => self.define(args).await,
            Command::Approve(args) => self.approve(args),
            Command::Mandates(args) => self.mandates(args),
        }
    }

    async fn evaluate(&self, args: &EvaluateArgs) -> Result<String, CertEvalError> {
        let layout = self.cli.layout();

        let datasets = DatasetCatalog::load(&layout.dataset_catalog())?;
        let dataset = datasets.find(&args.dataset)?;
        let products = ProductDataset::load(&layout.resolve(&dataset.file_name))?;
        let product = products
            .find_by_name(&args.product)
            .cloned()
            .ok_or_else(|| CertEvalError::ProductNotFound(args.product.clone()))?;

        let catalog = MandateCatalog::load(
            &layout.mandates(),
            &layout.mandate_relevance(&args.dataset),
        )?;
        info!(mandates = catalog.len(), dataset = %args.dataset, "mandate catalog loaded");

        let session = EvaluationSession {
            product,
            certifications: args.certifications.clone(),
            providers: selected_providers(&args.providers),
            credentials: self.cli.credentials(),
        };

        let orchestrator = EvaluationOrchestrator::new(
            self.gateway(),
            LogStore::new(layout.recommendation_log(&args.dataset)),
            SummaryStore::new(layout.recommendation_summary(&args.dataset)),
        );
        let report = orchestrator.evaluate(&session, &catalog).await?;

        Ok(ReportFormatter::for_cli(&self.cli).format_evaluation_report(&report))
    }

    async fn define(&self, args: &DefineArgs) -> Result<String, CertEvalError> {
        let layout = self.cli.layout();

        let datasets = DatasetCatalog::load(&layout.dataset_catalog())?;
        let description = datasets.find(&args.dataset)?.file_description.clone();
        let dictionary = DataDictionary::load(layout.data_dictionary(&args.dataset))?;

        let column = match &args.column {
            Some(column) => dictionary
                .find(column)
                .ok_or_else(|| CertEvalError::ColumnNotFound(column.clone()))?,
            None => match dictionary.next_pending() {
                Some(entry) => entry,
                None => return Ok("Every column in the data dictionary is approved.".to_string()),
            },
        };

        let summaries = ColumnSummaries::load(&layout.column_summary(&args.dataset))?;
        let gateway = self.gateway();
        let candidates = DefinitionRequester::new(&gateway)
            .request_definition(
                &column.column_name,
                &summaries,
                &description,
                &selected_providers(&args.providers),
                &self.cli.credentials(),
            )
            .await?;

        let position = dictionary
            .pending()
            .position(|entry| entry.column_name == column.column_name)
            .map(|index| (index + 1, dictionary.pending().count()));

        Ok(ReportFormatter::for_cli(&self.cli).format_definitions(
            column,
            summaries.find(&column.column_name),
            position,
            &candidates,
        ))
    }

    fn approve(&self, args: &ApproveArgs) -> Result<String, CertEvalError> {
        let layout = self.cli.layout();
        let mut dictionary = DataDictionary::load(layout.data_dictionary(&args.dataset))?;

        dictionary.approve(&args.column, &args.definition)?;

        let entry = dictionary
            .find(&args.column)
            .ok_or_else(|| CertEvalError::ColumnNotFound(args.column.clone()))?;
        Ok(ReportFormatter::for_cli(&self.cli).format_approval(entry))
    }

    fn mandates(&self, args: &MandatesArgs) -> Result<String, CertEvalError> {
        let layout = self.cli.layout();
        let catalog = match &args.dataset {
            Some(dataset) => {
                MandateCatalog::load(&layout.mandates(), &layout.mandate_relevance(dataset))?
            }
            None => MandateCatalog::load_reference(&layout.mandates())?,
        };
        let formatter = ReportFormatter::for_cli(&self.cli);

        match &args.certification {
            Some(certification) => {
                let mandates = catalog.for_certification(certification);
                if mandates.is_empty() {
                    return Err(CertEvalError::NoMandates(certification.clone()));
                }
                Ok(formatter.format_mandates(certification, &mandates))
            }
            None => Ok(formatter.format_certifications(&catalog.certifications())),
        }
    }

    fn gateway(&self) -> LlmGateway {
        LlmGateway::new(self.registry.clone(), self.policy.clone())
    }
}
