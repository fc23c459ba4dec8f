use crate::error::CertEvalError;
use crate::evaluator::{Credentials, COHERE, DEFAULT_PROVIDERS, GPT_35, LLAMA2};
use crate::store::WorkspaceLayout;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "certeval")]
#[command(about = "Evaluate products against sustainability certification mandates using LLMs")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// Workspace root holding file_list.csv and the certification folders
    #[arg(short = 'r', long, env = "CERTEVAL_ROOT", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Maximum time for a single provider call in seconds (10-300)
    #[arg(
        short = 't',
        long,
        env = "CERTEVAL_TIMEOUT",
        default_value = "60",
        value_parser = validate_timeout,
        global = true
    )]
    pub timeout: u64,

    /// Enable verbose output to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Enable debug output including prompts and raw provider responses
    #[arg(short = 'd', long, global = true)]
    pub debug: bool,

    /// Cohere API key
    #[arg(long, env = "COHERE_API_KEY", hide_env_values = true, global = true)]
    pub cohere_key: Option<String>,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_key: Option<String>,

    /// Replicate API token
    #[arg(long, env = "REPLICATE_API_TOKEN", hide_env_values = true, global = true)]
    pub replicate_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Evaluate a product against one or more certifications
    Evaluate(EvaluateArgs),
    /// Ask providers for a column definition
    Define(DefineArgs),
    /// Approve a column definition in the data dictionary
    Approve(ApproveArgs),
    /// List certifications, or the mandates of one certification
    Mandates(MandatesArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct EvaluateArgs {
    /// Dataset name as registered in file_list.csv
    #[arg(long)]
    pub dataset: String,

    /// Product name as it appears in the dataset
    #[arg(long)]
    pub product: String,

    /// Certification to evaluate against (repeatable)
    #[arg(short = 'c', long = "cert", required = true)]
    pub certifications: Vec<String>,

    /// Provider to query (repeatable, defaults to every provider)
    #[arg(short = 'p', long = "provider")]
    pub providers: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct DefineArgs {
    /// Dataset name as registered in file_list.csv
    #[arg(long)]
    pub dataset: String,

    /// Column to define (defaults to the first unapproved column)
    #[arg(long)]
    pub column: Option<String>,

    /// Provider to query (repeatable, defaults to every provider)
    #[arg(short = 'p', long = "provider")]
    pub providers: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ApproveArgs {
    /// Dataset name as registered in file_list.csv
    #[arg(long)]
    pub dataset: String,

    /// Column whose definition is approved
    #[arg(long)]
    pub column: String,

    /// Approved definition text
    #[arg(long)]
    pub definition: String,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct MandatesArgs {
    /// Show the mandates of this certification
    #[arg(short = 'c', long = "cert")]
    pub certification: Option<String>,

    /// Dataset whose column relevance is shown alongside each mandate
    #[arg(long)]
    pub dataset: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Result<Self, CertEvalError> {
        let cli = Self::try_parse().map_err(|e| match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => CertEvalError::InvalidArguments(e.to_string()),
        })?;

        cli.validate()?;

        Ok(cli)
    }

    pub fn validate(&self) -> Result<(), CertEvalError> {
        if !(10..=300).contains(&self.timeout) {
            return Err(CertEvalError::InvalidArguments(
                "Timeout must be between 10 and 300 seconds".to_string(),
            ));
        }

        match &self.command {
            Command::Evaluate(args) => {
                if args.product.trim().is_empty() {
                    return Err(CertEvalError::InvalidArguments(
                        "Product name must not be empty".to_string(),
                    ));
                }
                if args.certifications.iter().any(|c| c.trim().is_empty()) {
                    return Err(CertEvalError::InvalidArguments(
                        "Certification names must not be empty".to_string(),
                    ));
                }
            }
            Command::Approve(args) => {
                if args.definition.trim().is_empty() {
                    return Err(CertEvalError::InvalidArguments(
                        "Definition must not be empty".to_string(),
                    ));
                }
            }
            Command::Define(_) | Command::Mandates(_) => {}
        }

        Ok(())
    }

    pub fn get_timeout_seconds(&self) -> u64 {
        self.timeout
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose || self.debug
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Default tracing filter when `RUST_LOG` is unset.
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "trace"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }

    pub fn should_use_color(&self) -> bool {
        std::env::var("NO_COLOR").is_err()
    }

    pub fn layout(&self) -> WorkspaceLayout {
        WorkspaceLayout::new(&self.root)
    }

    pub fn credentials(&self) -> Credentials {
        let mut credentials = Credentials::new();
        let keys = [
            (COHERE, &self.cohere_key),
            (GPT_35, &self.openai_key),
            (LLAMA2, &self.replicate_key),
        ];
        for (provider, key) in keys {
            if let Some(key) = key {
                credentials.insert(provider, key.as_str());
            }
        }
        credentials
    }
}

/// Selected providers, or every default provider when none were named.
pub fn selected_providers(requested: &[String]) -> Vec<String> {
    if requested.is_empty() {
        DEFAULT_PROVIDERS.iter().map(|p| p.to_string()).collect()
    } else {
        requested.to_vec()
    }
}

fn validate_timeout(s: &str) -> Result<u64, String> {
    let timeout: u64 = s.parse().map_err(|_| "Timeout must be a number")?;

    if (10..=300).contains(&timeout) {
        Ok(timeout)
    } else {
        Err("Timeout must be between 10 and 300 seconds".to_string())
    }
}
