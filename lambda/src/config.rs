use clap::Parser;
use notes_model::COMPLETION_INDEX;
use notes_store::DynamoDbConfig;
use thiserror::Error;

/// Startup configuration that can't be served with.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("NOTES_TABLE is not set")]
    MissingTable,

    #[error("completion index name must not be empty")]
    EmptyIndex,

    #[error("NOTES_TIMEOUT_MS must be greater than zero")]
    ZeroTimeout,

    #[error(transparent)]
    Arguments(#[from] clap::Error),
}

/// Command-line / environment arguments. Lambda starts the bootstrap
/// binary without argv, so every option has an environment fallback.
#[derive(Parser, Debug, Clone)]
#[command(name = "notes-lambda")]
#[command(about = "AppSync direct resolver for the notes API")]
pub struct Args {
    /// DynamoDB table holding the notes
    #[arg(long, env = "NOTES_TABLE")]
    pub table: Option<String>,

    /// Global secondary index keyed on `complete`
    #[arg(long, env = "NOTES_COMPLETION_INDEX", default_value = COMPLETION_INDEX)]
    pub completion_index: String,

    /// AWS region; the default credential chain's region when unset
    #[arg(long, env = "NOTES_REGION")]
    pub region: Option<String>,

    /// Endpoint override, e.g. http://localhost:4566 for LocalStack
    #[arg(long, env = "NOTES_DYNAMODB_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Per-operation timeout for DynamoDB calls, in milliseconds
    #[arg(long, env = "NOTES_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Enable verbose debug logging
    #[arg(short, long, env = "NOTES_VERBOSE")]
    pub verbose: bool,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesConfig {
    pub table_name: String,
    pub completion_index: String,
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_ms: Option<u64>,
    pub verbose: bool,
}

impl NotesConfig {
    /// Reads the process arguments and environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::try_from(Args::try_parse()?)
    }

    pub fn dynamodb(&self) -> DynamoDbConfig {
        DynamoDbConfig {
            table_name: self.table_name.clone(),
            region: self.region.clone(),
            endpoint: self.endpoint.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

impl TryFrom<Args> for NotesConfig {
    type Error = ConfigError;

    fn try_from(args: Args) -> Result<Self, Self::Error> {
        let table_name = args
            .table
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingTable)?;

        let completion_index = args.completion_index.trim().to_string();
        if completion_index.is_empty() {
            return Err(ConfigError::EmptyIndex);
        }

        if args.timeout_ms == Some(0) {
            return Err(ConfigError::ZeroTimeout);
        }

        let endpoint = args.endpoint.filter(|e| !e.trim().is_empty());
        let region = args
            .region
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        Ok(Self {
            table_name,
            completion_index,
            region,
            endpoint,
            timeout_ms: args.timeout_ms,
            verbose: args.verbose,
        })
    }
}
