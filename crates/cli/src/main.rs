// Aspire CLI
//
// Design Decision: Use clap derive for ergonomic argument parsing.
// Design Decision: Support text/json/yaml output formats for scripting.
// Design Decision: Credentials persist in a file so sessions survive between invocations.
// Design Decision: Every command runs against one SessionService, disposed before exit.

mod commands;
mod output;

use aspire_core::telemetry::{init_logging, LogConfig};
use aspire_core::{ClientConfig, FileCredentialStore, RecordingNavigator, SessionService};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "aspire")]
#[command(about = "Aspire CLI - Administer the job board from the terminal")]
#[command(version)]
pub struct Cli {
    /// API base URL
    #[arg(long, env = "ASPIRE_API_BASE_URL")]
    pub api_url: Option<String>,

    /// Credentials file
    #[arg(long, env = "ASPIRE_CREDENTIALS_PATH")]
    pub credentials_file: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "text", value_parser = ["text", "json", "yaml"])]
    pub output: String,

    /// Suppress non-essential output
    #[arg(long, short)]
    pub quiet: bool,

    /// Log filter (e.g. "debug", "aspire_core=debug"); overrides RUST_LOG
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session token
    Login {
        /// Session kind
        #[arg(long = "as", default_value = "admin", value_parser = ["admin", "user"])]
        kind: String,

        /// Email address
        #[arg(long, short)]
        email: String,

        /// Password
        #[arg(long, short, env = "ASPIRE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log out and forget the session token
    Logout {
        /// Session kind
        #[arg(long = "as", default_value = "admin", value_parser = ["admin", "user"])]
        kind: String,
    },

    /// Show the signed-in user's profile
    Whoami,

    /// Show which sessions are held
    Status,

    /// Manage admin accounts
    Admins {
        #[command(subcommand)]
        command: commands::admins::AdminsCommand,
    },

    /// Manage job postings
    Jobs {
        #[command(subcommand)]
        command: commands::jobs::JobsCommand,
    },

    /// Browse contact requests
    Contacts {
        #[command(subcommand)]
        command: commands::contacts::ContactsCommand,
    },

    /// Browse job applications
    Applications {
        #[command(subcommand)]
        command: commands::applications::ApplicationsCommand,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(LogConfig::from_env().with_filter(cli.log_level.as_deref()));

    let mut config = ClientConfig::from_env();
    if let Some(api_url) = &cli.api_url {
        config = config.with_base_url(api_url.as_str());
    }
    if let Some(path) = &cli.credentials_file {
        config = config.with_credentials_path(path);
    }

    tracing::debug!(
        api_url = %config.base_url,
        credentials = %config.credentials_path.display(),
        "Configuration loaded"
    );

    let store = Arc::new(FileCredentialStore::new(&config.credentials_path));
    let navigator = Arc::new(RecordingNavigator::new());
    let service = SessionService::init(config, store, navigator.clone())?;
    let output_format = output::OutputFormat::from_str(&cli.output);

    let result = match cli.command {
        Commands::Login {
            kind,
            email,
            password,
        } => {
            commands::auth::login(&service, output_format, cli.quiet, &kind, email, password).await
        }
        Commands::Logout { kind } => {
            commands::auth::logout(&service, output_format, cli.quiet, &kind).await
        }
        Commands::Whoami => commands::auth::whoami(&service, output_format).await,
        Commands::Status => commands::auth::status(&service, output_format),
        Commands::Admins { command } => {
            commands::admins::run(command, &service, output_format, cli.quiet).await
        }
        Commands::Jobs { command } => {
            commands::jobs::run(command, &service, output_format, cli.quiet).await
        }
        Commands::Contacts { command } => {
            commands::contacts::run(command, &service, output_format).await
        }
        Commands::Applications { command } => {
            commands::applications::run(command, &service, output_format).await
        }
    };

    if navigator.session_expired() {
        eprintln!("Session expired. Please run `aspire login` again.");
    }

    service.dispose();
    result
}
