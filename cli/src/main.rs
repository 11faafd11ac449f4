use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use academy_admin::{
    AdminConfig, ApiClient, ApiError, AuthState, ConfigError, Credentials, FileTokenStore, GuardDecision, Resource,
    SessionError, SessionManager, ValidationError, fetch_stats,
};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("not logged in; run `admin-cli login` first")]
    NotLoggedIn,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("--data must be a JSON object")]
    DataNotObject,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "admin-cli", about = "Academy admin console: courses, categories, and the admin session")]
struct Cli {
    /// Backend base URL. Overrides `ADMIN_API_URL`.
    #[arg(long)]
    base_url: Option<String>,

    /// Token file. Overrides `ADMIN_TOKEN_PATH`.
    #[arg(long)]
    token_path: Option<PathBuf>,

    /// Log request/response lines to stderr.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Exchange email and password for an admin token.
    Login {
        #[arg(long, env = "ADMIN_EMAIL")]
        email: String,
        #[arg(long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored token.
    Logout,
    /// Show whether a usable token is stored.
    Status,
    /// Course and category totals.
    Dashboard,
    Courses(ResourceCommand),
    Categories(ResourceCommand),
}

#[derive(Args, Debug)]
struct ResourceCommand {
    #[command(subcommand)]
    command: ResourceSubcommand,
}

#[derive(Subcommand, Debug)]
enum ResourceSubcommand {
    List,
    Create {
        /// Resource fields as a JSON object.
        #[arg(long)]
        data: String,
    },
    Update {
        id: String,
        #[arg(long)]
        data: String,
    },
    Delete {
        id: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let session = open_session(&cli)?;
    session.initialize();

    match cli.command {
        Command::Login { email, password } => run_login(&session, Credentials::new(email, password)).await,
        Command::Logout => {
            session.logout();
            println!("logged out");
            Ok(())
        }
        Command::Status => {
            print_status(&session.current_state());
            Ok(())
        }
        Command::Dashboard => {
            require_login(&session)?;
            let stats = fetch_stats(session.api()).await?;
            print_json(&serde_json::to_value(stats)?)
        }
        Command::Courses(cmd) => run_resource(&session, Resource::Course, cmd).await,
        Command::Categories(cmd) => run_resource(&session, Resource::Category, cmd).await,
    }
}

fn open_session(cli: &Cli) -> Result<SessionManager, CliError> {
    let mut config = AdminConfig::from_env()?;
    if let Some(base_url) = &cli.base_url {
        config.set_base_url(base_url)?;
    }
    if let Some(path) = &cli.token_path {
        config.token_path.clone_from(path);
    }

    let store = Arc::new(FileTokenStore::new(&config.token_path));
    let api = ApiClient::from_config(&config, store)?;
    tracing::debug!(base_url = api.base_url(), token_path = %config.token_path.display(), "admin client configured");
    Ok(SessionManager::new(api, config.expiry_policy))
}

async fn run_login(session: &SessionManager, credentials: Credentials) -> Result<(), CliError> {
    credentials.validate()?;
    session.login(&credentials).await?;
    println!("logged in as {}", credentials.email);
    Ok(())
}

fn require_login(session: &SessionManager) -> Result<(), CliError> {
    match session.guard() {
        GuardDecision::Proceed { .. } => Ok(()),
        GuardDecision::RedirectToLogin | GuardDecision::Wait => Err(CliError::NotLoggedIn),
    }
}

async fn run_resource(session: &SessionManager, resource: Resource, cmd: ResourceCommand) -> Result<(), CliError> {
    require_login(session)?;
    let api = session.api();

    let json = match cmd.command {
        ResourceSubcommand::List => Value::Array(api.list(resource).await?.into_items()),
        ResourceSubcommand::Create { data } => api.create(resource, parse_fields(&data)?).await?,
        ResourceSubcommand::Update { id, data } => api.update(resource, &id, parse_fields(&data)?).await?,
        ResourceSubcommand::Delete { id } => api.delete(resource, &id).await?,
    };
    print_json(&json)
}

fn parse_fields(data: &str) -> Result<Value, CliError> {
    let value = serde_json::from_str::<Value>(data)?;
    if !value.is_object() {
        return Err(CliError::DataNotObject);
    }
    Ok(value)
}

fn print_status(state: &AuthState) {
    match state {
        AuthState::Authenticated { .. } => println!("authenticated"),
        AuthState::Unauthenticated => println!("not logged in"),
        AuthState::Loading => println!("checking session"),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
