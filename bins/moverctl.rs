use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use models::auth::RegistrationForm;
use models::SessionPatch;
use service::access::{Access, Area};
use service::api::{HttpMarketplaceApi, MarketplaceApi};
use service::session::SessionStore;
use service::storage::JsonFileStore;
use tracing::{error, info, warn};
use uuid::Uuid;

type Store = SessionStore<HttpMarketplaceApi, JsonFileStore>;

/// Session client for the moving-services marketplace.
#[derive(Parser, Debug)]
#[command(name = "moverctl", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the stored session
    Status,
    /// Log in and print where the UI would go next
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "MOVERS_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account (does not log in)
    Register {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "MOVERS_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        otp: String,
        #[arg(long, default_value = "")]
        pincode: String,
        #[arg(long, default_value = "")]
        city: String,
        #[arg(long, default_value = "")]
        state: String,
        /// `logistic` for a logistics company account
        #[arg(long, default_value = "user")]
        user_type: String,
    },
    /// Drop the stored session
    Logout,
    /// Refresh company details into the session
    Company {
        /// Defaults to the logged-in email
        #[arg(long)]
        email: Option<String>,
    },
    /// Record a plan purchased outside the backend round trip
    Activate { plan: String },
    /// Edit profile fields of the stored session
    Update {
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Check whether the session may enter an area (public, dashboard, logistic, admin)
    Gate { area: Area },
}

fn load_config() -> (configs::AppConfig, Option<anyhow::Error>) {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => (cfg, None),
        Err(file_err) => match configs::AppConfig::from_env() {
            Ok(cfg) => (cfg, Some(file_err)),
            Err(env_err) => {
                eprintln!("invalid configuration: {env_err}");
                (configs::AppConfig::default(), Some(env_err))
            }
        },
    }
}

fn build_store(cfg: &configs::AppConfig) -> anyhow::Result<Store> {
    let store_path = Path::new(&cfg.storage.path);
    common::env::ensure_data_dir(store_path)?;
    let kv = JsonFileStore::open(store_path)?;
    let api = Arc::new(HttpMarketplaceApi::new(cfg.api.clone())?);
    Ok(SessionStore::new(api, kv))
}

async fn run(store: &Store, command: Command) -> anyhow::Result<bool> {
    match command {
        Command::Status => {
            store.refresh_auth().await;
            match store.session().await {
                Some(session) => println!("{}", serde_json::to_string_pretty(&session)?),
                None => println!("no session"),
            }
            println!("authenticated: {}", store.is_authenticated().await);
            println!("authorization header: {}", if store.api().authorization().is_some() { "set" } else { "absent" });
            Ok(true)
        }
        Command::Login { email, password } => match store.login(&email, &password).await {
            Ok(ok) => {
                println!("logged in as {} ({})", ok.session.email, ok.session.role);
                println!("redirect: {}", ok.redirect);
                Ok(true)
            }
            Err(e) => {
                println!("login failed: {e}");
                Ok(false)
            }
        },
        Command::Register { full_name, email, password, phone, otp, pincode, city, state, user_type } => {
            let form = RegistrationForm { full_name, email, password, phone, otp, pincode, city, state, user_type };
            match store.register(form).await {
                Ok(message) => {
                    println!("{}", message.unwrap_or_else(|| "registered; please log in".into()));
                    Ok(true)
                }
                Err(e) => {
                    println!("registration failed: {e}");
                    Ok(false)
                }
            }
        }
        Command::Logout => {
            store.logout().await;
            println!("logged out");
            Ok(true)
        }
        Command::Company { email } => {
            let email = match email {
                Some(e) => e,
                None => store.session().await.map(|s| s.email).unwrap_or_default(),
            };
            match store.fetch_company(&email).await {
                Ok(status) => {
                    match status.company() {
                        Some(company) => println!("{}", serde_json::to_string_pretty(company)?),
                        None => println!("no company registered for {email}"),
                    }
                    Ok(true)
                }
                Err(e) => {
                    println!("company lookup failed: {e}");
                    Ok(false)
                }
            }
        }
        Command::Activate { plan } => {
            let session = store.activate_subscription_local(&plan).await;
            println!("plan {} active", session.subscription_plan);
            Ok(true)
        }
        Command::Update { full_name, phone } => {
            let patch = SessionPatch { full_name, phone, ..SessionPatch::default() };
            if patch.is_empty() {
                println!("nothing to update");
                return Ok(true);
            }
            let session = store.update_user(patch).await;
            println!("{}", serde_json::to_string_pretty(&session)?);
            Ok(true)
        }
        Command::Gate { area } => match store.gate(area).await {
            Access::Granted => {
                println!("granted");
                Ok(true)
            }
            Access::Redirect(to) => {
                println!("redirect: {to}");
                Ok(false)
            }
        },
    }
}

fn main() -> ExitCode {
    // 提前加载 .env，使得 RUST_LOG / API_BASE_URL 等环境变量生效
    dotenv().ok();
    let cli = Cli::parse();

    let (cfg, config_err) = load_config();
    common::utils::logging::init_logging(&cfg.logging.format, cfg.logging.filter.as_deref());
    if let Some(e) = config_err {
        warn!(error = %e, "config file not used; running on defaults and environment");
    }

    let run_id = Uuid::new_v4();
    info!(service = "moverctl", event = "start", %run_id, version = env!("CARGO_PKG_VERSION"), "client starting");

    let store = match build_store(&cfg) {
        Ok(store) => store,
        Err(e) => {
            error!(service = "moverctl", event = "init_failed", error = %e, "cannot set up session store");
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "moverctl", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(&store, cli.command)) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!(service = "moverctl", event = "command_failed", error = %e, "command failed");
            ExitCode::FAILURE
        }
    }
}
