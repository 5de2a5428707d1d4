use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, LOCATION, SET_COOKIE};
use serde_json::{json, Value};

use dashboard_gate::config::{load_config, ConfigError, GateConfig};
use dashboard_gate::routing::{strip_locale, GateRules, RouteGate};
use dashboard_gate::session::{MemoryTokenStore, TokenStore};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Inspect and probe the dashboard gate", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what the gate decides for a path, without a running server
    Decide {
        path: String,
        /// Access token; omit for an unauthenticated request
        #[arg(short, long)]
        token: Option<String>,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load and validate a configuration file
    CheckConfig { file: PathBuf },
    /// Request a path from a running gate without following redirects
    Probe {
        path: String,
        #[arg(short, long, default_value = "http://localhost:8080")]
        url: String,
        #[arg(short, long)]
        token: Option<String>,
        /// Token cookie name
        #[arg(long, default_value = "access_token")]
        cookie: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Decide { path, token, config } => {
            let config = load_or_default(config.as_deref())?;
            let gate = RouteGate::new(GateRules::from_config(&config));
            let store = match &token {
                Some(token) => MemoryTokenStore::with_token(token.as_str()),
                None => MemoryTokenStore::new(),
            };
            let decision = gate.evaluate(&path, &store).await;
            let (locale, normalized) = strip_locale(&path, &gate.rules().locales);
            let out = json!({
                "path": path,
                "normalized_path": normalized,
                "locale": locale,
                "authenticated": token.is_some(),
                "outcome": decision,
                "redirect_to": gate.rules().redirect_target(&decision),
                "clears_token": decision.clears_token(),
                "token_after": store.get().await?,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Commands::CheckConfig { file } => match load_config(&file) {
            Ok(config) => {
                println!(
                    "{} is valid: {} auth routes, {} protected routes, locales {:?}",
                    file.display(),
                    config.routes.auth_routes.len(),
                    config.routes.protected_routes.len(),
                    config.i18n.locales
                );
            }
            Err(ConfigError::Validation(errors)) => {
                eprintln!("{} is invalid:", file.display());
                for error in errors {
                    eprintln!("  - {error}");
                }
                std::process::exit(1);
            }
            Err(e) => return Err(e.into()),
        },
        Commands::Probe {
            path,
            url,
            token,
            cookie,
        } => {
            let client = reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()?;

            let mut headers = HeaderMap::new();
            if let Some(token) = token {
                headers.insert(COOKIE, HeaderValue::from_str(&format!("{cookie}={token}"))?);
            }

            let res = client
                .get(format!("{}{}", url.trim_end_matches('/'), path))
                .headers(headers)
                .send()
                .await?;
            print_probe(res)?;
        }
    }

    Ok(())
}

fn load_or_default(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => Ok(GateConfig::default()),
    }
}

fn print_probe(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let header_text = |name: HeaderName| {
        res.headers()
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect::<Vec<_>>()
    };

    let location = header_text(LOCATION).into_iter().next();
    let out: Value = json!({
        "status": res.status().as_u16(),
        "location": location,
        "set_cookie": header_text(SET_COOKIE),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
