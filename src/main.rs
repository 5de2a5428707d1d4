//! Dashboard gate.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser request
//!     ───────────────▶ request id ─▶ trace ─▶ timeout
//!                                              │
//!                                              ▼
//!                                     ┌─────────────────┐  excluded (api, _next, *.ext)
//!                                     │ ExclusionMatcher │──────────────────────────┐
//!                                     └────────┬────────┘                           │
//!                                              ▼                                    │
//!                       cookie ──▶   ┌─────────────────┐  307 /dashboard            │
//!                     TokenStore     │    RouteGate     │──────────────▶ Browser     │
//!                                    └────────┬────────┘  307 /auth/login          │
//!                                              ▼ Delegate(path)                     │
//!                                     ┌─────────────────┐  307 /{locale}/...        │
//!                                     │ LocaleResolver  │──────────────▶ Browser     │
//!                                     └────────┬────────┘                           │
//!                                              ▼ forward / rewrite                  ▼
//!                                     ┌──────────────────────────────────────────────┐
//!                                     │              upstream renderer                │
//!                                     └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use dashboard_gate::lifecycle::{start, Shutdown};

#[derive(Parser)]
#[command(name = "dashboard-gate")]
#[command(about = "Auth and locale gate in front of the admin dashboard", long_about = None)]
struct Args {
    /// TOML configuration file; defaults are used when omitted.
    #[arg(short, long, env = "GATE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let shutdown = Shutdown::new();
    start(args.config.as_deref(), &shutdown).await?;
    Ok(())
}
