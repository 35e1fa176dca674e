//! `claimcheck` -- prints worked examples of the subsidy claim rules.
//!
//! Builds fixed land, transport and crop tables, runs every rule over them
//! and writes the findings to stdout.
//!
//! # Environment variables
//!
//! | Variable                    | Required | Default    | Description                        |
//! |-----------------------------|----------|------------|------------------------------------|
//! | `CLAIMCHECK_OUTPUT`         | no       | `markdown` | `markdown` or `json`               |
//! | `CLAIMCHECK_TRANSPORT_RATE` | no       | `10.0`     | Rate per km per ton in the demo    |
//! | `RUST_LOG`                  | no       | `claimcheck=info,claimcheck_cli=info,claimcheck_core=info` | Log filter |

use claimcheck_cli::config::DemoConfig;
use claimcheck_cli::demo;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "claimcheck=info,claimcheck_cli=info,claimcheck_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = DemoConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    tracing::info!(
        output = ?config.output,
        transport_rate = config.transport_rate,
        "Starting claimcheck demo",
    );

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = demo::run(&config, &mut stdout) {
        tracing::error!(error = %e, "Demo failed");
        std::process::exit(1);
    }
}
