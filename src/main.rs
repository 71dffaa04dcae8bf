use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use tracing::info;

use kelly_desk::config::Config;
use kelly_desk::dashboard::{self, AppState, InputDefaults};
use kelly_desk::ledger::Session;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let rules = config.rules();
    info!(
        "Session bankroll {}{:.2} (edge scale {:?}, Kelly scale {:?}, rounding {:?}, deduction {:?})",
        config.currency,
        config.initial_balance,
        rules.edge_scale,
        rules.kelly_scale,
        rules.rounding,
        rules.deduction,
    );

    let session = Session::new(config.initial_balance, rules, config.currency.clone());
    let defaults = InputDefaults {
        edge: config.default_edge,
        kelly_fraction: config.kelly_fraction,
        max_bet_percent: config.max_bet_percent,
    };

    let app = dashboard::router(AppState::new(session, defaults));
    let addr: SocketAddr = config.dashboard_addr.parse()?;
    info!("Dashboard listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
