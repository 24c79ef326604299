//! convo CLI and REST API entry point.
//!
//! Binary name: `convo`
//!
//! Parses CLI arguments, loads configuration, wires the history store and
//! model provider, then dispatches to a command or starts the HTTP server.

mod cli;
mod http;
mod state;
mod sweeper;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;
use tokio_util::sync::CancellationToken;

use convo_infra::config::{default_config_path, load_config};
use convo_observe::{LogFormat, init_tracing, shutdown_tracing};
use convo_types::config::ServiceConfig;

use cli::{Cli, Commands, HistoryCommand};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need config or logging
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "convo", &mut std::io::stdout());
        return Ok(());
    }

    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "info",
        1 => "info,convo_api=debug,convo_core=debug,convo_infra=debug",
        _ => "trace",
    };
    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Pretty
    };
    init_tracing(filter, format, cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let config = load_config(&config_path)
        .await
        .with_context(|| format!("loading {}", config_path.display()))?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            api_key,
        } => {
            let mut config = config;
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(host) = host {
                config.server.host = host;
            }
            serve(config, api_key).await?;
        }

        Commands::History { action } => match action {
            HistoryCommand::Show { session_id } => {
                cli::history::show(&config, &session_id, cli.json).await?;
            }
            HistoryCommand::Clear { session_id } => {
                cli::history::clear(&config, &session_id, cli.json).await?;
            }
        },

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}

async fn serve(config: ServiceConfig, api_key: Option<String>) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let idle_timeout = config.history.memory.idle_timeout_secs;
    let sweep_every = Duration::from_secs(config.history.memory.sweep_interval_secs.max(1));

    let state = AppState::init(config, api_key).await?;

    let cancel = CancellationToken::new();
    let sweeper = match (state.memory_store.clone(), idle_timeout) {
        (Some(store), Some(idle_secs)) => Some(sweeper::spawn_idle_sweeper(
            store,
            Duration::from_secs(idle_secs),
            sweep_every,
            cancel.clone(),
        )),
        _ => None,
    };

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    println!(
        "  {} convo listening on {} ({} history)",
        console::style("⚡").bold(),
        console::style(format!("http://{addr}")).cyan(),
        state.backend_name()
    );
    println!("  {}", console::style("Press Ctrl+C to stop").dim());

    let router = http::router::build_router(state);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cancel.cancel();
    if let Some(handle) = sweeper {
        let _ = handle.await;
    }

    println!("\n  Server stopped.");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
