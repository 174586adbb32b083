use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use fincalc::api::{Cli, Command, build_input, build_project_response, goal_config};
use fincalc::config::ServerConfig;
use fincalc::core::{DEFAULT_MAX_HORIZON_YEARS, solve_goal};

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve { port, config } => {
            let mut server_config = ServerConfig::load(config.as_deref())?;
            if let Some(port) = port {
                server_config.port = port;
            }
            init_tracing(&server_config.log_filter);
            tracing::info!(
                "fincalc v{} (config: {})",
                env!("CARGO_PKG_VERSION"),
                config
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "defaults".to_string())
            );
            fincalc::api::run_http_server(server_config).await?;
        }
        Command::Project { plan, yearly } => {
            init_tracing("warn");
            let input = build_input(plan, DEFAULT_MAX_HORIZON_YEARS)?;
            let response = build_project_response(&input, yearly);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Command::Goal { plan, goal } => {
            init_tracing("warn");
            let input = build_input(plan, DEFAULT_MAX_HORIZON_YEARS)?;
            let result = solve_goal(&input, goal_config(&goal))?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
