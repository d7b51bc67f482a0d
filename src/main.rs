// Copyright (c) 2024 Nexus. All rights reserved.

mod api;
mod cli_messages;
mod config;
mod consts;
mod environment;
mod error_classifier;
mod events;
mod logging;
mod push;
mod reconcile;
mod session;
mod ui;
mod workers;

use crate::api::types::{ExportFormat, RegionKind};
use crate::api::{ApiClient, ElectionApi};
use crate::config::{Config, get_config_path};
use crate::environment::Environment;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use crate::workers::export::{default_file_name, export_to_file};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Live election results dashboard
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open the live dashboard
    Start {
        /// Region code to show first, e.g. CZ or CZ010
        #[arg(long, value_name = "REGION")]
        region: Option<String>,

        /// Backend: local, production, or a base URL
        #[arg(long, value_name = "ENV")]
        env: Option<String>,

        /// Seconds between refreshes while the push channel is up or down
        #[arg(long, value_name = "SECS")]
        refresh_secs: Option<u64>,

        /// Run without the terminal UI and log activity instead
        #[arg(long, default_value = "false")]
        headless: bool,

        /// Disable background colour in the TUI
        #[arg(long, default_value = "false")]
        no_background_color: bool,
    },
    /// Download the results of a region as CSV or JSON
    Export {
        /// Region code to export
        #[arg(long, value_name = "REGION")]
        region: Option<String>,

        /// File format
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,

        /// Target file; defaults to a timestamped name in the current directory
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Backend: local, production, or a base URL
        #[arg(long, value_name = "ENV")]
        env: Option<String>,
    },
    /// List the region codes the backend knows
    Regions {
        /// Backend: local, production, or a base URL
        #[arg(long, value_name = "ENV")]
        env: Option<String>,
    },
    /// Inspect or change the saved preferences
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the saved preferences
    Show,
    /// Save preferences used when flags are omitted
    Set {
        #[arg(long, value_name = "REGION")]
        region: Option<String>,

        #[arg(long, value_name = "ENV")]
        env: Option<String>,

        #[arg(long, value_name = "SECS")]
        refresh_secs: Option<u64>,

        #[arg(long, value_name = "N")]
        candidate_limit: Option<u32>,
    },
    /// Delete the configuration file
    Clear,
}

/// Picks the backend: flag, then `VOLBY_ENVIRONMENT`, then the saved config.
fn resolve_environment(flag: Option<&str>, config: &Config) -> Result<Environment, String> {
    let env_var = std::env::var("VOLBY_ENVIRONMENT").ok();
    let chosen = flag
        .map(str::to_string)
        .or(env_var.filter(|v| !v.trim().is_empty()))
        .or_else(|| config.environment.clone());
    match chosen {
        None => Ok(Environment::default()),
        Some(value) => value
            .parse::<Environment>()
            .map_err(|_| format!("Unknown environment: {}", value)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Start {
            region,
            env,
            refresh_secs,
            headless,
            no_background_color,
        } => {
            let config = Config::load_or_default(&config_path)?;
            let environment = resolve_environment(env.as_deref(), &config)?;
            let region = region.unwrap_or(config.default_region);
            let refresh = Duration::from_secs(
                refresh_secs.unwrap_or(config.refresh_interval_secs).max(1),
            );

            let data = setup_session(environment, region, refresh).await?;
            if headless {
                run_headless_mode(data, config.candidate_limit).await
            } else {
                run_tui_mode(data, !no_background_color, config.candidate_limit).await
            }
        }
        Command::Export {
            region,
            format,
            output,
            env,
        } => {
            let config = Config::load_or_default(&config_path)?;
            let environment = resolve_environment(env.as_deref(), &config)?;
            let region = region.unwrap_or(config.default_region);
            let path = output.unwrap_or_else(|| PathBuf::from(default_file_name(&region, format)));

            let client = ApiClient::new(environment)?;
            match export_to_file(&client, &region, format, &path).await {
                Ok(bytes) => {
                    print_cmd_success!("Export complete", "{} bytes written to {}", bytes, path.display());
                    Ok(())
                }
                Err(e) => {
                    print_cmd_error!("Export failed", e.to_string().as_str());
                    Err(e.into())
                }
            }
        }
        Command::Regions { env } => {
            let config = Config::load_or_default(&config_path)?;
            let environment = resolve_environment(env.as_deref(), &config)?;
            let client = ApiClient::new(environment)?;
            let regions = client.regions().await?;
            for kind in [RegionKind::Kraj, RegionKind::Okres] {
                for region in regions.iter().filter(|r| r.kind == kind) {
                    println!("{:<8} {:<6} {}", region.code, kind.to_string(), region.name);
                }
            }
            Ok(())
        }
        Command::Config { action } => match action {
            ConfigAction::Show => {
                let config = Config::load_or_default(&config_path)?;
                print_cmd_info!("Config file", "{}", config_path.display());
                println!("{}", serde_json::to_string_pretty(&config)?);
                Ok(())
            }
            ConfigAction::Set {
                region,
                env,
                refresh_secs,
                candidate_limit,
            } => {
                let mut config = Config::load_or_default(&config_path)?;
                if let Some(env) = env {
                    if env.parse::<Environment>().is_err() {
                        return Err(format!("Unknown environment: {}", env).into());
                    }
                    config.environment = Some(env);
                }
                if let Some(region) = region {
                    config.default_region = region;
                }
                if let Some(secs) = refresh_secs {
                    config.refresh_interval_secs = secs.max(1);
                }
                if let Some(limit) = candidate_limit {
                    config.candidate_limit = limit;
                }
                config.save(&config_path)?;
                print_cmd_success!("Configuration saved", "{}", config_path.display());
                Ok(())
            }
            ConfigAction::Clear => {
                println!("Clearing dashboard configuration file...");
                Config::clear(&config_path).map_err(Into::into)
            }
        },
    }
}
