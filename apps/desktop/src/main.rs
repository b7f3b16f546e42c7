use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client_core::{
    config::load_settings_from, conversation::QUICK_SUGGESTIONS, load_settings,
    ConversationController, Dashboard, DealController, FilterToken, HttpFoodApi,
    RecommendationController,
};
use shared::domain::Location;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod render;
mod tour;

#[derive(Parser, Debug)]
#[command(about = "Food recommendations, deals and chat from the terminal")]
struct Args {
    /// Backend base url; overrides the settings file and environment.
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long, default_value = "Mumbai")]
    location: Location,
    /// Settings file; `client.toml` in the working directory when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// All views for --location, then again for each switched-to location.
    Dashboard {
        #[arg(long = "switch-to")]
        switches: Vec<Location>,
        /// Questions for the food assistant, asked after the last switch.
        #[arg(long = "ask")]
        questions: Vec<String>,
    },
    /// Personalised dishes with weather and festival context.
    Recommendations,
    /// Current deals and their summary.
    Deals {
        /// Show deals matching any of these (high, medium, clearance, closing_soon, innovative).
        #[arg(long = "filter")]
        filters: Vec<FilterToken>,
    },
    /// Send messages to the food assistant, one after another.
    Chat { messages: Vec<String> },
    /// Backend capability report.
    Status,
    /// Cities offered by the location picker.
    Locations,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => load_settings_from(path)?,
        None => load_settings()?,
    };
    if let Some(url) = &args.api_base_url {
        settings.set_api_base_url(url)?;
    }
    info!("desktop: backend={} location={}", settings.api_base_url, args.location);
    let api = HttpFoodApi::shared(settings.clone())?;

    let mut out = String::new();
    match args.command {
        Command::Dashboard {
            switches,
            questions,
        } => {
            let dashboard = Dashboard::mount(api, settings, args.location).await;
            out = tour::walk(&dashboard, &switches, &questions).await?;
        }
        Command::Recommendations => {
            let mut controller = RecommendationController::new(api, settings);
            controller.refresh(&args.location).await;
            render::recommendations(&mut out, &controller.view().await, controller.current_time())?;
            controller.stop_clock();
        }
        Command::Deals { filters } => {
            let controller = DealController::new(api);
            controller.refresh(&args.location).await;
            for token in filters {
                controller.toggle_filter(token).await;
            }
            render::deals(&mut out, &controller.view().await)?;
        }
        Command::Chat { messages } => {
            if messages.is_empty() {
                println!("Try one of:");
                for suggestion in QUICK_SUGGESTIONS {
                    println!("  - {suggestion}");
                }
                return Ok(());
            }
            let controller = ConversationController::new(api, &args.location);
            for message in &messages {
                controller.submit(message, &args.location).await;
            }
            render::transcript(&mut out, &controller.view().await)?;
        }
        Command::Status => {
            let status = api.system_status().await?;
            out = serde_json::to_string_pretty(&status)?;
        }
        Command::Locations => {
            for location in Location::supported() {
                println!("{location}");
            }
        }
    }
    if !out.is_empty() {
        println!("{}", out.trim_end());
    }

    Ok(())
}
