use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use skysense_core::{
    Config, Controller, FileStore, HistoryStore, KeyValueStore, MemoryStore, Unit,
    gateway_from_config, render,
};
use tracing::warn;

use crate::session;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skysense", version, about = "Weather with AI insights")]
pub struct Cli {
    /// Display unit: c or f. Defaults to the configured unit.
    #[arg(long, global = true, value_parser = parse_unit)]
    pub unit: Option<Unit>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key, model, default city and unit.
    Configure,

    /// Show weather for a city.
    Show {
        /// City name.
        city: String,
    },

    /// Show or clear recent searches.
    History {
        /// Remove all recent searches.
        #[arg(long)]
        clear: bool,
    },

    /// Start an interactive session (the default).
    Interactive,
}

fn parse_unit(value: &str) -> Result<Unit> {
    Unit::try_from(value)
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;
        let unit = self.unit.unwrap_or(config.unit);

        match self.command.unwrap_or(Command::Interactive) {
            Command::Configure => configure(config),
            Command::Show { city } => {
                let mut controller = build_controller(&config)?.with_unit(unit);
                controller.search(&city).await;
                print!("{}", render::render_view(&controller));

                if controller.error().is_some() {
                    bail!("no weather available for '{}'", city.trim());
                }
                Ok(())
            }
            Command::History { clear } => {
                let mut store = history_store();
                if clear {
                    store.clear()?;
                    println!("Search history cleared.");
                } else {
                    print!("{}", render::render_history(&store.load(), unit));
                }
                Ok(())
            }
            Command::Interactive => {
                let controller = build_controller(&config)?.with_unit(unit);
                session::run(controller).await
            }
        }
    }
}

fn build_controller(config: &Config) -> Result<Controller> {
    let gateway = gateway_from_config(config)?;
    Ok(Controller::new(gateway, history_store(), config.default_city()))
}

/// History persisted in the data directory, or kept in memory when the
/// platform has none.
fn history_store() -> HistoryStore {
    let store: Box<dyn KeyValueStore> = match FileStore::in_data_dir() {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "search history will not be persisted");
            Box::new(MemoryStore::new())
        }
    };

    HistoryStore::new(store)
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = Password::new("Gemini API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.gemini.api_key = Some(api_key.trim().to_string());
    }

    let model = Text::new("Model:")
        .with_default(config.model())
        .prompt()
        .context("Failed to read model")?;
    config.gemini.model = Some(model.trim().to_string()).filter(|m| !m.is_empty());

    let city = Text::new("Default city:")
        .with_default(config.default_city())
        .prompt()
        .context("Failed to read default city")?;
    config.default_city = city.trim().to_string();

    let units = vec![Unit::Celsius, Unit::Fahrenheit];
    let start = units.iter().position(|u| *u == config.unit).unwrap_or(0);
    config.unit = Select::new("Unit:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read unit")?;

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}
