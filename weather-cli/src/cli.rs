use std::process::ExitCode;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tokio::sync::broadcast::{self, error::RecvError};
use weather_core::{Config, WeatherApiClient, WeatherResult, WeatherStore};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather CLI")]
pub struct Cli {
    /// WeatherAPI.com key; overrides the one saved by `weather configure`.
    #[arg(long, global = true, env = "WEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Save an API key and endpoint to the config file.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, sent to the API as typed.
        city: String,

        /// Print the decoded response as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Prompt for cities repeatedly until Esc or Ctrl-C.
    Search,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        match self.command {
            Command::Configure => {
                configure()?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, json } => {
                let store = build_store(self.api_key.as_deref())?;
                let outcome = show(&store, city, json).await?;
                Ok(match outcome {
                    WeatherResult::Success(_) => ExitCode::SUCCESS,
                    _ => ExitCode::FAILURE,
                })
            }
            Command::Search => {
                let store = build_store(self.api_key.as_deref())?;
                search(&store).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

fn build_store(api_key: Option<&str>) -> anyhow::Result<WeatherStore> {
    let config = Config::load()?;
    let api = config.api_config(api_key)?;
    let client = WeatherApiClient::new(api)?;
    Ok(WeatherStore::new(client))
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let base_url = Text::new("API base URL:")
        .with_default(config.base_url())
        .prompt()
        .context("Failed to read base URL")?;

    config.api_key = Some(api_key.trim().to_string());
    config.base_url = Some(base_url.trim().to_string());

    // Validate before writing so a bad URL never lands on disk.
    config.api_config(None)?;
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

async fn show(store: &WeatherStore, city: String, json: bool) -> anyhow::Result<WeatherResult> {
    let transitions = store.transitions();
    let _handle = store.fetch(city);

    settle(transitions, |result| match (json, result) {
        (true, WeatherResult::Success(model)) => match serde_json::to_string_pretty(model) {
            Ok(out) => println!("{out}"),
            Err(err) => eprintln!("Failed to serialize response: {err}"),
        },
        (true, WeatherResult::Error(_)) => eprintln!("{}", render(Some(result))),
        (true, WeatherResult::Loading) => {}
        (false, _) => println!("{}", render(Some(result))),
    })
    .await
}

async fn search(store: &WeatherStore) -> anyhow::Result<()> {
    println!("{}", render(store.current().as_ref()));

    loop {
        let prompt = tokio::task::spawn_blocking(prompt_city)
            .await
            .context("City prompt task failed")?;
        let city = match prompt {
            Ok(city) => city,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        let transitions = store.transitions();
        let _handle = store.fetch(city);
        settle(transitions, |result| println!("{}", render(Some(result)))).await?;
    }

    store.close();
    Ok(())
}

/// Blocks on terminal input; run it off the async workers.
fn prompt_city() -> Result<String, InquireError> {
    Text::new("City:").with_placeholder("Enter city").prompt()
}

/// Hand every transition to `on_state` until the lookup settles.
async fn settle(
    mut transitions: broadcast::Receiver<WeatherResult>,
    mut on_state: impl FnMut(&WeatherResult),
) -> anyhow::Result<WeatherResult> {
    loop {
        match transitions.recv().await {
            Ok(result) => {
                on_state(&result);
                if result.is_terminal() {
                    return Ok(result);
                }
            }
            Err(RecvError::Lagged(_)) => continue,
            Err(RecvError::Closed) => bail!("weather store shut down before the lookup settled"),
        }
    }
}
