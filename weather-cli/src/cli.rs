use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use weather_core::{
    CachedProvider, Config, OpenWeatherProvider, Theme, UnitSystem, provider_from_config,
};

use crate::{configure, interactive, map, render, session::Session};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather dashboard for the terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive dashboard (the default when no command is given).
    Dashboard {
        /// "metric" or "imperial"; defaults to the configured units.
        #[arg(long)]
        units: Option<UnitSystem>,

        /// "light" or "dark"; defaults to the configured theme.
        #[arg(long)]
        theme: Option<Theme>,
    },

    /// Show current weather and the 5-day forecast for a location.
    Show {
        /// City name, optionally with state and country code, e.g. "Portland,OR,US".
        location: String,

        #[arg(long)]
        units: Option<UnitSystem>,

        #[arg(long)]
        theme: Option<Theme>,
    },

    /// Search for a location and show matches on a map.
    Search {
        query: String,

        /// Maximum number of matches.
        #[arg(long)]
        limit: Option<u8>,
    },

    /// Store the API key and display preferences.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command.unwrap_or(Command::Dashboard { units: None, theme: None }) {
            Command::Configure => configure::run(&mut config),
            Command::Dashboard { units, theme } => {
                let mut session = start(&config)?;
                apply_overrides(&mut session, units, theme);
                interactive::run(&mut session).await
            }
            Command::Show { location, units, theme } => {
                let mut session = start(&config)?;
                apply_overrides(&mut session, units, theme);
                let ctx = session.render_context();
                let dashboard = session
                    .dashboard(&location)
                    .await
                    .map_err(|e| anyhow!(e.user_message()))?;
                print!("{}", render::dashboard(&ctx, &dashboard));
                Ok(())
            }
            Command::Search { query, limit } => {
                let mut session = start(&config)?;
                if let Some(limit) = limit {
                    session.geocode_limit = limit;
                }
                let found = session.search(&query).await.map_err(|e| anyhow!(e.user_message()))?;
                print!("{}", map::map_view(&session.render_context(), &session.map, &found));
                Ok(())
            }
        }
    }
}

/// Build the session. A missing API key stops the program here, before any request.
fn start(config: &Config) -> anyhow::Result<Session<CachedProvider<OpenWeatherProvider>>> {
    let provider = provider_from_config(config).context("Cannot start the weather dashboard")?;
    Ok(Session::new(config, provider))
}

fn apply_overrides<P>(session: &mut Session<P>, units: Option<UnitSystem>, theme: Option<Theme>) {
    if let Some(units) = units {
        session.units = units;
    }
    if let Some(theme) = theme {
        session.theme = theme;
    }
}
