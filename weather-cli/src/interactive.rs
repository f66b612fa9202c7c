//! Menu-driven dashboard loop. A failed action prints its error and the loop
//! carries on. Cancelling the menu, choosing Quit or a configuration error
//! ends it.

use anyhow::{Result, anyhow};
use inquire::{InquireError, Select, Text};
use std::fmt;
use weather_core::{WeatherError, WeatherProvider};

use crate::{map, render, session::Session, theme::RenderContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    CitySearch,
    MapSearch,
    SwitchUnits,
    SwitchTheme,
    Quit,
}

impl Action {
    const ALL: [Action; 5] = [
        Action::CitySearch,
        Action::MapSearch,
        Action::SwitchUnits,
        Action::SwitchTheme,
        Action::Quit,
    ];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::CitySearch => "City search",
            Action::MapSearch => "Map search",
            Action::SwitchUnits => "Switch units",
            Action::SwitchTheme => "Switch theme",
            Action::Quit => "Quit",
        })
    }
}

fn is_cancel(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}

/// Ask for a line of text. `None` when cancelled or left blank.
fn ask_text(message: &str, placeholder: &str) -> Result<Option<String>> {
    match Text::new(message).with_placeholder(placeholder).prompt() {
        Ok(text) => {
            let text = text.trim().to_string();
            Ok((!text.is_empty()).then_some(text))
        }
        Err(e) if is_cancel(&e) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Print a failed action and keep going, unless the error cannot be fixed
/// from inside the session.
fn report(ctx: &RenderContext, err: WeatherError) -> Result<()> {
    if !err.is_recoverable() {
        return Err(anyhow!(err.user_message()));
    }
    eprintln!("{}", render::error(ctx, &err));
    Ok(())
}

async fn show_dashboard<P: WeatherProvider>(session: &Session<P>, location: &str) -> Result<()> {
    let ctx = session.render_context();
    match session.dashboard(location).await {
        Ok(dashboard) => println!("\n{}", render::dashboard(&ctx, &dashboard)),
        Err(e) => {
            tracing::warn!(error = %e, location, "dashboard failed");
            report(&ctx, e)?;
        }
    }
    Ok(())
}

async fn map_search<P: WeatherProvider>(session: &Session<P>, query: &str) -> Result<()> {
    let ctx = session.render_context();
    let found = match session.search(query).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!(error = %e, query, "location search failed");
            return report(&ctx, e);
        }
    };

    println!("\n{}", map::map_view(&ctx, &session.map, &found));
    if found.is_empty() {
        return Ok(());
    }

    let mut options: Vec<String> = found
        .iter()
        .enumerate()
        .map(|(idx, c)| format!("[{}] {}", map::marker_symbol(idx), c.label()))
        .collect();
    options.push("Back".to_string());

    let picked = match Select::new("Show weather for:", options).raw_prompt() {
        Ok(picked) => picked,
        Err(e) if is_cancel(&e) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    if let Some(candidate) = found.get(picked.index) {
        show_dashboard(session, &candidate.query()).await?;
    }
    Ok(())
}

pub async fn run<P: WeatherProvider>(session: &mut Session<P>) -> Result<()> {
    let ctx = session.render_context();
    println!("{}", ctx.palette.title.apply_to("Weather Dashboard"));
    println!("{}", ctx.palette.muted.apply_to("Real-time weather and forecasts from OpenWeather."));

    loop {
        let prompt = format!("[{} / {}] What next?", session.units, session.theme);
        let action = match Select::new(&prompt, Action::ALL.to_vec()).prompt() {
            Ok(action) => action,
            Err(e) if is_cancel(&e) => break,
            Err(e) => return Err(e.into()),
        };

        match action {
            Action::CitySearch => {
                if let Some(city) = ask_text("Enter city name:", "e.g., London")? {
                    show_dashboard(session, &city).await?;
                }
            }
            Action::MapSearch => {
                if let Some(query) = ask_text("Search location:", "Enter city, state, or country")? {
                    map_search(session, &query).await?;
                }
            }
            Action::SwitchUnits => {
                session.toggle_units();
                println!("Units: {}", session.units);
            }
            Action::SwitchTheme => {
                session.toggle_theme();
                println!("Theme: {}", session.theme);
            }
            Action::Quit => break,
        }
    }

    Ok(())
}
