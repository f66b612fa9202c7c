use anyhow::Result;
use inquire::{Password, PasswordDisplayMode, Select};
use weather_core::{Config, Theme, UnitSystem, config::API_KEY_ENV};

/// Interactive configuration: API key, default units and theme.
pub fn run(config: &mut Config) -> Result<()> {
    let has_key = config.api_key.is_some();
    let help = if has_key {
        "Leave empty to keep the stored key"
    } else {
        "Create one at https://home.openweathermap.org/api_keys"
    };

    let key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message(help)
        .prompt()?;

    if !key.trim().is_empty() {
        config.set_api_key(key);
    } else if !has_key {
        println!("No API key stored. Set {API_KEY_ENV} before running the dashboard.");
    }

    let units = UnitSystem::all().to_vec();
    let units_cursor = units.iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Default units:", units)
        .with_starting_cursor(units_cursor)
        .prompt()?;

    let themes = vec![Theme::Light, Theme::Dark];
    let theme_cursor = themes.iter().position(|t| *t == config.theme).unwrap_or(0);
    config.theme = Select::new("Theme:", themes)
        .with_starting_cursor(theme_cursor)
        .prompt()?;

    let path = config.save()?;
    tracing::info!(path = %path.display(), "configuration saved");
    println!("Configuration saved to {}", path.display());

    Ok(())
}
