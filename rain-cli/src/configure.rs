use anyhow::{Context, Result};
use inquire::{CustomType, Select, Text};
use rain_core::{Config, Coordinates, config::validate_coordinates};
use tracing::info;

const SET_POSITION: &str = "Use a fixed position";
const DENY: &str = "Refuse location requests";
const UNSUPPORTED: &str = "No geolocation on this machine";

/// Walk through every setting and save the result.
pub fn run() -> Result<()> {
    let mut config = Config::load()?;

    let geocoding_url = Text::new("Geocoding base URL:")
        .with_default(&config.endpoints.geocoding_url)
        .prompt()
        .context("Failed to read geocoding URL")?;
    let forecast_url = Text::new("Forecast base URL:")
        .with_default(&config.endpoints.forecast_url)
        .prompt()
        .context("Failed to read forecast URL")?;

    config.endpoints.geocoding_url = geocoding_url.trim().to_string();
    config.endpoints.forecast_url = forecast_url.trim().to_string();

    let mode = Select::new("Geolocation:", vec![SET_POSITION, DENY, UNSUPPORTED])
        .prompt()
        .context("Failed to read geolocation mode")?;

    match mode {
        SET_POSITION => {
            let current = config.geolocation.as_ref().and_then(|g| g.position());
            let position = prompt_position(current)?;
            config.set_position(position)?;
        }
        DENY => config.deny_geolocation(),
        _ => config.clear_geolocation(),
    }

    config.validate()?;
    config.save()?;

    let path = Config::config_file_path()?;
    info!("Saved configuration to {}", path.display());
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn prompt_position(current: Option<Coordinates>) -> Result<Coordinates> {
    let mut latitude = CustomType::<f64>::new("Latitude:")
        .with_error_message("Please type a number, e.g. 52.52");
    let mut longitude = CustomType::<f64>::new("Longitude:")
        .with_error_message("Please type a number, e.g. 13.41");

    if let Some(position) = current {
        latitude = latitude.with_default(position.latitude);
        longitude = longitude.with_default(position.longitude);
    }

    let position = Coordinates::new(
        latitude.prompt().context("Failed to read latitude")?,
        longitude.prompt().context("Failed to read longitude")?,
    );
    validate_coordinates(position)?;

    Ok(position)
}
