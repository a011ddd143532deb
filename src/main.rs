use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use stratus_weather::location::{AlwaysGranted, StaticSource};
use stratus_weather::provider::AssumeOnline;
use stratus_weather::{
    Coordinate, DisplayModel, LocationAcquirer, WeatherCache, WeatherPipeline, WeatherPresenter,
    WeatherProvider,
};

/// Console rendering of a display model. Stands in for the widget tree;
/// anything rendering a DisplayModel is swappable.
fn render(model: &DisplayModel) {
    println!("  {} - {}", model.condition, model.description);
    println!(
        "  {} ({} / {})",
        model.temperature, model.temperature_min, model.temperature_max
    );
    println!("  {}, {}", model.location_name, model.country);
    println!("  Sunrise {}  Sunset {}", model.sunrise, model.sunset);
    if let Some(icon) = model.icon {
        println!("  Icon: {}", icon.asset_name());
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize core
    stratus_core::init()?;

    let (config, _validation) = stratus_core::Config::load_validated()?;

    let api_key = config
        .api_key()
        .context("No API key configured; set api.api_key or OPENWEATHER_API_KEY")?;

    // No positioning service on this host; the configured fallback
    // coordinate plays the role of the platform location collaborator.
    let fallback = config
        .location
        .fallback
        .context("No location available; set location.fallback in the config file")?;
    let source = Arc::new(StaticSource::new(Coordinate {
        latitude: fallback.latitude,
        longitude: fallback.longitude,
    }));
    let acquirer = LocationAcquirer::new(
        source,
        Arc::new(AlwaysGranted),
        Duration::from_secs(config.location.fix_timeout_secs),
    );

    let provider = WeatherProvider::new(
        &config.api.base_url,
        &api_key,
        &config.api.units,
        Duration::from_secs(config.api.http_timeout_secs),
        Arc::new(AssumeOnline),
    )?;

    std::fs::create_dir_all(&config.config_dir)
        .context("Failed to create application data directory")?;
    let cache = WeatherCache::new(config.cache_db_path(), &config.cache.key)?;

    let presenter = WeatherPresenter::new(config.display.effective_region());
    let pipeline = WeatherPipeline::new(acquirer, provider, cache, presenter);

    // Startup path: show the last cached record, if any, before refreshing.
    if let Some(model) = pipeline.cached() {
        println!("Last known conditions:");
        render(&model);
    }

    println!("Fetching current weather...");
    match pipeline.refresh().await {
        Ok(model) => {
            println!("Current conditions:");
            render(&model);
        }
        Err(e) => {
            tracing::error!("Refresh failed: {}", e);
            // The cached view above, when present, remains the display.
            eprintln!("{}", e.user_message());
        }
    }

    Ok(())
}
