use anyhow::Result;

use skycast_app::{Controller, Horizon};
use skycast_core::{AppError, Config};

#[tokio::main]
async fn main() -> Result<()> {
    skycast_core::init()?;

    let (config, _validation) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            let err = AppError::Other(e);
            tracing::error!("startup failed: {}", err);
            eprintln!("{}", err.user_message());
            return Ok(());
        }
    };
    tracing::info!("Skycast started");
    println!("Skycast - Weather Dashboard");
    println!("  Config directory: {}", config.config_dir.display());

    let mut controller = Controller::new(config)?;

    // Optional city argument; nothing to show without one
    let Some(city) = std::env::args().nth(1) else {
        println!("\nUsage: skycast <city>");
        return Ok(());
    };

    controller.search_city(&city).await;
    controller.select_horizon(Horizon::Daily).await;

    if let Some(alert) = controller.alerts.current() {
        println!("\n[{:?}] {}", alert.level, alert.message);
    }

    if let Some(card) = controller.dashboard.weather_card() {
        println!("\n{}", card.city_label);
        if let Some(description) = &card.description {
            println!("  {}", description);
        }
        println!("  Temperature: {}°", card.temp);
        if let Some(feels_like) = card.feels_like {
            println!("  Feels like:  {}°", feels_like);
        }
        if let Some(humidity) = card.humidity {
            println!("  Humidity:    {}%", humidity);
        }
        if let Some(aqi) = &card.aqi_label {
            println!("  Air quality: {}", aqi);
        }
        println!("  Updated:     {} UTC", card.last_updated);
    }

    if !controller.dashboard.daily_cards().is_empty() {
        println!("\n5-day forecast:");
        for day in controller.dashboard.daily_cards() {
            let pop = day
                .precipitation_pct
                .map(|p| format!("  {}% precip", p))
                .unwrap_or_default();
            println!(
                "  {}  {}° / {}°{}",
                day.label,
                day.primary_temp,
                day.secondary_temp.unwrap_or(day.primary_temp),
                pop
            );
        }
    }

    Ok(())
}
