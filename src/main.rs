mod app;

use anyhow::Result;
use glass_core::Config;
use glass_weather::rain::{intensity_text, POINTS};

use crate::app::Dashboard;

#[tokio::main]
async fn main() -> Result<()> {
    glass_core::init()?;

    // Errors abort here; warnings are logged by the loader.
    let (config, _) = Config::load_validated()?;

    let mut dashboard = Dashboard::new(config).inspect_err(|e| {
        eprintln!("{}", e.user_message());
    })?;
    dashboard.initialize();

    tracing::info!("Weather Glass started");

    println!("Weather Glass");
    println!("  Data directory: {}", dashboard.config().data_dir.display());
    println!("  Theme: {}", dashboard.themes.current_theme().name);
    match dashboard.preferences.get().derived().refresh_interval {
        Some(every) => println!("  Auto refresh: every {} min", every.as_secs() / 60),
        None => println!("  Auto refresh: off"),
    }
    println!(
        "  Widgets: {}",
        dashboard
            .layout
            .enabled_widgets()
            .iter()
            .map(|w| w.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    match dashboard.current_location().await {
        Some(here) => match dashboard.summary(here).await {
            Ok(summary) => {
                println!();
                if !summary.place.is_empty() {
                    println!("{}", summary.place);
                }
                println!("{}", summary.headline);
                for line in &summary.details {
                    println!("  {}", line);
                }
                println!("  \"{}\"", summary.comment);
                if let Some(aq) = &summary.air_quality {
                    println!("  Air quality: {} ({})", aq.aqi.level, aq.aqi.description);
                }
                if let Some(coverage) = summary.radar {
                    println!("  Radar coverage: {:?}", coverage);
                }
                if summary.rain.should_display() {
                    let peak = summary.rain.max_precipitation();
                    println!(
                        "  Next hour ({} steps{}): peak {} mm/h, {}",
                        POINTS,
                        if summary.rain.demo { ", demo" } else { "" },
                        peak,
                        intensity_text(peak)
                    );
                }
            }
            Err(e) => {
                tracing::error!("Weather fetch failed: {}", e);
                println!("\n{}", e.user_message());
            }
        },
        None => println!("\nNo location available. Set location.latitude/longitude in config."),
    }

    dashboard.shutdown();
    Ok(())
}
