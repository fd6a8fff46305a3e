// Farm Countdown Dashboard
// Binary entry point: wires the HTTP fetcher and a console renderer into the
// engine and runs it as a long-lived process

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};

use farm_countdown::models::context::DisplayContext;
use farm_countdown::models::locale::{labels, Locale};
use farm_countdown::models::settings::EngineSettings;
use farm_countdown::services::engine::{CountdownEngine, CountdownRenderer, RenderUpdate};
use farm_countdown::services::schedule::fetcher::HttpScheduleFetcher;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    log::info!("Starting farm countdown dashboard");

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let settings = EngineSettings::load(&config_path)?;
    settings
        .validate()
        .map_err(|err| anyhow!("Invalid configuration in {}: {}", config_path.display(), err))?;

    let fetcher = HttpScheduleFetcher::new(&settings.feed_url, settings.fetch_timeout())
        .context("Failed to build schedule fetcher")?;

    let mut engine = CountdownEngine::new(
        settings,
        vec![DisplayContext::dashboard()],
        Arc::new(fetcher),
        Arc::new(ConsoleRenderer),
    );

    engine.start()?;
    engine.join();
    Ok(())
}

fn default_config_path() -> PathBuf {
    directories::ProjectDirs::from("", "", "farm-countdown")
        .map(|dirs| dirs.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("farm-countdown.toml"))
}

/// Minimal renderer: rewrites a single status line once per tick. All real
/// deployments plug their own renderer in; the engine does not care.
struct ConsoleRenderer;

impl CountdownRenderer for ConsoleRenderer {
    fn render(&self, _context: &DisplayContext, update: &RenderUpdate, locale: Locale) {
        let text = format_update(update, locale);
        print!("\r\x1b[2K{}", text);
        let _ = std::io::stdout().flush();
    }
}

fn format_update(update: &RenderUpdate, locale: Locale) -> String {
    let labels = labels(locale);
    match update {
        RenderUpdate::Loading => format!("⏳ {}", labels.loading),
        RenderUpdate::Unavailable => format!("⚠️ {}", labels.unavailable),
        RenderUpdate::Nothing => format!("📅 {}", labels.nothing_scheduled),
        RenderUpdate::Refreshing => format!("⏳ {}", labels.loading),
        RenderUpdate::Countdown {
            event,
            countdown,
            urgency,
            stale,
        } => {
            let mut line = format!("{} {}: ", event.icon, event.title_for(locale));
            if countdown.days > 0 {
                line.push_str(&format!("{} {} ", countdown.days, labels.day));
            }
            line.push_str(&format!(
                "{} {} {} {} {} {}",
                countdown.hours,
                labels.hour,
                countdown.minutes,
                labels.minute,
                countdown.seconds,
                labels.second,
            ));
            line.push_str(&format!(" [{}]", urgency.as_str()));
            if *stale {
                line.push_str(" (stale)");
            }
            line
        }
    }
}
