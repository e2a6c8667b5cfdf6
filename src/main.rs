//! AniList Spinner
//!
//! Fetches the shows a user is watching, weights each one by the minutes left
//! to watch, prints a summary and opens a wheel to pick what to watch next.

mod anime;
mod audio;
mod color;
mod config;
mod gui;
mod logging;
mod report;
mod wheel;

use clap::{CommandFactory, Parser};
use std::path::PathBuf;

use crate::anime::AnimeEntry;
use crate::wheel::items::{build_weighted_items, WeightedItem};

#[derive(Parser)]
#[command(name = "anilist_spinner")]
#[command(about = "Spin a wheel of the anime you're watching, weighted by time left")]
struct Cli {
    /// AniList username
    username: Option<String>,

    /// AniList media ids
    ids: Vec<u32>,

    /// Disable spinning, hides button
    #[arg(long)]
    no_spin: bool,

    /// Disable screen shake
    #[arg(long)]
    no_shake: bool,

    /// Disable sounds
    #[arg(long)]
    no_sound: bool,

    /// Between 0 and 1
    #[arg(long)]
    volume: Option<f32>,

    /// Print the summary and exit without opening the wheel
    #[arg(long)]
    no_window: bool,

    /// Path to spinner.yaml config
    #[arg(short, long, default_value = "spinner.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = config::Env::load();

    // Initialize logging first
    logging::init_logging(&env.log_dir)?;
    tracing::info!("AniList Spinner starting up");

    let cli = Cli::parse();
    tracing::debug!("CLI args parsed: config={:?}", cli.config);

    let mut config = if cli.config.exists() {
        tracing::info!("Loading config from {:?}", cli.config);
        config::Config::load(&cli.config)?
    } else {
        tracing::warn!("Config file not found: {:?}, using defaults", cli.config);
        config::Config::default()
    };
    if let Some(volume) = cli.volume {
        config.audio.volume = volume.clamp(0.0, 1.0);
    }
    if let Some(url) = &env.api_url {
        config.anilist.api_url = url.clone();
    }

    let entries = if env.test_data {
        tracing::info!("TEST_DATA set, using built-in entries");
        anime::test_entries()
    } else {
        let username = match (&cli.username, cli.ids.is_empty()) {
            (Some(username), false) => username.clone(),
            _ => {
                Cli::command().print_help()?;
                return Ok(());
            }
        };

        anime::fetch_all(&config.anilist.api_url, &username, &cli.ids)
            .await
            .inspect_err(|e| {
                crate::log_error!(e, username = %username);
            })?
    };

    let (entries, items) = prepare_wheel(entries)?;
    report::print_report(&entries);

    if cli.no_window {
        return Ok(());
    }

    let options = gui::ViewOptions {
        no_spin: cli.no_spin,
        no_shake: cli.no_shake,
        no_sound: cli.no_sound,
    };

    tracing::info!("Launching wheel window");
    gui::run_spinner(entries, items, config, options)
}

/// Weight entries by minutes left and shorten their titles
fn prepare_wheel(mut entries: Vec<AnimeEntry>) -> anyhow::Result<(Vec<AnimeEntry>, Vec<WeightedItem>)> {
    for entry in &mut entries {
        entry.title = anime::shorten_title(&entry.title);
    }

    let minutes: Vec<f64> = entries.iter().map(|e| e.minutes_left as f64).collect();
    let titles: Vec<String> = entries.iter().map(|e| e.title.clone()).collect();

    let items = build_weighted_items(&minutes, &titles)
        .map_err(|e| anyhow::anyhow!("Nothing left to watch: {}", e))?;
    tracing::info!("Wheel has {} entries, {} minutes left", items.len(), minutes.iter().sum::<f64>());

    Ok((entries, items))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_wheel_test_data() {
        let (entries, items) = prepare_wheel(anime::test_entries()).unwrap();
        assert_eq!(entries[1].title, "anime b");
        assert_eq!(items[3].label, "anime d");

        let sum: f64 = items.iter().map(|i| i.weight).sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((items[0].weight - 361.0 / 1418.0).abs() < 1e-9);
    }

    #[test]
    fn test_prepare_wheel_rejects_finished_shows() {
        let entries = vec![AnimeEntry::new("done", 12, 12, 24, "#ffffff")];
        assert!(prepare_wheel(entries).is_err());
    }

    #[test]
    fn test_cli_parses_username_and_ids() {
        let cli = Cli::try_parse_from(["anilist_spinner", "--no-shake", "--volume", "0.5", "someone", "1", "20"]).unwrap();
        assert_eq!(cli.username.as_deref(), Some("someone"));
        assert_eq!(cli.ids, vec![1, 20]);
        assert!(cli.no_shake);
        assert!(!cli.no_spin);
        assert_eq!(cli.volume, Some(0.5));
    }
}
