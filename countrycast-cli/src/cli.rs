use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use countrycast_core::{Config, DayLabels, Pipeline};
use inquire::{CustomType, Select, Text};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "countrycast", version, about = "Country weather and travel tips")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show country info, forecast and a travel tip.
    Show {
        /// Country name, any case. Prompted for when absent.
        country: Option<String>,

        /// Print HTML instead of plain text.
        #[arg(long)]
        html: bool,

        /// Label days "Day 1", "Day 2", ... instead of weekday names.
        #[arg(long)]
        ordinal: bool,
    },

    /// List the countries in the dataset.
    Countries {
        /// Only names containing this text (case-insensitive).
        #[arg(long)]
        filter: Option<String>,
    },

    /// Interactively edit the configuration.
    Configure,

    /// Print the configuration file path.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { country, html, ordinal } => {
                let config = Config::load()?;
                show(&config, country, html, ordinal).await
            }
            Command::Countries { filter } => {
                let config = Config::load()?;
                countries(&config, filter.as_deref()).await
            }
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn show(
    config: &Config,
    country: Option<String>,
    html: bool,
    ordinal: bool,
) -> anyhow::Result<()> {
    let mut pipeline = Pipeline::from_config(config)?;
    if ordinal {
        pipeline.options_mut().day_labels = DayLabels::Ordinal;
    }

    // The dataset loads while the user is typing.
    pipeline.spawn_load();

    let input = match country {
        Some(c) => c,
        None => Text::new("Country:")
            .with_help_message("e.g. France")
            .prompt()
            .context("Failed to read country name")?,
    };

    let submission = pipeline
        .submit(&input)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;

    if html {
        println!("{}", submission.page.to_html());
    } else {
        print!("{}", submission.page.to_text());
    }

    Ok(())
}

async fn countries(config: &Config, filter: Option<&str>) -> anyhow::Result<()> {
    let pipeline = Pipeline::from_config(config)?;
    pipeline.load().await;

    let records = pipeline.catalog().ready(config.dataset_wait()).await?;
    if records.is_empty() {
        return Err(anyhow!("Country dataset is unavailable. Check your connection and try again."));
    }

    let needle = filter.map(str::to_lowercase);
    let mut names: Vec<&str> = records
        .iter()
        .map(|r| r.name.as_str())
        .filter(|name| needle.as_deref().is_none_or(|n| name.to_lowercase().contains(n)))
        .collect();
    names.sort_unstable();

    for name in names {
        println!("{name}");
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let days = CustomType::<u8>::new("Forecast days (1-16, 0 for the API default):")
        .with_default(config.forecast_days.unwrap_or(0))
        .prompt()
        .context("Failed to read forecast days")?;
    config.set_forecast_days((days != 0).then_some(days))?;

    let labels = [DayLabels::Weekday, DayLabels::Ordinal];
    let start = labels.iter().position(|l| *l == config.day_labels).unwrap_or(0);
    let choice = Select::new("Day labels:", vec!["weekday names", "Day 1, Day 2, ..."])
        .with_starting_cursor(start)
        .raw_prompt()
        .context("Failed to read day label style")?;
    config.day_labels = labels[choice.index];

    config.request_timeout_secs = CustomType::<u64>::new("HTTP timeout (seconds):")
        .with_default(config.request_timeout_secs)
        .prompt()
        .context("Failed to read HTTP timeout")?;

    config.dataset_wait_secs = CustomType::<u64>::new("Wait for country dataset (seconds):")
        .with_default(config.dataset_wait_secs)
        .prompt()
        .context("Failed to read dataset wait")?;

    config.save()?;
    println!("Configuration saved to {}", Config::config_file_path()?.display());

    Ok(())
}
