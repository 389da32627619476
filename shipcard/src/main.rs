//! Ship card generator.
//!
//! Pre-renders fire-arc icons and burns calibrated rulers into card
//! screenshots captured by the card template's browser run.

mod assets;
mod capture;
mod config;
mod pipeline;
mod sheet;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::capture::{CaptureDirRenderer, RenderSession};
use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "shipcard", version, about = "Fire-arc icons and ruler overlays for printable ship cards")]
struct Cli {
    /// Config file to use instead of the per-user one
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the fire-arc icons referenced by the card template
    Arcs {
        /// Icon directory (default: icon_dir from the config)
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Write one card sheet per ship for the browser step to lay out
    Sheets {
        /// Ships and weapons as JSON
        #[arg(long, value_name = "FILE")]
        deck: PathBuf,
        /// Directory the sheets (and later the screenshots) go to
        #[arg(long, value_name = "DIR")]
        out: PathBuf,
        /// Icon directory (default: icon_dir from the config)
        #[arg(long, value_name = "DIR")]
        icons: Option<PathBuf>,
    },
    /// Burn the ruler into a single card screenshot
    Ruler {
        /// Hull rating, e.g. "72/24"
        #[arg(long)]
        hull: String,
        /// Screenshot to process
        image: PathBuf,
        /// Output path (default: overwrite the screenshot)
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Finish a card for every ship in a deck
    Cards {
        /// Ships and weapons as JSON
        #[arg(long, value_name = "FILE")]
        deck: PathBuf,
        /// Directory holding one screenshot (and card sheet) per ship
        #[arg(long, value_name = "DIR")]
        captures: PathBuf,
        /// Output directory (default: output_dir from the config)
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
        /// Icon directory (default: icon_dir from the config)
        #[arg(long, value_name = "DIR")]
        icons: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config {
        /// Also save it as the per-user config file
        #[arg(long)]
        write: bool,
    },
}

fn main() -> ExitCode {
    // Structured logging. Use `RUST_LOG=debug` etc.; defaults to info.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default(),
    };

    match cli.command {
        Command::Arcs { dir } => {
            let icons = ie::arc::IconLibrary::new(dir.unwrap_or_else(|| config.icon_dir.clone()));
            let written = icons.generate(&ie::arc::ICON_COMBINATIONS, &config.theme)?;
            tracing::info!(count = written.len(), dir = %icons.dir().display(), "fire arc icons written");
        }
        Command::Sheets { deck, out, icons } => {
            let deck = data::Deck::load(&deck)?;
            let written = pipeline::write_sheets(&deck, &config.card_assets(icons), &out)?;
            tracing::info!(count = written.len(), dir = %out.display(), "card sheets written");
        }
        Command::Ruler { hull, image, out } => {
            let spec = ie::ruler::RulerSpec::new(data::hull_top_line_count(&hull)?);
            let font = load_font(&config)?;
            let ruler = ie::ruler::Ruler::new(&font, config.dpi, config.theme);
            let screenshot = ie::OwnedImage::open(&image)?;
            let out = out.unwrap_or(image);
            ruler.finish_card(screenshot, &spec, &config.print_format(), &out)?;
            tracing::info!(path = %out.display(), top_ticks = spec.top_line_count, "card saved");
        }
        Command::Cards { deck, captures, out, icons } => {
            let deck = data::Deck::load(&deck)?;
            let assets = config.card_assets(icons);
            let font = load_font(&config)?;
            let pipeline = pipeline::Pipeline {
                deck: &deck,
                assets: &assets,
                ruler: ie::ruler::Ruler::new(&font, config.dpi, config.theme),
                format: config.print_format(),
                output_dir: out.unwrap_or_else(|| config.output_dir.clone()),
            };

            let mut session = RenderSession::open(CaptureDirRenderer::new(captures)?);
            let written = pipeline.run(&mut session)?;
            session.close()?;
            tracing::info!(count = written.len(), dir = %pipeline.output_dir.display(), "images saved");
        }
        Command::Config { write } => {
            println!("{}", serde_json::to_string_pretty(&config).context("serialize config")?);
            if write {
                let path = config.save()?;
                tracing::info!(path = %path.display(), "config saved");
            }
        }
    }
    Ok(())
}

fn load_font(config: &Config) -> Result<ie::LabelFont> {
    let path = assets::resolve_font(config.font_path.as_deref())?;
    tracing::debug!(path = %path.display(), "label font");
    ie::LabelFont::load(path)
}
