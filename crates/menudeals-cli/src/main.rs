mod decode;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use menudeals_feed::DecodeOptions;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "menudeals-cli")]
#[command(about = "Menu deals coupon feed tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Decode a saved store-coupon payload and print it as JSON
    Decode {
        /// Path to the payload file, or `-` for stdin
        path: PathBuf,
        /// Print single-line JSON instead of pretty-printed output
        #[arg(long)]
        compact: bool,
        /// Only print late-night coupons
        #[arg(long)]
        late_night: bool,
    },
    /// Show the menu hints and category derived from free text
    Hints {
        /// Coupon text to analyse; multiple words are joined with spaces
        #[arg(required = true)]
        text: Vec<String>,
    },
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = menudeals_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let options = DecodeOptions {
        currency_symbol: config.currency_symbol,
    };

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Decode {
            path,
            compact,
            late_night,
        }) => decode::run_decode(&path, &options, compact, late_night)?,
        Some(Commands::Hints { text }) => decode::run_hints(&text.join(" "))?,
        None => println!("menudeals-cli ready; see --help for commands"),
    }

    Ok(())
}
