//! yard - drone survey and scale ticket reconciliation for timber yards.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "yard",
    version,
    about = "Timber yard stock control: drone volume to estimated mass, checked against scale weights"
)]
struct Cli {
    /// Store file holding every recorded survey
    #[arg(long, global = true, env = "YARD_STORE", default_value = "yard_stock.json")]
    store: PathBuf,

    /// JPEG logo for PDF report headers; skipped if the file is missing
    #[arg(long, global = true, env = "YARD_LOGO")]
    logo: Option<PathBuf>,

    #[command(subcommand)]
    command: yard_cmd::Command,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let settings = yard_cmd::Settings {
        store: cli.store,
        logo: cli.logo,
    };
    log::debug!("using store {}", settings.store.display());
    yard_cmd::run(&settings, cli.command)
}
