use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "christmas-episodes")]
#[command(
    about = "Scrape the Wikipedia list of US Christmas TV episodes and count them by year"
)]
pub struct Cli {
    /// Source page URL (overrides config and CHRISTMAS_EPISODES_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Read the page from a saved HTML file instead of fetching it
    #[arg(long = "html-file", conflicts_with = "url")]
    pub html_file: Option<PathBuf>,

    /// Output root; data/ and outputs/ are created beneath it
    #[arg(long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Config file path (default: <config dir>/christmas-episodes/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,
}
