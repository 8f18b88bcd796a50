use clap::Parser;
use forumstyle::config;
use forumstyle::{Command, Overrides, Session, execute, logger};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Forum theme switcher", long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./forumstyle.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Serve themes from a local checkout of the site
    #[arg(long)]
    offline: Option<PathBuf>,
    /// JSON page model to run against instead of the generated skeleton
    #[arg(long)]
    page: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let app_config = config::load_config(cli.config.as_deref()).into_result()?;
    logger::setup_logger(app_config.logging())?;

    let overrides = Overrides {
        offline: cli.offline,
        page: cli.page,
    };
    let session = Session::from_config(&app_config, &overrides)?;
    let output = execute(&cli.command, session).await?;
    println!("{output}");
    Ok(())
}
