// src/main.rs

use clap::Parser;
use tracing::Level;

use nextgroups::cli::Cli;
use nextgroups::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::load_or_default(cli.config_path())?;

    // Неизвестный уровень в конфиге не должен мешать запуску
    let level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    cli.run(config).await
}
