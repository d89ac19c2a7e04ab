//! album-status - Report per-platform publishing configuration

use clap::Parser;
use std::path::PathBuf;

use libalbumcast::{Config, Result, SocialPublisher};

#[derive(Parser, Debug)]
#[command(name = "album-status")]
#[command(about = "Report which social platforms are configured for publishing", long_about = None)]
struct Cli {
    /// Config file path (defaults to $ALBUMCAST_CONFIG, then the XDG
    /// location, then environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config.as_ref() {
        Some(path) => Config::load_from_path(path)?,
        None => match libalbumcast::config::resolve_config_path() {
            Ok(resolved) if resolved.exists() => Config::load_from_path(&resolved)?,
            _ => Config::from_env(),
        },
    };

    // Pure presence check over the loaded credentials; no network access.
    let status = SocialPublisher::from_config(&config).configured_platforms();

    match cli.format.as_str() {
        "json" => {
            let map: serde_json::Map<String, serde_json::Value> = status
                .iter()
                .map(|(platform, configured)| (platform.to_string(), (*configured).into()))
                .collect();
            println!("{}", serde_json::Value::Object(map));
        }
        _ => {
            for (platform, configured) in &status {
                let state = if *configured { "configured" } else { "not configured" };
                println!("{:<10} {}", platform.to_string(), state);
            }
        }
    }

    Ok(())
}
