//! album-share - Publish a campaign album to social platforms

use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::str::FromStr;

use libalbumcast::error::PlatformError;
use libalbumcast::{AlbumcastError, AlbumShareData, Config, Platform, Result, SocialPublisher};

#[derive(Parser, Debug)]
#[command(name = "album-share")]
#[command(about = "Publish a campaign album to social platforms", long_about = None)]
struct Cli {
    /// Album share data as JSON (reads from stdin if not provided)
    data: Option<PathBuf>,

    /// Target platform(s), comma-separated (e.g. "facebook,x,line")
    #[arg(short, long)]
    platforms: String,

    /// Custom message; replaces the album description in generated captions
    #[arg(short, long)]
    message: Option<String>,

    /// Config file path (defaults to $ALBUMCAST_CONFIG, then the XDG
    /// location, then environment variables)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_ref())?;

    let platforms = parse_platforms(&cli.platforms)?;
    let data = read_album_data(cli.data.as_ref())?;

    let publisher = SocialPublisher::from_config(&config);
    let results = publisher
        .publish_to_social(&platforms, &data, cli.message.as_deref())
        .await;

    match cli.format.as_str() {
        "json" => {
            println!(
                "{}",
                serde_json::to_string_pretty(&results)
                    .map_err(|e| AlbumcastError::InvalidInput(e.to_string()))?
            );
        }
        _ => {
            for result in &results {
                if result.success {
                    match &result.post_url {
                        Some(url) => println!("{}: published ({})", result.platform, url),
                        None => println!("{}: published", result.platform),
                    }
                } else {
                    println!(
                        "{}: failed ({})",
                        result.platform,
                        result.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
        }
    }

    if !results.is_empty() && results.iter().all(|r| !r.success) {
        return Err(PlatformError::Posting("all platforms failed".to_string()).into());
    }

    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load_from_path(path);
    }

    // Fall back to environment credentials when no config file exists.
    match libalbumcast::config::resolve_config_path() {
        Ok(resolved) if resolved.exists() => Config::load_from_path(&resolved),
        _ => Ok(Config::from_env()),
    }
}

fn parse_platforms(raw: &str) -> Result<Vec<Platform>> {
    let platforms: Vec<Platform> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Platform::from_str)
        .collect::<std::result::Result<_, _>>()
        .map_err(AlbumcastError::InvalidInput)?;

    if platforms.is_empty() {
        return Err(AlbumcastError::InvalidInput(
            "no platforms specified".to_string(),
        ));
    }

    Ok(platforms)
}

fn read_album_data(path: Option<&PathBuf>) -> Result<AlbumShareData> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| AlbumcastError::InvalidInput(format!("cannot read {}: {}", path.display(), e)))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AlbumcastError::InvalidInput(format!("cannot read stdin: {}", e)))?;
            buffer
        }
    };

    serde_json::from_str(&raw)
        .map_err(|e| AlbumcastError::InvalidInput(format!("invalid album data: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platforms() {
        let platforms = parse_platforms("facebook, x ,line").unwrap();
        assert_eq!(platforms, vec![Platform::Facebook, Platform::X, Platform::Line]);
    }

    #[test]
    fn test_parse_platforms_rejects_unknown() {
        let result = parse_platforms("facebook,myspace");
        assert!(matches!(result, Err(AlbumcastError::InvalidInput(_))));
    }

    #[test]
    fn test_parse_platforms_rejects_empty() {
        assert!(parse_platforms("").is_err());
        assert!(parse_platforms(" , ").is_err());
    }
}
