mod config;

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use url::Url;

use hunter::{
    fetch_html, Conversion, EnhanceError, EnhancementOutcome, Hunter, HunterOptions,
    TogetherConfig, TogetherEnhancer,
};

use config::Config;

#[derive(Parser)]
#[command(name = "hunter")]
#[command(about = "Extract the main content of a web page as clean Markdown")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a page and convert it
    Url {
        /// Address of the page
        url: String,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Convert a local HTML file
    File {
        /// Path to the HTML file
        path: PathBuf,

        /// Address the file was saved from, used to resolve relative links
        #[arg(long, value_name = "URL")]
        base_url: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
    /// Show or change the stored configuration
    Config {
        /// Store a Together.ai API key; read from stdin when no value is given
        #[arg(long, value_name = "KEY", num_args = 0..=1)]
        set_api_key: Option<Option<String>>,

        /// Show the current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Args)]
struct OutputArgs {
    /// Skip the enhancement pass
    #[arg(long)]
    no_enhance: bool,

    /// Write the Markdown to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enhancement timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries only Markdown
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    match cli.command {
        Commands::Url { url, output } => {
            let url = Url::parse(&url).with_context(|| format!("Invalid URL: {url}"))?;
            let html = fetch_html(&url).await?;
            convert(&html, Some(url.as_str()), &output, &config).await
        }
        Commands::File {
            path,
            base_url,
            output,
        } => {
            let html = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read {}", path.display()))?;
            convert(&html, base_url.as_deref(), &output, &config).await
        }
        Commands::Config { set_api_key, show } => {
            let show = show || set_api_key.is_none();
            if let Some(key) = set_api_key {
                let key = match key {
                    Some(key) => key,
                    None => prompt_api_key()?,
                };
                store_api_key(&key)?;
            }
            if show {
                show_config(&Config::load()?);
            }
            Ok(())
        }
    }
}

fn build_hunter(config: &Config, args: &OutputArgs) -> Hunter {
    let options = HunterOptions {
        enhance_timeout: args
            .timeout
            .map(Duration::from_secs)
            .unwrap_or_else(|| config.timeout()),
        ..HunterOptions::default()
    };
    let hunter = Hunter::with_options(options);

    if args.no_enhance || !config.enhance_enabled() {
        return hunter;
    }

    match &config.api_key {
        Some(key) => {
            let together = TogetherConfig::new(key.clone()).with_model(config.model());
            hunter.with_enhancer(Arc::new(TogetherEnhancer::new(together)))
        }
        None => {
            tracing::warn!("no API key configured, skipping enhancement (see `hunter config`)");
            hunter
        }
    }
}

async fn convert(
    html: &str,
    base_url: Option<&str>,
    args: &OutputArgs,
    config: &Config,
) -> Result<()> {
    let hunter = build_hunter(config, args);
    let conversion = hunter.convert_and_enhance(html, base_url).await?;
    report(&conversion);
    write_output(&conversion.markdown, args.output.as_deref())
}

fn report(conversion: &Conversion) {
    match &conversion.outcome {
        EnhancementOutcome::Enhanced => eprintln!("✓ Enhanced with AI"),
        EnhancementOutcome::Fallback(EnhanceError::Disabled) => {}
        EnhancementOutcome::Fallback(reason) => {
            eprintln!("⚠ Enhancement skipped ({reason}), using the extracted Markdown")
        }
    }
}

fn write_output(markdown: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, markdown)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("✓ Saved to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(markdown.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn prompt_api_key() -> Result<String> {
    eprint!("Together.ai API key: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read API key")?;
    Ok(line.trim().to_string())
}

fn store_api_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        bail!("API key cannot be empty");
    }

    let path = Config::config_path().context("Could not determine the config directory")?;
    let mut stored = Config::load_from_path(&path)?;
    stored.api_key = Some(key.trim().to_string());
    stored.save_to_path(&path)?;

    eprintln!("✓ API key saved to {}", path.display());
    Ok(())
}

fn show_config(config: &Config) {
    match Config::config_path() {
        Some(path) => println!("Config file: {}", path.display()),
        None => println!("Config file: unavailable on this platform"),
    }
    match config.masked_api_key() {
        Some(key) => println!("API key:     {key}"),
        None => println!("API key:     not configured"),
    }
    println!("Model:       {}", config.model());
    println!("Timeout:     {}s", config.timeout().as_secs());
    println!("Enhance:     {}", config.enhance_enabled());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_url_command() {
        match parse(&["hunter", "url", "https://example.com", "--no-enhance", "-o", "out.md"]).command
        {
            Commands::Url { url, output } => {
                assert_eq!(url, "https://example.com");
                assert!(output.no_enhance);
                assert_eq!(output.output, Some(PathBuf::from("out.md")));
                assert_eq!(output.timeout, None);
            }
            _ => panic!("expected url command"),
        }
    }

    #[test]
    fn test_file_command() {
        match parse(&[
            "hunter",
            "file",
            "page.html",
            "--base-url",
            "https://example.com/docs/",
            "--timeout",
            "5",
        ])
        .command
        {
            Commands::File {
                path,
                base_url,
                output,
            } => {
                assert_eq!(path, PathBuf::from("page.html"));
                assert_eq!(base_url.as_deref(), Some("https://example.com/docs/"));
                assert_eq!(output.timeout, Some(5));
                assert!(!output.no_enhance);
            }
            _ => panic!("expected file command"),
        }
    }

    #[test]
    fn test_config_command() {
        match parse(&["hunter", "config", "--set-api-key"]).command {
            Commands::Config { set_api_key, show } => {
                assert_eq!(set_api_key, Some(None));
                assert!(!show);
            }
            _ => panic!("expected config command"),
        }
        match parse(&["hunter", "config", "--set-api-key", "abc", "--show"]).command {
            Commands::Config { set_api_key, show } => {
                assert_eq!(set_api_key, Some(Some("abc".to_string())));
                assert!(show);
            }
            _ => panic!("expected config command"),
        }
    }

    #[test]
    fn test_missing_url_is_rejected() {
        assert!(Cli::try_parse_from(["hunter", "url"]).is_err());
    }

    #[test]
    fn test_no_enhance_builds_without_enhancer() {
        let config = Config {
            api_key: Some("key".to_string()),
            ..Config::default()
        };
        let args = OutputArgs {
            no_enhance: true,
            output: None,
            timeout: Some(3),
        };
        let hunter = build_hunter(&config, &args);
        assert_eq!(hunter.options().enhance_timeout, Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_missing_api_key_falls_back() {
        let hunter = build_hunter(
            &Config::default(),
            &OutputArgs {
                no_enhance: false,
                output: None,
                timeout: None,
            },
        );
        let conversion = hunter
            .convert_and_enhance("<h1>Docs</h1><p>Body</p>", None)
            .await
            .unwrap();
        assert_eq!(conversion.markdown, "# Docs\n\nBody\n");
        assert!(matches!(
            conversion.outcome,
            EnhancementOutcome::Fallback(EnhanceError::Disabled)
        ));
    }

    #[test]
    fn test_write_output_to_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.md");
        write_output("# Hi\n", Some(&path)).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Hi\n");
    }
}
