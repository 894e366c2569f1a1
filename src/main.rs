// src/main.rs
use anyhow::Result;
use clap::Parser;
use healthcheck::config::{load_config, ProbeConfig};
use healthcheck::{CheckType, SearchTerm};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXAMPLES: &str = "\
Examples:
  healthcheck https://www.example.com
  healthcheck --type html --search \"^<!doctype html.*\" https://www.example.com
  healthcheck --type header --search \"content-type=text/html; charset=UTF-8\" https://www.example.com
  healthcheck --type json --search key=value http://echo.jsontest.com/key/value";

/// Monitor the health of your web applications, web servers, and other resources
#[derive(Parser, Debug)]
#[command(name = "healthcheck", version, after_help = EXAMPLES)]
struct Cli {
    /// Target URL
    #[arg(value_name = "URL")]
    target: Option<String>,

    /// Target URL (takes precedence over the positional URL)
    #[arg(short, long)]
    url: Option<String>,

    /// Request method (default: GET)
    #[arg(short, long)]
    method: Option<String>,

    /// Request timeout in milliseconds (default: 800)
    #[arg(short, long, value_name = "MS")]
    timeout: Option<u64>,

    /// Type of healthcheck: status, header, html or json (default: status)
    #[arg(short = 'T', long = "type", value_name = "TYPE")]
    check_type: Option<CheckType>,

    /// Status code, body pattern, or key=value pair for header and json checks
    #[arg(short, long)]
    search: Option<String>,

    /// Extra request header, repeatable
    #[arg(short = 'H', long = "header", value_name = "NAME:VALUE", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Read probe settings from a YAML or JSON file; flags override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Reject a search that does not fit the check type instead of ignoring it
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ProbeConfig {
        ProbeConfig {
            url: self.url.clone().or_else(|| self.target.clone()),
            method: self.method.clone(),
            timeout_ms: self.timeout,
            check_type: self.check_type,
            search: self.search.as_deref().map(SearchTerm::from_arg),
            headers: self.headers.iter().cloned().collect(),
            verbose: self.verbose,
            strict: self.strict,
        }
    }
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    raw.split_once(':')
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| format!("expected NAME:VALUE, got '{}'", raw))
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            "healthcheck=debug"
        } else {
            "healthcheck=warn"
        })
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn probe(cli: &Cli) -> Result<&'static str> {
    let base = match &cli.config {
        Some(path) => load_config(path).await?,
        None => ProbeConfig::default(),
    };

    let config = base.merge(cli.overrides());
    Ok(healthcheck::probe::healthcheck(config).await?)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match probe(&cli).await {
        Ok(token) => {
            println!("{}", token);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_url() {
        let cli = Cli::try_parse_from(["healthcheck", "https://www.example.com"]).unwrap();
        let config = cli.overrides();
        assert_eq!(config.url.as_deref(), Some("https://www.example.com"));
        assert_eq!(config.check_type, None);
        assert!(config.search.is_none());
    }

    #[test]
    fn test_url_flag_wins_over_positional() {
        let cli = Cli::try_parse_from(["healthcheck", "-u", "http://a.test", "http://b.test"]).unwrap();
        assert_eq!(cli.overrides().url.as_deref(), Some("http://a.test"));
    }

    #[test]
    fn test_short_flags() {
        let cli = Cli::try_parse_from([
            "healthcheck",
            "-m",
            "head",
            "-t",
            "1500",
            "-T",
            "header",
            "-s",
            "content-type=text/html; charset=UTF-8",
            "-v",
            "http://example.com",
        ])
        .unwrap();

        let config = cli.overrides();
        assert_eq!(config.method.as_deref(), Some("head"));
        assert_eq!(config.timeout_ms, Some(1500));
        assert_eq!(config.check_type, Some(CheckType::Header));
        assert!(config.verbose);
        assert!(matches!(
            config.search,
            Some(SearchTerm::Pair(ref name, ref value))
                if name == "content-type" && value == "text/html; charset=UTF-8"
        ));
    }

    #[test]
    fn test_search_without_equals_is_text() {
        let cli = Cli::try_parse_from(["healthcheck", "-s", "200", "http://example.com"]).unwrap();
        assert!(matches!(cli.overrides().search, Some(SearchTerm::Text(ref t)) if t == "200"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        assert!(Cli::try_parse_from(["healthcheck", "-T", "xml", "http://example.com"]).is_err());
    }

    #[test]
    fn test_headers_are_collected() {
        let cli = Cli::try_parse_from([
            "healthcheck",
            "-H",
            "Accept: application/json",
            "--header",
            "X-Trace:abc",
            "http://example.com",
        ])
        .unwrap();

        let config = cli.overrides();
        assert_eq!(config.headers.get("Accept").map(String::as_str), Some("application/json"));
        assert_eq!(config.headers.get("X-Trace").map(String::as_str), Some("abc"));

        assert!(Cli::try_parse_from(["healthcheck", "-H", "novalue", "http://example.com"]).is_err());
    }

    #[test]
    fn test_missing_url_fails_validation() {
        let cli = Cli::try_parse_from(["healthcheck"]).unwrap();
        assert!(cli.overrides().validate().is_err());
    }
}
