//! sentimeter - Entry point for the complaint dashboard

use std::path::PathBuf;

use chrono::NaiveDate;
use sentimeter::config::Settings;
use sentimeter::domain::ThreadId;
use sentimeter::services::ComplaintFilter;
use sentimeter::{App, RunOptions};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage: sentimeter [OPTIONS]

Options:
  --config PATH        Settings file (default: platform config dir)
  --search TEXT        Only show threads matching TEXT
  --sentiment VALUE    all, positive, neutral or negative
  --expand THREAD_ID   Expand a thread (repeatable)
  --as-of YYYY-MM-DD   Day the trend window ends on (default: today)
  --json               Print a JSON snapshot instead of text
  -h, --help           Show this help";

/// Parsed command line.
#[derive(Debug, Default)]
struct Cli {
    config: Option<PathBuf>,
    options: RunOptions,
    help: bool,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli, String> {
    let mut cli = Cli::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--config" => cli.config = Some(PathBuf::from(value("--config")?)),
            "--search" => {
                cli.options.filter = cli.options.filter.clone().search(value("--search")?);
            }
            "--sentiment" => {
                let raw = value("--sentiment")?;
                cli.options.filter.sentiment = ComplaintFilter::parse_sentiment(&raw)
                    .ok_or_else(|| format!("unknown sentiment {raw:?}"))?;
            }
            "--expand" => cli.options.expand.push(ThreadId::from(value("--expand")?)),
            "--as-of" => {
                let raw = value("--as-of")?;
                let as_of = NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map_err(|_| format!("invalid date {raw:?}"))?;
                cli.options.as_of = Some(as_of);
            }
            "--json" => cli.options.json = true,
            "-h" | "--help" => cli.help = true,
            other => return Err(format!("unexpected argument {other:?}")),
        }
    }

    Ok(cli)
}

fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = match parse_args(std::env::args().skip(1)) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}\n\n{USAGE}");
            std::process::exit(1);
        }
    };
    if cli.help {
        println!("{USAGE}");
        return;
    }

    let settings = Settings::load(cli.config.as_deref());
    let filter = settings
        .as_ref()
        .map(|s| s.logging.filter.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&filter);

    tracing::info!("Starting sentimeter");

    let result = match settings {
        Ok(settings) => App::run(&settings, cli.options).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(output) => print!("{output}"),
        Err(e) => {
            tracing::error!("Application error: {:#}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentimeter::domain::Sentiment;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_all_flags() {
        let cli = parse_args(args(&[
            "--config",
            "/tmp/settings.json",
            "--search",
            "Refund",
            "--sentiment",
            "negative",
            "--expand",
            "CPL001",
            "--expand",
            "CPL002",
            "--as-of",
            "2024-07-20",
            "--json",
        ]))
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/settings.json")));
        assert_eq!(cli.options.filter.search.as_deref(), Some("refund"));
        assert_eq!(cli.options.filter.sentiment, Some(Sentiment::Negative));
        assert_eq!(
            cli.options.expand,
            vec![ThreadId::from("CPL001"), ThreadId::from("CPL002")]
        );
        assert_eq!(cli.options.as_of, NaiveDate::from_ymd_opt(2024, 7, 20));
        assert!(cli.options.json);
    }

    #[test]
    fn sentiment_all_clears_filter() {
        let cli = parse_args(args(&["--sentiment", "all"])).unwrap();
        assert_eq!(cli.options.filter.sentiment, None);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&["--sentiment", "furious"])).is_err());
        assert!(parse_args(args(&["--expand"])).is_err());
        assert!(parse_args(args(&["--as-of", "20/07/2024"])).is_err());
        assert!(parse_args(args(&["--verbose"])).is_err());
    }
}
