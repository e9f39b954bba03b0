use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wikirace")]
#[command(about = "Finds a shortest chain of article links between two wiki pages")]
#[command(version)]
pub struct Args {
    /// Start page URL or article title (prompted for if omitted)
    pub start: Option<String>,

    /// Target page URL or article title (prompted for if omitted)
    pub target: Option<String>,

    /// JSON configuration file describing the site and limits
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of links to follow
    #[arg(short, long)]
    pub max_hops: Option<usize>,

    /// Per-fetch timeout in seconds (0 waits forever)
    #[arg(long)]
    pub fetch_timeout: Option<u64>,

    /// Fetch pages through this WebDriver server instead of plain HTTP
    #[arg(long, env = "WEBDRIVER_URL")]
    pub webdriver: Option<String>,

    /// File the search log is appended to
    #[arg(long, default_value = "crawler.log")]
    pub log_file: PathBuf,

    /// Print the full report as JSON
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_pages_and_defaults() {
        let args = Args::try_parse_from(["wikirace", "Rust", "Cargo"]).unwrap();
        assert_eq!(args.start.as_deref(), Some("Rust"));
        assert_eq!(args.target.as_deref(), Some("Cargo"));
        assert_eq!(args.log_file, PathBuf::from("crawler.log"));
        assert!(args.max_hops.is_none());
        assert!(!args.json);
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "wikirace",
            "--max-hops",
            "5",
            "--fetch-timeout",
            "0",
            "--config",
            "configs/ru.wikipedia.json",
            "--json",
        ])
        .unwrap();
        assert!(args.start.is_none());
        assert_eq!(args.max_hops, Some(5));
        assert_eq!(args.fetch_timeout, Some(0));
        assert_eq!(args.config, Some(PathBuf::from("configs/ru.wikipedia.json")));
        assert!(args.json);
    }
}
