use clap::Parser;
use std::fs::OpenOptions;
use std::path::Path;
use tokio::io::BufReader;
use wikirace::utils::prompt_line;
use wikirace::{RaceConfig, Wikirace};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Parse command-line arguments
    let args = Args::parse();

    if let Err(e) = init_logging(&args.log_file) {
        eprintln!(
            "Failed to open log file {}: {}",
            args.log_file.display(),
            e
        );
        std::process::exit(1);
    }

    if let Err(e) = run(args).await {
        ::log::error!("Race failed: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Sends all log output to an append-only file
fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .write_style(env_logger::WriteStyle::Never)
        .init();
    Ok(())
}

async fn run(args: Args) -> wikirace::Result<()> {
    let mut race = match &args.config {
        Some(path) => Wikirace::from_config_file(path)?,
        None => Wikirace::new(RaceConfig::default()),
    };
    if let Some(max_hops) = args.max_hops {
        race = race.with_max_hops(max_hops);
    }
    if let Some(timeout) = args.fetch_timeout {
        race = race.with_fetch_timeout(timeout);
    }
    if let Some(webdriver_url) = args.webdriver.as_deref().filter(|u| !u.is_empty()) {
        race = race.with_webdriver(webdriver_url);
    }

    let (start, target) = read_pages(&args).await?;
    ::log::info!("Starting race from {:?} to {:?}", start, target);

    // Ctrl-C stops the search at the next frontier pop
    let cancel = race.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ::log::warn!("Interrupted, cancelling search");
            cancel.cancel();
        }
    });

    let report = race.run(&start, &target).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

/// Takes the pages from the command line, prompting for any that are missing
async fn read_pages(args: &Args) -> std::io::Result<(String, String)> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    let start = match &args.start {
        Some(start) => start.trim().to_string(),
        None => prompt_line("Start page: ", &mut stdin, &mut stdout).await?,
    };
    let target = match &args.target {
        Some(target) => target.trim().to_string(),
        None => prompt_line("Target page: ", &mut stdin, &mut stdout).await?,
    };

    Ok((start, target))
}
