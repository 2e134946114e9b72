use clap::Parser;

mod args;
use args::{Args, Command};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let fetcher_config = match args.fetcher_config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };
    ::log::info!("Using WebDriver at {}", fetcher_config.webdriver_url);

    let start_time = std::time::Instant::now();
    let output = match &args.command {
        Command::Fetch { url } => site_digest::fetch_webpage(url, &fetcher_config).await,
        Command::Crawl(crawl) => site_digest::crawl_site(&crawl.to_config(), &fetcher_config).await,
    };

    ::log::info!(
        "Finished in {:.2} seconds",
        start_time.elapsed().as_secs_f64()
    );
    println!("{}", output);
}
