//! One-shot nutrition lookup
//!
//! Usage: nutriscan-lookup <label>...
//! Prints the normalized label -> nutrition mapping as JSON.

use tracing_subscriber::EnvFilter;

use nutriscan::config::Config;
use nutriscan::resolve;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutriscan=warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let labels: Vec<String> = std::env::args().skip(1).collect();
    if labels.is_empty() {
        eprintln!("Usage: nutriscan-lookup <label>...");
        std::process::exit(2);
    }

    let config = Config::from_env()?;
    let resolver = resolve::open_food_facts(config.off, config.cache_capacity)?;

    let result = resolver.resolve_many(&labels).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
