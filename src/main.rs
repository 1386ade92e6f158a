//! Nutriscan
//!
//! An MCP server attaching per-100g nutrition facts to detected food labels.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutriscan::build_info;
use nutriscan::config::Config;
use nutriscan::db::Database;
use nutriscan::mcp::NutriscanService;
use nutriscan::resolve;
use nutriscan::tools::status::StatusTracker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays reserved for MCP stdio
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutriscan=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    build_info::print_startup_banner();

    let config = Config::from_env()?;
    if config.user_agent_is_default() {
        tracing::warn!("Using the default User-Agent; set NUTRISCAN_USER_AGENT with your own contact");
    }
    eprintln!("Food database: {}", config.off.base_url);
    eprintln!("Database path: {}", config.database_path.display());

    let database = Database::open(&config.database_path)?;
    let resolver = resolve::open_food_facts(config.off.clone(), config.cache_capacity)?;
    let status = StatusTracker::new(
        config.database_path.clone(),
        config.model_name.clone(),
        config.off.base_url.clone(),
    );

    let service = NutriscanService::new(status, resolver, database);

    eprintln!("Starting MCP server on stdio...");
    let server = service.serve((stdin(), stdout())).await?;
    server.waiting().await?;

    Ok(())
}
