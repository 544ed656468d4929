use anyhow::Result;
use seat_planner::config::{ServiceConfig, read_config};
use seat_planner::server;
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let config = match env::args().nth(1).map(PathBuf::from) {
        Some(path) => read_config(&path)?,
        None => ServiceConfig::default(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .init();

    server::run_server(config).await
}
