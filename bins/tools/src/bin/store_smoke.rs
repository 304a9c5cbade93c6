use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

/// Usage: store-smoke [--purge-employees]
///
/// Runs against the configured data directory (`DATA_DIR` / config.toml).
#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let purge = std::env::args().skip(1).any(|a| a == "--purge-employees");
    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(data_dir = %cfg.storage.data_dir.display(), purge, "starting file store smoke test");
    let report = tools::smoke::run(&cfg.storage.data_dir, purge).await;
    for step in &report.steps {
        let mark = if step.ok { "ok  " } else { "FAIL" };
        println!("[{mark}] {}: {}", step.name, step.detail);
    }

    if report.passed() {
        info!("smoke test completed");
        ExitCode::SUCCESS
    } else {
        error!("smoke test failed");
        ExitCode::FAILURE
    }
}
