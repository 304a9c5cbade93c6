use std::process::ExitCode;

use dotenvy::dotenv;
use tools::mongo::{self, CheckError};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    common::utils::logging::init_logging_from_env();

    let uri = std::env::var("MONGODB_URI").unwrap_or_else(|_| mongo::DEFAULT_MONGODB_URI.to_string());
    info!(uri = %mongo::mask_credentials(&uri), "MongoDB connection check");

    let target = match mongo::parse_target(&uri) {
        Ok(t) => t,
        Err(e) => {
            error!(error = %e, "cannot use MONGODB_URI");
            return ExitCode::FAILURE;
        }
    };

    match mongo::check_reachable(&target, mongo::CONNECT_TIMEOUT).await {
        Ok(()) => {
            info!(addr = %target.addr(), "SUCCESS: MongoDB host is accepting connections");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(addr = %target.addr(), error = %e, "ERROR: failed to connect to MongoDB");
            if matches!(e, CheckError::Refused(_)) {
                println!("\nTROUBLESHOOTING TIPS:");
                for tip in mongo::TROUBLESHOOTING {
                    println!("{tip}");
                }
            }
            ExitCode::FAILURE
        }
    }
}
