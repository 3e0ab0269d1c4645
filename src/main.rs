#![warn(clippy::all, rust_2018_idioms)]

use ebsaudit::app::inventory::AwsResourceApi;
use ebsaudit::{log_error, log_info, ReportConfig};

/// Environment variable selecting the log level (`INFO`, `DEBUG`, ...), `RUST_LOG` as fallback
const LOG_LEVEL_ENV: &str = "LOGLEVEL";

/// AWS SDK internals stay at warn whatever the requested level
const SDK_LOG_DIRECTIVES: &str =
    "aws_config=warn,aws_sigv4=warn,aws_smithy_runtime=warn,aws_smithy_runtime_api=warn,aws_smithy_http=warn,hyper=warn";

/// Map a level name (Python-style names included) onto an `EnvFilter` directive string
fn filter_directives(level: &str) -> String {
    let level = match level.trim().to_ascii_lowercase().as_str() {
        "" => "info".to_string(),
        "warning" => "warn".to_string(),
        "critical" | "fatal" => "error".to_string(),
        other => other.to_string(),
    };
    format!("{},{}", level, SDK_LOG_DIRECTIVES)
}

fn init_logging() {
    let requested = std::env::var(LOG_LEVEL_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());

    let filter = match tracing_subscriber::EnvFilter::try_new(filter_directives(&requested)) {
        Ok(filter) => filter,
        Err(e) => {
            eprintln!("Invalid log level {:?} ({}), using info", requested, e);
            tracing_subscriber::EnvFilter::new(filter_directives("info"))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();

    log_info!("Entry point initialized.");
    tracing::info!(
        "ebsaudit {} ({}@{})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_BRANCH"),
        env!("GIT_COMMIT")
    );

    let api = AwsResourceApi::from_env().await;
    let config = ReportConfig::default();

    match ebsaudit::run_report(&api, &config).await {
        Ok(report) => {
            log_info!(
                "Audit complete: {} backup jobs, {} instances, {} volumes",
                report.backup_jobs.len(),
                report.inventory.instances.len(),
                report.inventory.volumes.len()
            );
            Ok(())
        }
        Err(e) => {
            log_error!("Audit aborted: {:#}", e);
            Err(e)
        }
    }
}
