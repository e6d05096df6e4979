mod config;
mod error;
mod queue;
mod scanner;
mod storage;
mod utils;
mod worker;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use flexi_logger::{Cleanup, Criterion, Duplicate, FileSpec, Logger, Naming};
use tokio_util::sync::CancellationToken;

use config::Config;
use queue::SqsQueue;
use storage::S3Store;
use utils::{create_s3_client, create_sqs_client, load_aws_config};
use worker::Worker;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    let _logger = Logger::try_with_env_or_str("info")?
        .log_to_file(
            FileSpec::default()
                .directory(&config.log_dir)
                .basename("upload-scanner")
                .suffix("log"),
        )
        .duplicate_to_stdout(Duplicate::All)
        .rotate(
            Criterion::Size(10_000_000),
            Naming::Numbers,
            Cleanup::KeepLogFiles(7),
        )
        .use_utc()
        .format(flexi_logger::detailed_format)
        .start()
        .context("failed to initialize logging")?;

    log::info!(
        "Starting upload scanner for queue {} in region {}.",
        config.queue_url,
        config.region
    );

    tokio::fs::create_dir_all(&config.scratch_dir)
        .await
        .with_context(|| {
            format!(
                "failed to create scratch directory {}",
                config.scratch_dir.display()
            )
        })?;

    let sdk_config = load_aws_config(&config.region, config.endpoint_url.as_deref()).await;
    let queue = SqsQueue::new(
        create_sqs_client(&sdk_config),
        config.queue_url.to_string(),
        config.wait_time_seconds,
    );
    log::info!("Listening on {}.", queue.get_queue_url());
    let store = S3Store::new(create_s3_client(&sdk_config));
    let scanner = config.scanner();
    log::info!(
        "Scanning with `{} {}`.",
        scanner.get_program(),
        scanner.get_args().join(" ")
    );

    let worker = Worker::new(
        Arc::new(queue),
        Arc::new(store),
        Arc::new(scanner),
        config.worker_config(),
    );

    let shutdown = CancellationToken::new();
    tokio::spawn(cancel_on_signal(shutdown.clone()));
    worker.run(shutdown).await;

    log::info!("Upload scanner stopped.");
    Ok(())
}

async fn cancel_on_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                log::error!("Failed to listen for Ctrl-C: {e}");
                return;
            }
            log::info!("Received Ctrl-C. Finishing the current message before exiting.");
        }
        () = terminate => {
            log::info!("Received SIGTERM. Finishing the current message before exiting.");
        }
    }
    shutdown.cancel();
}
