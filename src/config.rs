use std::{path::PathBuf, time::Duration};

use clap::Parser;
use url::Url;

use crate::{queue::MAX_WAIT_TIME_SECONDS, scanner::CommandScanner, worker::WorkerConfig};

pub const DEFAULT_REGION: &str = "eu-west-2";

/// Scans files uploaded to S3 with ClamAV, driven by S3 event notifications delivered through
/// SQS, and tags each object with `is_clean=true|false`.
#[derive(Parser, Debug, Clone)]
#[command(name = "upload-scanner", version, about, long_about = None)]
pub struct Config {
    /// AWS region of the queue and the buckets.
    #[arg(long, env = "AWS_REGION", default_value = DEFAULT_REGION)]
    pub region: String,

    /// URL of the SQS queue receiving the S3 event notifications.
    #[arg(long, env = "SQS_QUEUE_URL")]
    pub queue_url: Url,

    /// Endpoint override for S3-compatible stores and local SQS emulators.
    #[arg(long, env = "AWS_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Long-polling wait for each receive call, in seconds.
    #[arg(
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(i32).range(0..=i64::from(MAX_WAIT_TIME_SECONDS))
    )]
    pub wait_time_seconds: i32,

    /// Extra pause after a receive returned no message, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub idle_delay_ms: u64,

    /// Directory objects are downloaded to while they're scanned.
    #[arg(long, env = "SCAN_SCRATCH_DIR", default_value = "/tmp")]
    pub scratch_dir: PathBuf,

    /// Scanner executable; the downloaded file path is appended to its arguments. The default
    /// runs `clamdscan --fdpass` through `sudo` so clamd receives an open descriptor instead of
    /// opening the scratch file itself.
    #[arg(long, default_value = "sudo")]
    pub scanner_program: String,

    /// Argument passed to the scanner before the file path. Repeat for several arguments.
    #[arg(
        long = "scanner-arg",
        allow_hyphen_values = true,
        default_values = ["clamdscan", "--fdpass"]
    )]
    pub scanner_args: Vec<String>,

    /// Directory for rotated log files.
    #[arg(long, env = "LOG_DIR", default_value = ".logs")]
    pub log_dir: PathBuf,
}

impl Config {
    pub fn worker_config(&self) -> WorkerConfig {
        WorkerConfig::new(
            self.scratch_dir.clone(),
            Duration::from_millis(self.idle_delay_ms),
        )
    }

    pub fn scanner(&self) -> CommandScanner {
        CommandScanner::new(self.scanner_program.clone(), self.scanner_args.clone())
    }
}
