use std::{path::Path, process::Stdio};

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

use super::ScanReport;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to run scanner `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Malware scanner operating on a local file.
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn scan(&self, path: &Path) -> Result<ScanReport, ScanError>;
}

/// Runs a command-line scanner as `program args... <path>` and captures its standard output.
#[derive(Debug, Clone)]
pub struct CommandScanner {
    program: String,
    args: Vec<String>,
}

impl CommandScanner {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn get_program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}

#[async_trait]
impl Scanner for CommandScanner {
    async fn scan(&self, path: &Path) -> Result<ScanReport, ScanError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| ScanError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let report = ScanReport::new(
            output.status.code(),
            String::from_utf8_lossy(&output.stdout).into_owned(),
        );
        log::debug!("Scanner output for {}:\n{}", path.display(), report.get_output());

        // clamdscan exits with 1 on a detection and 2 on an error. Only the output decides the
        // verdict, but an error exit without a detection is worth surfacing.
        if !output.status.success() && report.get_verdict().is_clean() {
            log::warn!(
                "Scanner exited with {} for {} without reporting a detection. stderr: {}",
                output.status,
                path.display(),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(report)
    }
}
