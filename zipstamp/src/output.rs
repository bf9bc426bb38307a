//! Text and JSON output for the backup command.

use anyhow::Result;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use zipstamp_core::BackupArtifact;

/// Prints results on stdout, either as plain lines or as one JSON document.
pub struct OutputWriter {
    json: bool,
}

impl OutputWriter {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// Print a progress line. Silent in JSON mode, which keeps stdout parseable.
    pub fn progress(&self, message: &str) -> Result<()> {
        if !self.json {
            println!("{message}");
        }
        Ok(())
    }

    /// Print `data` as JSON, or the line built by `text` otherwise.
    pub fn write<T: Serialize>(&self, data: &T, text: impl FnOnce() -> String) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if self.json {
            serde_json::to_writer_pretty(&mut stdout, data)?;
            writeln!(stdout)?;
        } else {
            writeln!(stdout, "{}", text())?;
        }
        Ok(())
    }

    /// Report a failed run on stderr.
    pub fn write_error(&self, error: &anyhow::Error, result_code: u8) {
        let message = format!("{error:#}");
        let rendered = if self.json {
            serde_json::to_string_pretty(&ErrorOutput {
                success: false,
                result_code,
                error: message,
            })
            .unwrap_or_default()
        } else {
            format!("Error: {message}")
        };
        eprintln!("{rendered}");
    }
}

/// Error output structure.
#[derive(Debug, Serialize)]
pub struct ErrorOutput {
    pub success: bool,
    pub result_code: u8,
    pub error: String,
}

/// Output for a finished backup.
#[derive(Debug, Serialize)]
pub struct BackupOutput {
    pub success: bool,
    pub result_code: u8,
    pub input: PathBuf,
    pub archive: PathBuf,
    pub timestamp: String,
    pub entries: usize,
}

impl From<BackupArtifact> for BackupOutput {
    fn from(artifact: BackupArtifact) -> Self {
        Self {
            success: true,
            result_code: 0,
            input: artifact.input,
            archive: artifact.archive,
            timestamp: artifact.timestamp,
            entries: artifact.entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_output_json_shape() {
        let artifact = BackupArtifact {
            input: PathBuf::from("/data/project"),
            archive: PathBuf::from("/backups/project_2024_3_7_9_5_2.zip"),
            timestamp: "2024_3_7_9_5_2".to_string(),
            entries: 3,
        };

        let value = serde_json::to_value(BackupOutput::from(artifact)).unwrap();
        assert_eq!(value["success"], true);
        assert_eq!(value["result_code"], 0);
        assert_eq!(value["archive"], "/backups/project_2024_3_7_9_5_2.zip");
        assert_eq!(value["entries"], 3);
    }

    #[test]
    fn test_error_output_json_shape() {
        let value = serde_json::to_value(ErrorOutput {
            success: false,
            result_code: 1,
            error: "Failed to back up x: path does not exist".to_string(),
        })
        .unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(value["result_code"], 1);
    }
}
