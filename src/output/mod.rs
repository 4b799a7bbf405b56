use crate::models::{DeliveryStatus, DispatchReport};
use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

/// Writes dispatch reports to a file or the console
pub struct OutcomeReporter {
    format: ReportFormat,
    writer: Option<Box<dyn Write + Send>>,
}

#[derive(Debug, Clone)]
pub enum ReportFormat {
    Json,
    Jsonl,
    Console,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => ReportFormat::Json,
            "jsonl" => ReportFormat::Jsonl,
            "console" => ReportFormat::Console,
            _ => ReportFormat::Jsonl, // Default
        }
    }
}

impl OutcomeReporter {
    /// Create a new reporter
    pub fn new(
        format: ReportFormat,
        file_path: Option<PathBuf>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let writer: Option<Box<dyn Write + Send>> = match (&format, file_path) {
            (ReportFormat::Console, _) => None,
            (_, Some(path)) => {
                let file = OpenOptions::new().create(true).append(true).open(path)?;
                Some(Box::new(BufWriter::new(file)))
            }
            (_, None) => None,
        };

        Ok(OutcomeReporter { format, writer })
    }

    /// Write a dispatch report
    ///
    /// Every recipient's status is rendered individually; a failed
    /// delivery is never folded into an aggregate count alone.
    pub fn write_report(
        &mut self,
        report: &DispatchReport,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.format {
            ReportFormat::Json => {
                let json = serde_json::to_string_pretty(report)?;
                self.write_output(&format!("{}\n", json))?;
            }
            ReportFormat::Jsonl => {
                let json = serde_json::to_string(report)?;
                self.write_output(&format!("{}\n", json))?;
            }
            ReportFormat::Console => {
                let mut output = format!(
                    "[{}] Alert from {}: {} delivered, {} failed\n",
                    report.timestamp.to_rfc3339(),
                    report.sender_name,
                    report.delivered_count(),
                    report.failed_count()
                );
                for outcome in &report.outcomes {
                    match outcome.status {
                        DeliveryStatus::Delivered => {
                            output.push_str(&format!("  {}: Delivered\n", outcome.recipient_id));
                        }
                        DeliveryStatus::Failed => {
                            output.push_str(&format!(
                                "  {}: Failed ({})\n",
                                outcome.recipient_id,
                                outcome.error_detail.as_deref().unwrap_or("unknown error")
                            ));
                        }
                    }
                }
                self.write_output(&output)?;
            }
        }
        Ok(())
    }

    fn write_output(&mut self, data: &str) -> Result<(), Box<dyn std::error::Error>> {
        match &mut self.writer {
            Some(writer) => {
                writer.write_all(data.as_bytes())?;
                writer.flush()?;
            }
            None => {
                print!("{}", data);
                use std::io::{self, Write};
                io::stdout().flush()?;
            }
        }
        Ok(())
    }

    /// Flush any buffered output
    pub fn flush(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeliveryOutcome;
    use std::io::Read;

    fn sample_report() -> DispatchReport {
        DispatchReport::new(
            "alice",
            vec![
                DeliveryOutcome::delivered("111"),
                DeliveryOutcome::failed("222", "chat not found"),
            ],
        )
    }

    #[test]
    fn test_jsonl_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports.jsonl");

        let mut reporter =
            OutcomeReporter::new(ReportFormat::Jsonl, Some(path.clone())).unwrap();
        reporter.write_report(&sample_report()).unwrap();
        reporter.write_report(&sample_report()).unwrap();
        reporter.flush().unwrap();
        drop(reporter);

        let mut contents = String::new();
        std::fs::File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();

        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: DispatchReport = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed.outcomes.len(), 2);
        assert_eq!(parsed.outcomes[1].error_detail.as_deref(), Some("chat not found"));
    }

    #[test]
    fn test_format_from_str_defaults_to_jsonl() {
        assert!(matches!(ReportFormat::from_str("JSON"), ReportFormat::Json));
        assert!(matches!(
            ReportFormat::from_str("console"),
            ReportFormat::Console
        ));
        assert!(matches!(
            ReportFormat::from_str("whatever"),
            ReportFormat::Jsonl
        ));
    }
}
