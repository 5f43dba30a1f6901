//! Reporting of decoded sector ranges.
//!
//! The default sink is the log. `JsonReporter` writes one JSON object per
//! line so a downstream scanner can consume ranges from a pipe.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use tracing::info;

use crate::daemon::protocol::SectorRange;
use crate::error::Result;

/// Sink for decoded notifications. Called once per range, in arrival order.
pub trait Reporter {
    fn report(&mut self, range: &SectorRange) -> Result<()>;
}

/// Reports each range as an `info` log line.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn report(&mut self, range: &SectorRange) -> Result<()> {
        info!(
            sector_num = range.sector_num,
            nb_sectors = range.nb_sectors,
            "sector range changed"
        );
        Ok(())
    }
}

/// One line of `JsonReporter` output.
#[derive(Debug, Serialize)]
struct ReportLine<'a> {
    #[serde(flatten)]
    range: &'a SectorRange,
    received_at: DateTime<Utc>,
}

/// Writes `{"sector_num":..,"nb_sectors":..,"received_at":..}` lines.
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Reporter for JsonReporter<W> {
    fn report(&mut self, range: &SectorRange) -> Result<()> {
        let line = ReportLine {
            range,
            received_at: Utc::now(),
        };
        serde_json::to_writer(&mut self.out, &line)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Collects ranges in memory. Handy for embedding and tests.
#[derive(Debug, Default)]
pub struct VecReporter {
    pub ranges: Vec<SectorRange>,
}

impl Reporter for VecReporter {
    fn report(&mut self, range: &SectorRange) -> Result<()> {
        self.ranges.push(*range);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lines() {
        let mut reporter = JsonReporter::new(Vec::new());
        reporter.report(&SectorRange::new(10, 2)).unwrap();
        reporter.report(&SectorRange::new(u64::MAX, 0)).unwrap();

        let out = String::from_utf8(reporter.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["sector_num"], 10);
        assert_eq!(first["nb_sectors"], 2);
        assert!(first["received_at"].is_string());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["sector_num"].as_u64(), Some(u64::MAX));
    }

    #[test]
    fn test_vec_reporter_keeps_order() {
        let mut reporter = VecReporter::default();
        for i in 0..5 {
            reporter.report(&SectorRange::new(i, i + 1)).unwrap();
        }
        let sectors: Vec<u64> = reporter.ranges.iter().map(|r| r.sector_num).collect();
        assert_eq!(sectors, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_log_reporter_is_infallible() {
        assert!(LogReporter.report(&SectorRange::new(1, 1)).is_ok());
    }
}
