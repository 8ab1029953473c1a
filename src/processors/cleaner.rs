use crate::models::{DropReason, Observation};
use crate::readers::RawRecord;
use tracing::debug;

/// Counts of kept and dropped rows from one cleaning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleaningReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    pub invalid_coordinate_rows: usize,
    pub invalid_count_rows: usize,
    pub negative_count_rows: usize,
    pub out_of_bounds_rows: usize,
}

impl CleaningReport {
    pub fn dropped_rows(&self) -> usize {
        self.total_rows - self.kept_rows
    }

    fn record_drop(&mut self, reason: DropReason) {
        match reason {
            DropReason::InvalidCoordinate { .. } => self.invalid_coordinate_rows += 1,
            DropReason::InvalidCount => self.invalid_count_rows += 1,
            DropReason::NegativeCount => self.negative_count_rows += 1,
            DropReason::OutOfBounds => self.out_of_bounds_rows += 1,
        }
    }

    pub fn summary(&self) -> String {
        let percent = |n: usize| {
            if self.total_rows == 0 {
                0.0
            } else {
                100.0 * n as f64 / self.total_rows as f64
            }
        };

        let mut summary = String::new();
        summary.push_str("=== Cleaning Report ===\n");
        summary.push_str(&format!("Total Rows: {}\n", self.total_rows));
        summary.push_str(&format!(
            "Kept Rows: {} ({:.1}%)\n",
            self.kept_rows,
            percent(self.kept_rows)
        ));
        summary.push_str(&format!(
            "Dropped Rows: {} ({:.1}%)\n",
            self.dropped_rows(),
            percent(self.dropped_rows())
        ));

        if self.dropped_rows() > 0 {
            summary.push_str(&format!(
                "  Missing/invalid coordinate: {}\n",
                self.invalid_coordinate_rows
            ));
            summary.push_str(&format!(
                "  Missing/invalid count: {}\n",
                self.invalid_count_rows
            ));
            summary.push_str(&format!("  Negative count: {}\n", self.negative_count_rows));
            summary.push_str(&format!("  Out of bounds: {}\n", self.out_of_bounds_rows));
        }

        summary
    }
}

pub struct Cleaner {
    strict_bounds: bool,
}

impl Cleaner {
    pub fn new() -> Self {
        Self {
            strict_bounds: false,
        }
    }

    pub fn with_strict_bounds(strict_bounds: bool) -> Self {
        Self { strict_bounds }
    }

    /// Type every raw row, keeping only those with usable coordinates and counts.
    ///
    /// Input order is preserved in the cleaned set.
    pub fn clean(&self, records: &[RawRecord]) -> (Vec<Observation>, CleaningReport) {
        let mut report = CleaningReport {
            total_rows: records.len(),
            ..CleaningReport::default()
        };
        let mut observations = Vec::with_capacity(records.len());

        for record in records {
            match self.clean_row(record) {
                Ok(observation) => observations.push(observation),
                Err(reason) => {
                    debug!(line = record.line, %reason, "Dropping row");
                    report.record_drop(reason);
                }
            }
        }

        report.kept_rows = observations.len();
        (observations, report)
    }

    fn clean_row(&self, record: &RawRecord) -> std::result::Result<Observation, DropReason> {
        let observation = Observation::from_raw(&record.observation)?;

        if self.strict_bounds && !observation.is_within_world_bounds() {
            return Err(DropReason::OutOfBounds);
        }

        Ok(observation)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}
