//! Score and grade computation

use serde::{Deserialize, Serialize};
use siteguard_core::{Grade, GradeScale, ScanTimeRecord, StatusCounts, Trend};

/// Aggregate score across all checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub percent: u8,
    pub grade: Grade,
    pub counts: StatusCounts,
}

impl Score {
    /// Score of a set of counts; nothing scanned gives 0 and F
    pub fn from_counts(counts: StatusCounts, scale: &GradeScale) -> Self {
        if counts.scanned() == 0 {
            return Self {
                percent: 0,
                grade: Grade::F,
                counts,
            };
        }
        let percent = counts.percent();
        Self {
            percent,
            grade: scale.grade(percent),
            counts,
        }
    }

    pub fn to_record(&self) -> ScanTimeRecord {
        ScanTimeRecord::new(self.percent, self.grade)
    }
}

/// A history record with its trend against the previous one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub record: ScanTimeRecord,
    pub trend: Trend,
}

/// Attach trends to records ordered oldest first
pub fn with_trends(records: Vec<ScanTimeRecord>) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = Vec::with_capacity(records.len());
    for record in records {
        let trend = record.trend_from(entries.last().map(|e| &e.record));
        entries.push(HistoryEntry { record, trend });
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_from_counts() {
        let counts = StatusCounts {
            good: 8,
            bad: 1,
            warning: 1,
            not_scanned: 0,
        };
        let score = Score::from_counts(counts, &GradeScale::default());
        assert_eq!(score.percent, 80);
        assert_eq!(score.grade, Grade::B);

        let empty = Score::from_counts(StatusCounts::default(), &GradeScale::default());
        assert_eq!((empty.percent, empty.grade), (0, Grade::F));
    }

    #[test]
    fn test_with_trends() {
        let entries = with_trends(vec![
            ScanTimeRecord::new(40, Grade::D),
            ScanTimeRecord::new(60, Grade::C),
            ScanTimeRecord::new(60, Grade::C),
            ScanTimeRecord::new(20, Grade::F),
        ]);
        let trends: Vec<Trend> = entries.iter().map(|e| e.trend).collect();
        assert_eq!(trends, vec![Trend::Same, Trend::Up, Trend::Same, Trend::Down]);
    }
}
