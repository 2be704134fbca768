//! Status counts, grades and scan-time records

use crate::error::{Error, Result};
use crate::status::ScanStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of checks per scan status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub good: usize,
    pub bad: usize,
    pub warning: usize,
    pub not_scanned: usize,
}

impl StatusCounts {
    /// Count one status. A scan-level `cantfix` is inconclusive and counts as warning.
    pub fn record(&mut self, status: ScanStatus) {
        match status {
            ScanStatus::Good => self.good += 1,
            ScanStatus::Bad => self.bad += 1,
            ScanStatus::Warning | ScanStatus::CantFix => self.warning += 1,
            ScanStatus::NotScanned => self.not_scanned += 1,
        }
    }

    /// Checks that contribute to the score
    pub fn scanned(&self) -> usize {
        self.good + self.bad + self.warning
    }

    /// `100 * good / (good + bad + warning)`, rounded; 0 when nothing was scanned
    pub fn percent(&self) -> u8 {
        let scanned = self.scanned();
        if scanned == 0 {
            return 0;
        }
        ((self.good as f64 * 100.0) / scanned as f64).round() as u8
    }
}

impl FromIterator<ScanStatus> for StatusCounts {
    fn from_iter<I: IntoIterator<Item = ScanStatus>>(iter: I) -> Self {
        let mut counts = StatusCounts::default();
        for status in iter {
            counts.record(status);
        }
        counts
    }
}

/// Letter summarizing the score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lower percent bounds of grades A to D; anything below `d` is F
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeScale {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
}

impl Default for GradeScale {
    fn default() -> Self {
        Self {
            a: 90,
            b: 75,
            c: 50,
            d: 25,
        }
    }
}

impl GradeScale {
    /// Build a scale, rejecting bounds that are not strictly decreasing
    pub fn new(a: u8, b: u8, c: u8, d: u8) -> Result<Self> {
        let scale = Self { a, b, c, d };
        scale.validate()?;
        Ok(scale)
    }

    pub fn validate(&self) -> Result<()> {
        if self.a > 100 || !(self.a > self.b && self.b > self.c && self.c > self.d) {
            return Err(Error::Configuration(format!(
                "grade thresholds must decrease from A to D within 0..=100, got {}/{}/{}/{}",
                self.a, self.b, self.c, self.d
            )));
        }
        Ok(())
    }

    /// Grade of a percent score; never increases as the percent decreases
    pub fn grade(&self, percent: u8) -> Grade {
        match percent {
            p if p >= self.a => Grade::A,
            p if p >= self.b => Grade::B,
            p if p >= self.c => Grade::C,
            p if p >= self.d => Grade::D,
            _ => Grade::F,
        }
    }
}

/// Direction of a score compared to the previous scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Same,
}

/// One entry of the scan history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanTimeRecord {
    pub time: DateTime<Utc>,
    pub percent: u8,
    pub grade: Grade,
}

impl ScanTimeRecord {
    pub fn new(percent: u8, grade: Grade) -> Self {
        Self {
            time: Utc::now(),
            percent,
            grade,
        }
    }

    pub fn trend_from(&self, previous: Option<&ScanTimeRecord>) -> Trend {
        match previous {
            Some(prev) if self.percent > prev.percent => Trend::Up,
            Some(prev) if self.percent < prev.percent => Trend::Down,
            _ => Trend::Same,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grades() {
        let scale = GradeScale::default();
        assert_eq!(scale.grade(100), Grade::A);
        assert_eq!(scale.grade(90), Grade::A);
        assert_eq!(scale.grade(89), Grade::B);
        assert_eq!(scale.grade(75), Grade::B);
        assert_eq!(scale.grade(50), Grade::C);
        assert_eq!(scale.grade(25), Grade::D);
        assert_eq!(scale.grade(24), Grade::F);
        assert_eq!(scale.grade(0), Grade::F);
    }

    #[test]
    fn test_grade_is_monotonic() {
        let scale = GradeScale::default();
        let mut previous = scale.grade(0);
        for percent in 1..=100 {
            let grade = scale.grade(percent);
            assert!(grade <= previous, "grade worsened at {}", percent);
            previous = grade;
        }
    }

    #[test]
    fn test_invalid_scale_rejected() {
        assert!(GradeScale::new(90, 90, 50, 25).is_err());
        assert!(GradeScale::new(101, 75, 50, 25).is_err());
        assert!(GradeScale::new(80, 60, 40, 20).is_ok());
    }

    #[test]
    fn test_percent_excludes_not_scanned() {
        let mut counts = StatusCounts {
            good: 8,
            bad: 1,
            warning: 1,
            not_scanned: 5,
        };
        assert_eq!(counts.percent(), 80);

        counts.record(ScanStatus::CantFix);
        assert_eq!(counts.warning, 2);
        assert_eq!(StatusCounts::default().percent(), 0);
    }

    #[test]
    fn test_counts_from_statuses() {
        let counts: StatusCounts = [ScanStatus::Good, ScanStatus::Bad, ScanStatus::NotScanned]
            .into_iter()
            .collect();
        assert_eq!(counts.good, 1);
        assert_eq!(counts.bad, 1);
        assert_eq!(counts.not_scanned, 1);
        assert_eq!(counts.percent(), 50);
    }

    #[test]
    fn test_trend() {
        let old = ScanTimeRecord::new(50, Grade::C);
        let new = ScanTimeRecord::new(80, Grade::B);
        assert_eq!(new.trend_from(Some(&old)), Trend::Up);
        assert_eq!(old.trend_from(Some(&new)), Trend::Down);
        assert_eq!(old.trend_from(None), Trend::Same);
    }
}
