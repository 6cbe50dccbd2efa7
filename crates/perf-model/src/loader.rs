// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Performance-model file parsing.
//!
//! The file holds exactly three rows: sequential, index-solo and
//! index-shared throughput. Trailing blank lines are tolerated; anything
//! else beyond the third row is a format error.

use crate::{PerfModelError, PerformanceModel};
use std::path::Path;
use std::str::FromStr;

/// Number of throughput rows in a model file.
const NUM_ROWS: usize = 3;

impl PerformanceModel {
    /// Loads a strict model from a file.
    pub fn from_file(path: &Path) -> Result<Self, PerfModelError> {
        let content = std::fs::read_to_string(path)?;
        let model = Self::parse(&content)?;
        tracing::debug!(path = %path.display(), "{}", model.summary());
        Ok(model)
    }

    /// Parses a strict model from the three-row text format.
    pub fn parse(content: &str) -> Result<Self, PerfModelError> {
        let mut lines: Vec<&str> = content.lines().collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        if lines.len() != NUM_ROWS {
            return Err(PerfModelError::RowCount { found: lines.len() });
        }

        let mut rows = Vec::with_capacity(NUM_ROWS);
        for (row, line) in lines.iter().enumerate() {
            rows.push(parse_row(row, line)?);
        }

        let index_shared = rows.pop().unwrap_or_default();
        let index_solo = rows.pop().unwrap_or_default();
        let seq = rows.pop().unwrap_or_default();
        Self::from_samples(seq, index_solo, index_shared)
    }

    /// Serialises the model back into the three-row text format.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for strategy in crate::Strategy::ALL {
            let row: Vec<String> = self.samples(strategy).iter().map(|v| v.to_string()).collect();
            out.push_str(&row.join(" "));
            out.push('\n');
        }
        out
    }
}

impl FromStr for PerformanceModel {
    type Err = PerfModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_row(row: usize, line: &str) -> Result<Vec<f64>, PerfModelError> {
    let samples = line
        .split_whitespace()
        .enumerate()
        .map(|(column, token)| {
            token.parse::<f64>().map_err(|_| PerfModelError::InvalidNumber {
                row,
                column,
                token: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if samples.is_empty() {
        return Err(PerfModelError::EmptyRow { row });
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Strategy;

    #[test]
    fn test_parse_valid() {
        let m = PerformanceModel::parse("100 50 40\n0 80 70\n0 60 55\n").unwrap();
        assert_eq!(m.num_levels(), 3);
        assert_eq!(m.samples(Strategy::IndexShared), &[0.0, 60.0, 55.0]);
    }

    #[test]
    fn test_parse_tolerates_extra_whitespace() {
        let m = PerformanceModel::parse("  100\t50 \n0   80\n0 60\n\n\n").unwrap();
        assert_eq!(m.max_level(), 1);
    }

    #[test]
    fn test_parse_extra_row() {
        let err = PerformanceModel::parse("1 2\n1 2\n1 2\n1 2\n").unwrap_err();
        assert!(matches!(err, PerfModelError::RowCount { found: 4 }));
    }

    #[test]
    fn test_parse_missing_row() {
        let err = PerformanceModel::parse("1 2\n1 2\n").unwrap_err();
        assert!(matches!(err, PerfModelError::RowCount { found: 2 }));
    }

    #[test]
    fn test_parse_blank_middle_row() {
        let err = PerformanceModel::parse("1 2\n\n1 2\n").unwrap_err();
        assert!(matches!(err, PerfModelError::EmptyRow { row: 1 }));
    }

    #[test]
    fn test_parse_bad_number() {
        let err = PerformanceModel::parse("1 2\n1 x\n1 2\n").unwrap_err();
        match err {
            PerfModelError::InvalidNumber { row, column, token } => {
                assert_eq!((row, column), (1, 1));
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_mismatched_lengths() {
        let err = PerformanceModel::parse("1 2 3\n1 2\n1 2 3\n").unwrap_err();
        assert!(matches!(err, PerfModelError::LengthMismatch { seq: 3, index_solo: 2, .. }));
    }

    #[test]
    fn test_parse_rejects_infinity() {
        let err = PerformanceModel::parse("1 inf\n1 2\n1 2\n").unwrap_err();
        assert!(matches!(err, PerfModelError::InvalidSample { row: 0, column: 1, .. }));
    }

    #[test]
    fn test_text_roundtrip() {
        let m = PerformanceModel::parse("100 50\n0 80\n0 60\n").unwrap();
        let back: PerformanceModel = m.to_text().parse().unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn test_text_roundtrip_keeps_fractional_and_tiny_samples() {
        let m = PerformanceModel::parse("333.3333 0.0004\n0 80.12345\n0 1e-9\n").unwrap();
        let back = PerformanceModel::parse(&m.to_text()).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.samples(crate::Strategy::Sequential)[1], 0.0004);
        assert!(back.samples(crate::Strategy::IndexShared)[1] > 0.0);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pmodel.txt");
        std::fs::write(&path, "100 50\n0 80\n0 60\n").unwrap();
        let m = PerformanceModel::from_file(&path).unwrap();
        assert_eq!(m.max_level(), 1);

        let missing = PerformanceModel::from_file(&dir.path().join("missing.txt"));
        assert!(matches!(missing, Err(PerfModelError::ReadError(_))));
    }
}
