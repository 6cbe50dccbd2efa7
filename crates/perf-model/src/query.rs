// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Queries and workloads.
//!
//! A [`Workload`] is stored on disk as a JSON array:
//!
//! ```json
//! [{ "blocks": 1000, "deadline": 30 }, { "blocks": 4096, "deadline": 120 }]
//! ```

use crate::PerfModelError;
use std::path::Path;

/// One unit of work: a scan of `blocks` blocks that should finish within
/// `deadline` time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Query {
    blocks: u64,
    deadline: u64,
}

impl Query {
    pub fn new(blocks: u64, deadline: u64) -> Self {
        Self { blocks, deadline }
    }

    /// Number of blocks the query reads.
    pub fn blocks(&self) -> u64 {
        self.blocks
    }

    /// Time budget for the query.
    pub fn deadline(&self) -> u64 {
        self.deadline
    }
}

/// An ordered sequence of queries.
///
/// Order only determines the index of each query's decision variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Workload {
    queries: Vec<Query>,
}

impl Workload {
    pub fn new(queries: Vec<Query>) -> Self {
        Self { queries }
    }

    /// Number of queries (`Q`).
    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn queries(&self) -> &[Query] {
        &self.queries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Query> {
        self.queries.iter()
    }

    /// Returns the query at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Query> {
        self.queries.get(index)
    }

    /// Sum of all deadlines.
    pub fn total_deadline(&self) -> u64 {
        self.queries.iter().map(|q| q.deadline).sum()
    }

    /// Sum of all block counts.
    pub fn total_blocks(&self) -> u64 {
        self.queries.iter().map(|q| q.blocks).sum()
    }

    /// Loads a workload from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, PerfModelError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parses a workload from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, PerfModelError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialises the workload to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, PerfModelError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Returns a one-line summary for logs and CLI output.
    pub fn summary(&self) -> String {
        format!(
            "Workload: {} queries, {} blocks total, deadlines sum {}",
            self.len(),
            self.total_blocks(),
            self.total_deadline(),
        )
    }
}

impl From<Vec<Query>> for Workload {
    fn from(queries: Vec<Query>) -> Self {
        Self::new(queries)
    }
}

impl FromIterator<Query> for Workload {
    fn from_iter<I: IntoIterator<Item = Query>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Workload {
    type Item = &'a Query;
    type IntoIter = std::slice::Iter<'a, Query>;

    fn into_iter(self) -> Self::IntoIter {
        self.queries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_accessors() {
        let q = Query::new(1000, 30);
        assert_eq!(q.blocks(), 1000);
        assert_eq!(q.deadline(), 30);
    }

    #[test]
    fn test_workload_totals() {
        let w: Workload = vec![Query::new(10, 1), Query::new(20, 2)].into();
        assert_eq!(w.len(), 2);
        assert_eq!(w.total_blocks(), 30);
        assert_eq!(w.total_deadline(), 3);
        assert!(w.summary().contains("2 queries"));
    }

    #[test]
    fn test_json_format() {
        let w = Workload::from_json(r#"[{"blocks": 1000, "deadline": 30}]"#).unwrap();
        assert_eq!(w.get(0), Some(&Query::new(1000, 30)));

        let back = Workload::from_json(&w.to_json().unwrap()).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn test_json_rejects_negative() {
        let result = Workload::from_json(r#"[{"blocks": -1, "deadline": 30}]"#);
        assert!(matches!(result, Err(PerfModelError::WorkloadParseError(_))));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workload.json");
        std::fs::write(&path, r#"[{"blocks": 5, "deadline": 9}, {"blocks": 7, "deadline": 1}]"#)
            .unwrap();
        let w = Workload::from_file(&path).unwrap();
        assert_eq!(w.len(), 2);

        let missing = Workload::from_file(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(PerfModelError::ReadError(_))));
    }
}
