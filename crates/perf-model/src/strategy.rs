// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Execution strategies a query can be assigned.

use std::fmt;

/// How a single query is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Plain sequential scan of the relation.
    Sequential,
    /// Index scan with no concurrent sequential scan.
    IndexSolo,
    /// Index scan sharing the device with one sequential scan.
    IndexShared,
}

impl Strategy {
    /// All strategies in model order (the row order of the model file).
    pub const ALL: [Strategy; 3] = [Strategy::Sequential, Strategy::IndexSolo, Strategy::IndexShared];

    /// Returns the canonical short name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "seq",
            Self::IndexSolo => "index-solo",
            Self::IndexShared => "index-shared",
        }
    }

    /// Returns `true` for the two index-scan strategies.
    pub fn is_index(&self) -> bool {
        !matches!(self, Self::Sequential)
    }

    /// Position of this strategy in [`Strategy::ALL`].
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Sequential => 0,
            Self::IndexSolo => 1,
            Self::IndexShared => 2,
        }
    }

    /// Parses a strategy name (case-insensitive, accepts common aliases).
    pub fn from_str_loose(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "seq" | "sequential" | "seqscan" => Some(Self::Sequential),
            "index-solo" | "index_solo" | "idx" | "index" => Some(Self::IndexSolo),
            "index-shared" | "index_shared" | "idxs" => Some(Self::IndexShared),
            _ => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinals_match_all() {
        for (i, s) in Strategy::ALL.iter().enumerate() {
            assert_eq!(s.ordinal(), i);
        }
    }

    #[test]
    fn test_from_str_loose() {
        assert_eq!(Strategy::from_str_loose("SEQ"), Some(Strategy::Sequential));
        assert_eq!(Strategy::from_str_loose("index_shared"), Some(Strategy::IndexShared));
        assert_eq!(Strategy::from_str_loose("bogus"), None);
    }

    #[test]
    fn test_is_index() {
        assert!(!Strategy::Sequential.is_index());
        assert!(Strategy::IndexSolo.is_index());
        assert!(Strategy::IndexShared.is_index());
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&Strategy::IndexSolo).unwrap();
        assert_eq!(json, "\"index_solo\"");
        let back: Strategy = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Strategy::IndexSolo);
    }
}
