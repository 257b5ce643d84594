use std::collections::HashMap;

use crate::error::{LayoutError, Result};
use crate::history::{DEFAULT_PATTERN_LEN, OutcomeHistory};
use crate::layout::{BigRoadLayout, LayoutResult};
use crate::outcome::{Outcome, format_outcomes, parse_outcomes};

/// Supplier of predicted future outcomes for a game in progress.
///
/// Hosts plug a remote lookup service in here; [`PatternTable`] is the
/// in-memory implementation.
pub trait PredictionSource {
    fn predict(&self, history: &OutcomeHistory) -> Vec<Outcome>;
}

/// Precomputed predictions keyed by trailing outcome patterns.
#[derive(Debug, Clone)]
pub struct PatternTable {
    key_len: usize,
    entries: HashMap<String, Vec<Outcome>>,
}

impl Default for PatternTable {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERN_LEN)
    }
}

impl PatternTable {
    pub fn new(key_len: usize) -> Self {
        Self {
            key_len,
            entries: HashMap::new(),
        }
    }

    pub fn key_len(&self) -> usize {
        self.key_len
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register predictions for `pattern`. Both sides use `P`/`B` symbols.
    pub fn insert(&mut self, pattern: &str, predictions: &str) -> Result<()> {
        let key = format_outcomes(&parse_outcomes(pattern)?);
        if key.is_empty() {
            return Err(LayoutError::PatternTable("pattern must not be empty".into()));
        }
        if key.len() > self.key_len {
            return Err(LayoutError::PatternTable(format!(
                "pattern `{key}` is longer than the key length {}",
                self.key_len
            )));
        }
        self.entries.insert(key, parse_outcomes(predictions)?);
        Ok(())
    }

    /// Load a JSON object of `pattern -> predictions`, e.g. `{"PPB": "BBP"}`.
    pub fn from_json_str(key_len: usize, input: &str) -> Result<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(input)?;
        let mut table = Self::new(key_len);
        for (pattern, predictions) in &raw {
            table.insert(pattern, predictions)?;
        }
        Ok(table)
    }

    /// Longest matching trailing pattern wins; no match yields no preview.
    pub fn lookup(&self, history: &OutcomeHistory) -> &[Outcome] {
        let longest = self.key_len.min(history.len());
        (1..=longest)
            .rev()
            .find_map(|len| self.entries.get(&history.pattern_key(len)))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl PredictionSource for PatternTable {
    fn predict(&self, history: &OutcomeHistory) -> Vec<Outcome> {
        self.lookup(history).to_vec()
    }
}

/// Ask `source` for a preview and lay the history out with it.
pub fn preview_for(
    source: &impl PredictionSource,
    history: &OutcomeHistory,
    engine: &BigRoadLayout,
) -> LayoutResult {
    let preview = source.predict(history);
    engine.layout_history(history, &preview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutConfig;

    fn table() -> PatternTable {
        let mut table = PatternTable::new(4);
        table.insert("B", "P").unwrap();
        table.insert("PB", "BBB").unwrap();
        table.insert("PPPB", "PBPBPB").unwrap();
        table
    }

    #[test]
    fn longest_suffix_wins() {
        let table = table();
        let history = OutcomeHistory::parse("BPPPB").unwrap();
        assert_eq!(table.lookup(&history).len(), 6);

        let history = OutcomeHistory::parse("BBPB").unwrap();
        assert_eq!(table.lookup(&history), parse_outcomes("BBB").unwrap());

        let history = OutcomeHistory::parse("BB").unwrap();
        assert_eq!(table.lookup(&history), [Outcome::Player]);
    }

    #[test]
    fn unknown_pattern_gives_empty_preview() {
        let table = table();
        assert!(table.lookup(&OutcomeHistory::parse("PP").unwrap()).is_empty());
        assert!(table.lookup(&OutcomeHistory::new()).is_empty());
    }

    #[test]
    fn insert_validates_patterns() {
        let mut table = PatternTable::new(3);
        assert!(matches!(
            table.insert("PPPP", "B"),
            Err(LayoutError::PatternTable(_))
        ));
        assert!(matches!(
            table.insert("", "B"),
            Err(LayoutError::PatternTable(_))
        ));
        assert!(matches!(
            table.insert("PZ", "B"),
            Err(LayoutError::InvalidSymbol { symbol: 'Z', .. })
        ));
        table.insert("p b", "").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn loads_from_json() {
        let table = PatternTable::from_json_str(11, r#"{"PPB": "B", "BB": "PPP"}"#).unwrap();
        assert_eq!(table.len(), 2);
        let history = OutcomeHistory::parse("PBB").unwrap();
        assert_eq!(table.predict(&history), parse_outcomes("PPP").unwrap());
        assert!(PatternTable::from_json_str(11, r#"{"PQ": "B"}"#).is_err());
    }

    #[test]
    fn preview_for_marks_predicted_cells() {
        let table = table();
        let engine = BigRoadLayout::new(LayoutConfig::new(6, 20).unwrap()).unwrap();
        let history = OutcomeHistory::parse("PB").unwrap();

        let result = preview_for(&table, &history, &engine);
        assert_eq!(result.preview_placed, 3);
        assert_eq!(result.grid.preview_count(), 3);
        assert_eq!(result.grid.get(2, 1).map(|c| c.source_index), Some(4));
        assert!(!result.grid.get(2, 1).unwrap().confirmed);
    }
}
