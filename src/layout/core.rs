use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::{LayoutError, Result};
use crate::history::OutcomeHistory;
use crate::layout::grid::{Cell, Grid, Position};
use crate::logging::{event_with_fields, json_kv};
use crate::metrics::LayoutMetrics;
use crate::outcome::{Outcome, parse_outcomes};
use crate::{LogLevel, Logger};

/// When a repeating streak stops moving down and turns right.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BendRule {
    /// Bend at the last row, or when the slot below is already taken.
    #[default]
    FloorOrBlocked,
    /// Bend only at the last row. Reproduces score cards that never checked
    /// the slot below; collisions are then resolved by column advance.
    FloorOnly,
}

/// Grid sizes used by the dashboard screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScreenPreset {
    /// Full game history, 6x42.
    History,
    /// Compact pattern editor, 6x20.
    Compact,
    /// Narrow pattern editor, 6x18.
    Editor,
}

impl ScreenPreset {
    pub fn dimensions(self) -> (usize, usize) {
        match self {
            ScreenPreset::History => (6, 42),
            ScreenPreset::Compact => (6, 20),
            ScreenPreset::Editor => (6, 18),
        }
    }
}

/// Grid dimensions and placement rules for one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(default)]
    pub bend_rule: BendRule,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::preset(ScreenPreset::History)
    }
}

impl LayoutConfig {
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let config = Self {
            rows,
            cols,
            bend_rule: BendRule::default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn preset(preset: ScreenPreset) -> Self {
        let (rows, cols) = preset.dimensions();
        Self {
            rows,
            cols,
            bend_rule: BendRule::default(),
        }
    }

    pub fn with_bend_rule(mut self, bend_rule: BendRule) -> Self {
        self.bend_rule = bend_rule;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.rows == 0 {
            return Err(LayoutError::InvalidConfig("rows must be at least 1".into()));
        }
        if self.cols == 0 {
            return Err(LayoutError::InvalidConfig("cols must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse a screen configuration such as `{"rows": 6, "cols": 20}`.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }
}

/// Why preview placement ended before the preview sequence ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewStop {
    /// The next preview cell would land at `col >= cols`.
    ColumnsExhausted,
    /// The next preview cell would land on an occupied slot.
    CellOccupied,
    /// The confirmed pass truncated, so preview was never attempted.
    Skipped,
}

/// Output of a layout pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutResult {
    pub grid: Grid,
    /// Confirmed outcomes ran past the last column.
    pub truncated: bool,
    /// Confirmed outcomes that were not placed.
    pub dropped: usize,
    pub preview_placed: usize,
    pub preview_stop: Option<PreviewStop>,
    /// Start column of every confirmed streak, in order.
    pub streak_starts: Vec<usize>,
    pub last_confirmed: Option<Position>,
    /// Streaks that turned right.
    pub bends: usize,
    /// Confirmed cells moved right to avoid an occupied slot.
    pub shifted: usize,
}

impl LayoutResult {
    pub fn placed(&self) -> usize {
        self.grid.confirmed_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    First,
    Continue,
    NewStreak,
}

/// Cursor threaded through the confirmed and preview passes.
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    row: usize,
    col: usize,
    prev: Option<Outcome>,
    vertical_start_col: usize,
    is_bent: bool,
}

impl Cursor {
    /// Move to the slot for `current`. `None` once the grid is out of columns.
    fn advance(&mut self, current: Outcome, grid: &Grid, rule: BendRule) -> Option<Transition> {
        let transition = match self.prev {
            None => {
                self.row = 0;
                self.col = 0;
                self.vertical_start_col = 0;
                Transition::First
            }
            Some(prev) if prev == current => {
                if self.is_bent {
                    self.col += 1;
                } else if self.row + 1 >= grid.rows() {
                    self.col += 1;
                    self.is_bent = true;
                } else if rule == BendRule::FloorOrBlocked
                    && grid.is_occupied(self.row + 1, self.col)
                {
                    self.col += 1;
                    self.is_bent = true;
                } else {
                    self.row += 1;
                }
                Transition::Continue
            }
            Some(_) => {
                self.vertical_start_col += 1;
                self.col = self.vertical_start_col;
                self.row = 0;
                self.is_bent = false;
                Transition::NewStreak
            }
        };

        (self.col < grid.cols()).then_some(transition)
    }

    fn position(&self) -> Position {
        Position::new(self.row, self.col)
    }
}

struct Pass {
    grid: Grid,
    cursor: Cursor,
    rule: BendRule,
    streak_starts: Vec<usize>,
    last_confirmed: Option<Position>,
    bends: usize,
    shifted: usize,
}

impl Pass {
    fn new(grid: Grid, rule: BendRule) -> Self {
        Self {
            grid,
            cursor: Cursor::default(),
            rule,
            streak_starts: Vec::new(),
            last_confirmed: None,
            bends: 0,
            shifted: 0,
        }
    }

    /// Place one confirmed outcome. Returns `false` when the grid is exhausted.
    fn place_confirmed(&mut self, current: Outcome, source_index: usize) -> bool {
        let was_bent = self.cursor.is_bent;
        let Some(transition) = self.cursor.advance(current, &self.grid, self.rule) else {
            return false;
        };

        // Column advance: never overwrite, slide right along the row instead.
        while self.grid.is_occupied(self.cursor.row, self.cursor.col) {
            self.cursor.col += 1;
            self.shifted += 1;
            match transition {
                Transition::First | Transition::NewStreak => {
                    self.cursor.vertical_start_col = self.cursor.col;
                }
                Transition::Continue => self.cursor.is_bent = true,
            }
            if self.cursor.col >= self.grid.cols() {
                return false;
            }
        }

        let position = self.cursor.position();
        if self
            .grid
            .place(position.row, position.col, Cell::confirmed(current, source_index))
            .is_err()
        {
            return false;
        }

        if !was_bent && self.cursor.is_bent && transition == Transition::Continue {
            self.bends += 1;
        }
        if transition != Transition::Continue {
            self.streak_starts.push(self.cursor.vertical_start_col);
        }
        self.cursor.prev = Some(current);
        self.last_confirmed = Some(position);
        true
    }

    /// Place one preview outcome, or report why preview placement ends.
    fn place_preview(&mut self, current: Outcome, source_index: usize) -> Option<PreviewStop> {
        if self.cursor.advance(current, &self.grid, self.rule).is_none() {
            return Some(PreviewStop::ColumnsExhausted);
        }
        let Position { row, col } = self.cursor.position();
        if self
            .grid
            .place(row, col, Cell::preview(current, source_index))
            .is_err()
        {
            return Some(PreviewStop::CellOccupied);
        }
        self.cursor.prev = Some(current);
        None
    }
}

/// Big Road layout engine bound to one grid configuration.
#[derive(Clone)]
pub struct BigRoadLayout {
    config: LayoutConfig,
    blank: Grid,
    logger: Option<Logger>,
    metrics: Option<Arc<Mutex<LayoutMetrics>>>,
    log_target: String,
}

impl BigRoadLayout {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        let blank = Grid::new(config.rows, config.cols)?;
        Ok(Self {
            config,
            blank,
            logger: None,
            metrics: None,
            log_target: "bigroad::layout".to_string(),
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<Mutex<LayoutMetrics>>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(LayoutMetrics::new())));
        }
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<LayoutMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Lay out confirmed `outcomes`, then annotate with `preview`.
    pub fn layout(&self, outcomes: &[Outcome], preview: &[Outcome]) -> LayoutResult {
        let mut pass = Pass::new(self.blank.clone(), self.config.bend_rule);

        let mut placed = 0;
        for (idx, &current) in outcomes.iter().enumerate() {
            if !pass.place_confirmed(current, idx + 1) {
                break;
            }
            placed += 1;
        }
        let truncated = placed < outcomes.len();

        let mut preview_placed = 0;
        let preview_stop = if truncated {
            (!preview.is_empty()).then_some(PreviewStop::Skipped)
        } else {
            let mut stop = None;
            for (offset, &current) in preview.iter().enumerate() {
                stop = pass.place_preview(current, outcomes.len() + offset + 1);
                if stop.is_some() {
                    break;
                }
                preview_placed += 1;
            }
            stop
        };

        let result = LayoutResult {
            grid: pass.grid,
            truncated,
            dropped: outcomes.len() - placed,
            preview_placed,
            preview_stop,
            streak_starts: pass.streak_starts,
            last_confirmed: pass.last_confirmed,
            bends: pass.bends,
            shifted: pass.shifted,
        };

        self.observe(&result, outcomes.len(), preview.len());
        result
    }

    pub fn layout_history(&self, history: &OutcomeHistory, preview: &[Outcome]) -> LayoutResult {
        self.layout(history.as_slice(), preview)
    }

    /// Validating entry point for raw symbol strings.
    pub fn layout_symbols(&self, outcomes: &str, preview: &str) -> Result<LayoutResult> {
        let outcomes = parse_outcomes(outcomes)?;
        let preview = parse_outcomes(preview)?;
        Ok(self.layout(&outcomes, &preview))
    }

    fn observe(&self, result: &LayoutResult, outcomes: usize, preview: usize) {
        if let Some(metrics) = &self.metrics {
            if let Ok(mut metrics) = metrics.lock() {
                metrics.record_layout(result);
            }
        }

        let Some(logger) = &self.logger else {
            return;
        };

        let event = event_with_fields(
            LogLevel::Debug,
            &self.log_target,
            "layout",
            [
                json_kv("rows", self.config.rows),
                json_kv("cols", self.config.cols),
                json_kv("outcomes", outcomes),
                json_kv("preview", preview),
                json_kv("placed", result.placed()),
                json_kv("preview_placed", result.preview_placed),
            ],
        );
        // Logging never fails a layout.
        let _ = logger.log_event(event);

        if result.truncated {
            let event = event_with_fields(
                LogLevel::Warn,
                &self.log_target,
                "layout_truncated",
                [
                    json_kv("cols", self.config.cols),
                    json_kv("dropped", result.dropped),
                ],
            );
            let _ = logger.log_event(event);
        }
    }
}

/// One-shot layout over a `rows × cols` grid.
pub fn layout(
    outcomes: &[Outcome],
    rows: usize,
    cols: usize,
    preview: &[Outcome],
) -> Result<LayoutResult> {
    let engine = BigRoadLayout::new(LayoutConfig::new(rows, cols)?)?;
    Ok(engine.layout(outcomes, preview))
}

/// One-shot layout over raw symbol strings, rejecting anything but `P`/`B`.
pub fn layout_symbols(outcomes: &str, preview: &str, config: LayoutConfig) -> Result<LayoutResult> {
    BigRoadLayout::new(config)?.layout_symbols(outcomes, preview)
}
