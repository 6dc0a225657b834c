use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::{recorder::step::RecordedStep, scan::scan_model::ElementId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceKind {
    ScanIngested,
    SelectionChanged,
    StepRecorded,
}

/// One line of the JSONL session trace.
#[derive(Debug, Serialize)]
pub struct TraceEvent {
    pub timestamp_ms: u128,
    pub kind: TraceKind,

    pub selected: Option<usize>,
    pub previous: Option<usize>,

    pub step_order: Option<usize>,
    pub step: Option<serde_json::Value>,

    pub detail: Option<String>,
}

impl TraceEvent {
    pub fn now(kind: TraceKind) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0),
            kind,
            selected: None,
            previous: None,
            step_order: None,
            step: None,
            detail: None,
        }
    }

    pub fn with_selection(mut self, new: Option<ElementId>, old: Option<ElementId>) -> Self {
        self.selected = new.map(|id| id.0);
        self.previous = old.map(|id| id.0);
        self
    }

    pub fn with_step(mut self, step: &RecordedStep) -> Self {
        self.step_order = Some(step.order);
        self.step = serde_json::to_value(&step.step).ok();
        self
    }

    pub fn with_detail(mut self, detail: impl ToString) -> Self {
        self.detail = Some(detail.to_string());
        self
    }
}
