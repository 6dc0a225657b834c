use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info};

use super::step::{RecordedStep, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecorderMode {
    #[default]
    Idle,
    Recording,
}

/// Passive two-state recorder. Callers check `is_recording()` before
/// capturing an action; `add_step` while idle is ignored.
#[derive(Debug, Default)]
pub struct ActionRecorder {
    mode: RecorderMode,
    steps: Vec<RecordedStep>,
}

impl ActionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> RecorderMode {
        self.mode
    }

    pub fn is_recording(&self) -> bool {
        self.mode == RecorderMode::Recording
    }

    /// Flip between Idle and Recording. Existing steps are kept either way.
    pub fn toggle_recording(&mut self) -> RecorderMode {
        self.mode = match self.mode {
            RecorderMode::Idle => RecorderMode::Recording,
            RecorderMode::Recording => RecorderMode::Idle,
        };
        info!(mode = ?self.mode, steps = self.steps.len(), "recorder toggled");
        self.mode
    }

    /// Append a step while recording. Returns `None` when idle.
    pub fn add_step(&mut self, step: Step) -> Option<&RecordedStep> {
        if !self.is_recording() {
            return None;
        }

        let recorded = RecordedStep {
            order: self.steps.len() + 1,
            captured_at_ms: now_ms(),
            step,
        };
        debug!(order = recorded.order, kind = recorded.step.kind(), "step recorded");
        self.steps.push(recorded);
        self.steps.last()
    }

    pub fn steps(&self) -> &[RecordedStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn clear_steps(&mut self) {
        self.steps.clear();
    }

    /// Hand the log over and leave the recorder empty.
    pub fn take_steps(&mut self) -> Vec<RecordedStep> {
        std::mem::take(&mut self.steps)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
