use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scan::scan_model::Element;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

impl fmt::Display for ScrollDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
            ScrollDirection::Left => "left",
            ScrollDirection::Right => "right",
        };
        f.write_str(s)
    }
}

/// A single operator action captured while recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Step {
    /// Tap at device coordinates
    #[serde(rename = "coordinate_tap", alias = "tap")]
    Tap { x: i64, y: i64 },

    Scroll { direction: ScrollDirection },

    Back,

    #[serde(alias = "hideKeyboard")]
    HideKeyboard,

    SendKeys {
        #[serde(rename = "locator")]
        locator_expression: String,
        text: String,
    },

    AssertVisible {
        #[serde(rename = "locator")]
        locator_expression: String,
    },

    AssertText {
        #[serde(rename = "locator")]
        locator_expression: String,
        expected: String,
    },

    ElementClick {
        #[serde(rename = "locator")]
        locator_expression: String,
    },
}

impl Step {
    pub fn element_click(element: &Element) -> Self {
        Step::ElementClick {
            locator_expression: element.locator_expression.clone(),
        }
    }

    pub fn send_keys(element: &Element, text: impl Into<String>) -> Self {
        Step::SendKeys {
            locator_expression: element.locator_expression.clone(),
            text: text.into(),
        }
    }

    pub fn assert_visible(element: &Element) -> Self {
        Step::AssertVisible {
            locator_expression: element.locator_expression.clone(),
        }
    }

    pub fn assert_text(element: &Element, expected: impl Into<String>) -> Self {
        Step::AssertText {
            locator_expression: element.locator_expression.clone(),
            expected: expected.into(),
        }
    }

    /// Locator carried by the step, if it targets an element.
    pub fn locator_expression(&self) -> Option<&str> {
        match self {
            Step::SendKeys { locator_expression, .. }
            | Step::AssertVisible { locator_expression }
            | Step::AssertText { locator_expression, .. }
            | Step::ElementClick { locator_expression } => Some(locator_expression),
            Step::Tap { .. } | Step::Scroll { .. } | Step::Back | Step::HideKeyboard => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Step::Tap { .. } => "coordinate_tap",
            Step::Scroll { .. } => "scroll",
            Step::Back => "back",
            Step::HideKeyboard => "hide_keyboard",
            Step::SendKeys { .. } => "send_keys",
            Step::AssertVisible { .. } => "assert_visible",
            Step::AssertText { .. } => "assert_text",
            Step::ElementClick { .. } => "element_click",
        }
    }
}

impl AsRef<Step> for Step {
    fn as_ref(&self) -> &Step {
        self
    }
}

/// A step as stored in the recorder log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedStep {
    /// One-based position in the log
    pub order: usize,

    /// Capture time, milliseconds since the Unix epoch
    pub captured_at_ms: u64,

    #[serde(flatten)]
    pub step: Step,
}

impl AsRef<Step> for RecordedStep {
    fn as_ref(&self) -> &Step {
        &self.step
    }
}
