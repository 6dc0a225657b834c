use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::rect::{Rect, Size};

/// Position of an element in the scan that produced it. Never reused within
/// a scan, including after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub usize);

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How the backend located an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Strategy {
    Id,
    AccId,
    Anchor,
    Text,
    Other,
}

impl Strategy {
    /// Classify a backend strategy label such as `ID`, `ACC_ID`, `TEXT_XP`
    /// or `ANCHOR_XP`. `ACC_ID` is tested first since it contains `ID`.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_ascii_uppercase();
        if label.contains("ACC_ID") {
            Strategy::AccId
        } else if label.contains("ANCHOR") {
            Strategy::Anchor
        } else if label.contains("TEXT") {
            Strategy::Text
        } else if label.split('_').any(|part| part == "ID") {
            Strategy::Id
        } else {
            Strategy::Other
        }
    }

    pub fn badge(&self) -> &'static str {
        match self {
            Strategy::Id => "ID",
            Strategy::AccId => "ACC_ID",
            Strategy::Anchor => "ANCHOR",
            Strategy::Text => "TEXT",
            Strategy::Other => "OTHER",
        }
    }
}

/// One candidate interactive element found in a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    pub strategy: Strategy,
    pub locator_expression: String,
    pub display_name: String,
    pub text: Option<String>,
    pub bounds: Option<Rect>,
    pub deleted: bool,
}

// ============================================================================
// Backend payload
// ============================================================================

/// Element as reported by the automation backend.
#[derive(Debug, Clone, Deserialize)]
pub struct RawElement {
    pub coords: Option<RawCoords>,
    #[serde(default)]
    pub variable: String,
    pub locator: String,
    #[serde(default)]
    pub strategy: String,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RawCoords {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

/// One scan result as delivered by the automation backend.
#[derive(Debug, Clone, Deserialize)]
pub struct ScanPayload {
    pub elements: Vec<RawElement>,
    #[serde(default)]
    pub raw_source: String,
    #[serde(default)]
    pub window_w: f64,
    #[serde(default)]
    pub window_h: f64,
    pub page_name: Option<String>,
}

impl ScanPayload {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A scan with ids assigned, ready for the selection store.
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub elements: Vec<Element>,
    pub source_tree_text: String,
    pub device: Size,
    pub page_name: Option<String>,
}

impl ScanResult {
    /// Assign ids by array position, dropping any element whose locator the
    /// caller has rejected (previously deleted locators).
    pub fn from_payload<F>(payload: ScanPayload, mut rejected: F) -> Self
    where
        F: FnMut(&str) -> bool,
    {
        let elements = payload
            .elements
            .into_iter()
            .filter(|raw| !rejected(&raw.locator))
            .enumerate()
            .map(|(idx, raw)| Element {
                id: ElementId(idx),
                strategy: Strategy::from_label(&raw.strategy),
                locator_expression: raw.locator,
                display_name: raw.variable,
                text: raw.text.filter(|t| !t.is_empty()),
                bounds: raw.coords.map(|c| Rect::new(c.x, c.y, c.w, c.h)),
                deleted: false,
            })
            .collect();

        ScanResult {
            elements,
            source_tree_text: payload.raw_source,
            device: Size::new(payload.window_w, payload.window_h),
            page_name: payload.page_name,
        }
    }
}
