use thiserror::Error;

use crate::scan::scan_model::ElementId;

#[derive(Error, Debug)]
pub enum CoreError {
    /// Source tree text could not be parsed
    #[error("Malformed source tree at byte {position}: {message}")]
    MalformedSource { position: u64, message: String },

    /// Selection referenced an id that is not part of the current scan
    #[error("Element {0} is not part of the current scan")]
    UnknownElement(ElementId),

    /// Selection referenced an element the operator already deleted
    #[error("Element {0} has been deleted")]
    DeletedElement(ElementId),

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Scan payload could not be decoded: {0}")]
    ScanPayload(#[from] serde_json::Error),

    #[error("Step log could not be decoded: {0}")]
    StepLog(#[from] serde_yaml::Error),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failure raised by a view renderer while reacting to a store change.
#[derive(Error, Debug)]
pub enum ViewError {
    #[error("{view} has no visual unit for element {id}")]
    MissingUnit { view: &'static str, id: ElementId },

    #[error("{view} failed: {message}")]
    Render { view: &'static str, message: String },
}
