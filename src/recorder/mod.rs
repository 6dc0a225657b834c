#[allow(clippy::module_inception)]
pub mod recorder;
pub mod step;
