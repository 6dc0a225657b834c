#[allow(clippy::module_inception)]
pub mod compiler;
pub mod declarative;
pub mod imperative;
pub mod locator;
pub mod variables;
