pub mod list;
pub mod overlay;
pub mod renderer;
pub mod tree;
