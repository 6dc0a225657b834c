pub mod rect;
pub mod scale;
