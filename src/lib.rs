pub mod cli;
pub mod compiler;
pub mod error;
pub mod geometry;
pub mod recorder;
pub mod scan;
pub mod selection;
pub mod trace;
pub mod view;
