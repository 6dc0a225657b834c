pub mod matcher;
pub mod scan_model;
pub mod source_tree;
