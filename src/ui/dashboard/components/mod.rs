//! Dashboard component modules
//!
//! Contains all individual rendering components

pub mod candidates;
pub mod comparison;
pub mod footer;
pub mod header;
pub mod logs;
pub mod results;
pub mod series;
