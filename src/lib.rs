//! French baby names dashboard: loads the names-by-department table and the
//! department boundaries, and computes the yearly top names, the per-department
//! extremes and the gender split of a name over time.

pub mod charts;
pub mod config;
pub mod data;
pub mod export;
pub mod stats;
