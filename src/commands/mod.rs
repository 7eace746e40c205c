//! Command implementations

mod cut;

pub use cut::run_cut;
