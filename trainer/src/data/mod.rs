
pub mod config;
pub mod samples;

pub use samples::Samples;
