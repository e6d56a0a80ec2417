
///
/// Application-level error handling. Every crate in the workspace reports 
/// failures through these re-exports so that contexts chain uniformly.
///
pub use anyhow::{anyhow as error, bail, ensure, Context, Error, Result};
