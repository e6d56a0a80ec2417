
use std::fs;
use std::path::Path;

use super::error::*;

pub use serde::{Deserialize, Serialize};
pub use serde::de::DeserializeOwned;

///
/// Reads and deserializes a TOML file.
///
pub fn read_toml<T: DeserializeOwned> (path: impl AsRef<Path>) -> Result<T>
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).context(format!("Failed to read '{}'.", path.display()))?;
    let value = toml::from_str(& text).context(format!("Failed to parse '{}' as TOML.", path.display()))?;
    Ok(value)
}

///
/// Serializes a value to a pretty-printed JSON file, replacing any previous contents.
///
pub fn write_json<T: Serialize> (path: impl AsRef<Path>, value: & T) -> Result<()>
{
    let path = path.as_ref();
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text).context(format!("Failed to write '{}'.", path.display()))?;
    Ok(())
}

///
/// Reads and deserializes a JSON file.
///
pub fn read_json<T: DeserializeOwned> (path: impl AsRef<Path>) -> Result<T>
{
    let path = path.as_ref();
    let text = fs::read_to_string(path).context(format!("Failed to read '{}'.", path.display()))?;
    let value = serde_json::from_str(& text).context(format!("Failed to parse '{}' as JSON.", path.display()))?;
    Ok(value)
}
