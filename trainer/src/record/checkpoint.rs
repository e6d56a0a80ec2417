
use std::fs;
use std::path::{Path, PathBuf};

use utils::error::{Context, Result};

///
/// Returns the path of the checkpoint taken after the given number of epochs.
///
pub fn checkpoint_path (dir: impl AsRef<Path>, epoch: usize) -> PathBuf 
{
    dir.as_ref().join(format!("model_{}_epochs.ot", epoch))
}

///
/// Returns the epoch tagged in a checkpoint file name, if it is one.
///
pub fn parse_epoch (name: & str) -> Option<usize>
{
    name.strip_prefix("model_")?.strip_suffix("_epochs.ot")?.parse().ok()
}

///
/// Lists the checkpoints in a directory, ordered by epoch.
///
pub fn list_checkpoints (dir: impl AsRef<Path>) -> Result<Vec<(usize, PathBuf)>>
{
    let dir = dir.as_ref();
    let mut found = vec![];

    for entry in fs::read_dir(dir).context(format!("Failed to list '{}'.", dir.display()))?
    {
        let path = entry?.path();
        if let Some(epoch) = path.file_name().and_then(|n| n.to_str()).and_then(parse_epoch)
        {
            found.push((epoch, path));
        }
    }

    found.sort();
    Ok(found)
}
