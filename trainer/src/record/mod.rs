
pub mod checkpoint;
pub mod metrics;

pub use metrics::MetricsRow;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TrainError;
use crate::neural::{network, Network};
use crate::neural::config::Config as NetworkConfig;

use utils::error::{Context, Result};
use utils::log;

///
/// The durable state of a run: the checkpoints and the cumulative metrics 
/// buffer, both flushed to the output directory at epoch boundaries.
///
#[derive(Debug)]
pub struct Recorder 
{
    path: PathBuf,
    rows: Vec<MetricsRow>,
    epochs: usize
}

impl Recorder 
{
    ///
    /// Returns the x-axis of the metrics buffer: one point per row, evenly 
    /// spaced over [0, epochs) with the right endpoint excluded.
    ///
    pub fn axis (& self) -> Vec<f32>
    {
        metrics::axis(self.rows.len(), self.epochs)
    }

    ///
    /// Saves the network as the checkpoint of the given epoch.
    ///
    pub fn checkpoint (& self, network: & Network, epoch: usize) -> Result<PathBuf>
    {
        let path = checkpoint::checkpoint_path(& self.path, epoch);
        network.save(& path)?;

        log::info!("Saved checkpoint '{}'.", path.display());
        Ok(path)
    }

    ///
    /// Creates the output directory and stores the network configuration in 
    /// it, so that every checkpoint can be rebuilt on its own.
    ///
    pub fn create (path: impl AsRef<Path>, network: & NetworkConfig) -> Result<Recorder>
    {
        let path = path.as_ref().to_path_buf();

        fs::create_dir_all(& path)
            .map_err(|e| TrainError::Resource(e.to_string()))
            .context(format!("Failed to create output directory '{}'.", path.display()))?;

        utils::write_json(path.join(network::CONFIG_FILE), network)
            .map_err(|e| TrainError::Resource(format!("{:#}", e)))?;

        Ok(Recorder { path, rows: vec![], epochs: 0 })
    }

    ///
    /// Returns the number of epochs recorded so far.
    ///
    pub fn epochs (& self) -> usize 
    {
        self.epochs
    }

    ///
    /// Returns the output directory.
    ///
    pub fn path (& self) -> & Path 
    {
        & self.path
    }

    ///
    /// Appends the rows of a finished epoch and overwrites the persisted 
    /// buffer and axis with the full cumulative contents.
    ///
    pub fn record_epoch (& mut self, rows: Vec<MetricsRow>) -> Result<()>
    {
        self.rows.extend(rows);
        self.epochs += 1;

        metrics::save(& self.path, & self.rows, & self.axis())?;

        log::debug!("Persisted {} metrics rows over {} epochs to '{}'.", self.rows.len(), self.epochs, self.path.display());
        Ok(())
    }

    ///
    /// Returns the cumulative metrics rows.
    ///
    pub fn rows (& self) -> & [MetricsRow]
    {
        & self.rows
    }
}
