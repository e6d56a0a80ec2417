
use crate::data::Samples;
use crate::error::TrainError;

use super::config::Config;

///
/// Everything a run reads but never changes: its parameters and its data.
///
#[derive(Debug)]
pub struct Settings 
{
    pub config: Config,
    pub train_data: Samples,
    pub test_data: Samples
}

impl Settings 
{
    ///
    /// Returns the number of full batches in an epoch; remainder samples are dropped.
    ///
    pub fn batch_count (& self) -> usize 
    {
        self.train_data.len() / self.config.batch_size
    }

    ///
    /// Bundles the run parameters with the data, rejecting parameters the loop cannot honour.
    ///
    pub fn new (config: Config, train_data: Samples, test_data: Samples) -> Result<Settings, TrainError>
    {
        if config.batch_size == 0 
        {
            return Err(TrainError::Configuration("batch_size must be positive".to_owned()));
        }

        if config.plot_points == 0 || config.plot_window_size == 0 
        {
            return Err(TrainError::Configuration("plot_points and plot_window_size must be positive".to_owned()));
        }

        if train_data.len() < config.batch_size 
        {
            return Err(TrainError::Configuration(format!("{} training samples cannot fill one batch of {}", train_data.len(), config.batch_size)));
        }

        if test_data.is_empty() 
        {
            return Err(TrainError::Configuration("the test set is empty".to_owned()));
        }

        if train_data.input.size()[1] != test_data.input.size()[1] 
        {
            return Err(TrainError::Configuration("train and test inputs have different channel counts".to_owned()));
        }

        Ok(Settings { config, train_data, test_data })
    }
}
