
use crate::error::TrainError;
use crate::neural::Network;
use crate::optim::Optimization;
use crate::plot::Plotter;
use crate::record::Recorder;

use utils::error::Result;
use utils::log;

use super::epoch::train_epoch;
use super::settings::Settings;

///
/// Trains the network for the configured number of epochs.
///
/// The untrained network is saved as the epoch 0 checkpoint. After every 
/// epoch the network is checkpointed, the epoch's metrics are appended to 
/// the persisted buffer, and the plotter re-renders the run.
///
pub fn train_model (network: & Network, settings: & Settings, optimization: & mut Optimization, plotter: & dyn Plotter) -> Result<Recorder>
{
    let config = & settings.config;

    let data_channels = settings.train_data.input.size()[1];
    if data_channels != network.config().input_channels 
    {
        return Err(TrainError::Configuration(format!(
            "the network expects {} input channels but the samples have {}", network.config().input_channels, data_channels
        )).into());
    }

    let mut recorder = Recorder::create(& config.output_path, network.config())?;
    recorder.checkpoint(network, 0)?;

    for ei in 0 .. config.epochs 
    {
        log::info!("Starting epoch {}/{}", ei + 1, config.epochs);

        let rows = train_epoch(ei, network, settings, optimization)?;
        recorder.checkpoint(network, ei + 1)?;
        recorder.record_epoch(rows)?;

        plotter.plot(config, optimization.learning_rate().is_some())?;
    }

    Ok(recorder)
}
