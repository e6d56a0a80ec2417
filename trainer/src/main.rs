
use clap::Parser;

use tch::Device;

use trainer::config::Config;
use trainer::data::Samples;
use trainer::neural::{summary, Network};
use trainer::optim::Optimization;
use trainer::plot::{Plotter, SeriesPlotter};
use trainer::record::checkpoint;
use trainer::train::{train_model, Settings};

use utils::error::{self, Result};
use utils::log;

///
/// A structure representing command line arguments.
///
#[derive(Parser)]
struct CLIArgs 
{
    #[clap(short, long, default_value = "train")]
    mode: String,

    #[clap(short, long, default_value = "config/config.toml")]
    config: String
}

fn main () -> Result<()>
{
    let args = CLIArgs::parse();
    let config : Config = utils::read_toml(& args.config)?;

    let _logger = log::initialize(& config.log_path, "trainer")?;

    match args.mode.as_str() 
    {
        "train" => 
        {
            train(& config)?;
        },
        "plot" => 
        {
            SeriesPlotter.plot(& config.train, config.optim.schedule.is_some())?;
        },
        "summary" => 
        {
            let network = Network::new(& config.network, Device::Cpu)?;
            log::info!("{}", summary::summary(& network));

            match checkpoint::list_checkpoints(& config.train.output_path)
            {
                Ok(checkpoints) => 
                {
                    for (epoch, path) in checkpoints 
                    {
                        log::info!("Checkpoint after {} epochs: '{}'.", epoch, path.display());
                    }
                },
                Err(e) => log::warn!("No checkpoints listed for '{}': {:#}", & config.train.output_path, e)
            }
        },
        _ => 
        {
            return Err(error::error!("Mode '{}' is unsupported.", & args.mode)); 
        }
    };

    Ok(())
}

///
/// Loads the data, builds the network and optimizer, and runs the training loop.
///
fn train (config: & Config) -> Result<()>
{
    if let Some(seed) = config.train.seed 
    {
        tch::manual_seed(seed);
    }

    let device = Device::cuda_if_available();

    let train_data = Samples::load(& config.data.train, device)?;
    let test_data = Samples::load(& config.data.test, device)?;

    if config.data.validate 
    {
        train_data.validate()?;
        test_data.validate()?;
    }

    log::info!("train size: {}", train_data.len());
    log::info!("test size: {}", test_data.len());

    let mut network = Network::new(& config.network, device)?;
    if let Some(path) = & config.train.initial_weights 
    {
        network.load(path)?;
        log::info!("Continuing from weights '{}'.", path);
    }

    log::info!("{}", summary::summary(& network));

    let settings = Settings::new(config.train.clone(), train_data, test_data)?;
    let mut optimization = Optimization::new(& config.optim, & network, settings.batch_count())?;

    let recorder = train_model(& network, & settings, & mut optimization, & SeriesPlotter)?;
    log::info!("Finished {} epochs, outputs in '{}'.", recorder.epochs(), recorder.path().display());

    Ok(())
}
