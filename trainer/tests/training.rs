
use std::cell::RefCell;

use tch::{Device, Kind, Tensor};

use trainer::config::{NetworkConfig, OptimConfig, TrainConfig};
use trainer::data::Samples;
use trainer::neural::Network;
use trainer::optim::{Optimization, ScheduleConfig};
use trainer::plot::{Plotter, SeriesPlotter};
use trainer::record::{checkpoint, metrics};
use trainer::train::{train_model, Settings, ValueTarget};

use utils::error::Result;

const OPTS : (Kind, Device) = (Kind::Float, Device::Cpu);

fn samples (n: i64) -> Samples 
{
    let input = Tensor::randn(& [n, 3, 9, 9], OPTS);

    let mask = Tensor::rand(& [n, 81], OPTS).gt(0.5).to_kind(Kind::Float);
    let _ = mask.narrow(1, 0, 1).fill_(1.0);

    let weights = Tensor::rand(& [n, 81], OPTS) * & mask;
    let policy = & weights / weights.sum_dim_intlist(& [1], true, Kind::Float);

    let value = Tensor::rand(& [n], OPTS) * 2.0 - 1.0;
    let final_value = value.sign();

    Samples::new(input, value, final_value, policy, mask).unwrap()
}

fn network_config () -> NetworkConfig 
{
    NetworkConfig { input_channels: 3, channels: 8, blocks: 2, wdl_channels: 1, wdl_size: 8, policy_channels: 1, squeeze_size: Some(4), squeeze_bias: true, ..NetworkConfig::default() }
}

fn train_config (output: & std::path::Path, epochs: usize, batch_size: usize, plot_points: usize) -> TrainConfig 
{
    TrainConfig 
    { 
        output_path: output.to_string_lossy().into_owned(), 
        epochs, 
        batch_size, 
        value_target: ValueTarget::Mean, 
        plot_points, 
        plot_window_size: 3, 
        ..TrainConfig::default() 
    }
}

///
/// Records how often it was asked to render, and what it found on disk at the time.
///
#[derive(Default)]
struct CountingPlotter 
{
    seen: RefCell<Vec<usize>>
}

impl Plotter for CountingPlotter 
{
    fn plot (& self, config: & TrainConfig, _has_schedule: bool) -> Result<()>
    {
        let (rows, _) = metrics::load(& config.output_path)?;
        self.seen.borrow_mut().push(rows.len());
        Ok(())
    }
}

#[test]
fn three_epochs_leave_four_checkpoints_and_thirty_rows ()
{
    tch::manual_seed(1);
    let dir = tempfile::tempdir().unwrap();

    let network = Network::new(& network_config(), Device::Cpu).unwrap();
    let settings = Settings::new(train_config(dir.path(), 3, 4, 10), samples(45), samples(9)).unwrap();
    let mut optimization = Optimization::new(& OptimConfig::default(), & network, settings.batch_count()).unwrap();

    let plotter = CountingPlotter::default();
    let recorder = train_model(& network, & settings, & mut optimization, & plotter).unwrap();

    let epochs : Vec<usize> = checkpoint::list_checkpoints(dir.path()).unwrap().into_iter().map(|(e, _)| e).collect();
    assert_eq!(epochs, vec![0, 1, 2, 3]);

    assert_eq!(recorder.rows().len(), 30);
    assert_eq!(* plotter.seen.borrow(), vec![10, 20, 30]);

    let (rows, axis) = metrics::load(dir.path()).unwrap();
    assert_eq!(rows.len(), 30);
    assert_eq!(axis.len(), 30);
    assert!(axis.windows(2).all(|w| w[0] < w[1]));
    assert!(axis.iter().all(|& x| 0.0 <= x && x < 3.0));

    for row in rows 
    {
        assert!(row.train_total.is_finite() && row.test_total.is_finite());
        assert!(row.train_policy >= 0.0 && row.test_policy >= 0.0);
        assert!(row.learning_rate.is_nan());
    }
}

#[test]
fn scheduled_runs_record_the_rate_and_render_its_trace ()
{
    let dir = tempfile::tempdir().unwrap();

    let network = Network::new(& network_config(), Device::Cpu).unwrap();
    let settings = Settings::new(train_config(dir.path(), 1, 5, 4), samples(40), samples(10)).unwrap();

    let optim = OptimConfig { schedule: Some(ScheduleConfig::Cyclic { base_lr: 0.0001, max_lr: 0.01, cycles_per_epoch: 1.0 }), ..OptimConfig::default() };
    let mut optimization = Optimization::new(& optim, & network, settings.batch_count()).unwrap();

    let recorder = train_model(& network, & settings, & mut optimization, & SeriesPlotter).unwrap();

    assert_eq!(recorder.rows().len(), 4);
    assert_eq!(recorder.rows()[0].learning_rate, 0.0001);
    assert!(recorder.rows().iter().all(|r| r.learning_rate > 0.0 && r.learning_rate <= 0.01));
    assert!(dir.path().join("plot_lr_schedule.json").exists());
    assert!(dir.path().join("plot_policy.json").exists());
}

#[test]
fn zero_epochs_still_checkpoint_the_untrained_network ()
{
    let dir = tempfile::tempdir().unwrap();

    let network = Network::new(& network_config(), Device::Cpu).unwrap();
    let settings = Settings::new(train_config(dir.path(), 0, 4, 2), samples(8), samples(4)).unwrap();
    let mut optimization = Optimization::new(& OptimConfig::default(), & network, settings.batch_count()).unwrap();

    train_model(& network, & settings, & mut optimization, & CountingPlotter::default()).unwrap();

    let checkpoints = checkpoint::list_checkpoints(dir.path()).unwrap();
    assert_eq!(checkpoints.len(), 1);

    let restored = Network::from_checkpoint(dir.path(), 0, Device::Cpu).unwrap();
    assert_eq!(restored.config(), network.config());
}

#[test]
fn training_moves_the_weights ()
{
    let dir = tempfile::tempdir().unwrap();
    let data = samples(32);
    let probe = data.input.narrow(0, 0, 4);

    let network = Network::new(& network_config(), Device::Cpu).unwrap();
    let (before, _) = network.forward_t(& probe, false);

    let settings = Settings::new(train_config(dir.path(), 1, 8, 2), data, samples(8)).unwrap();
    let mut optimization = Optimization::new(& OptimConfig::default(), & network, settings.batch_count()).unwrap();
    train_model(& network, & settings, & mut optimization, & CountingPlotter::default()).unwrap();

    let (after, _) = network.forward_t(& probe, false);
    assert!((after - before).abs().max().double_value(& []) > 0.0);
}

#[test]
fn channel_mismatch_is_a_configuration_error ()
{
    let dir = tempfile::tempdir().unwrap();

    let config = NetworkConfig { input_channels: 5, ..network_config() };
    let network = Network::new(& config, Device::Cpu).unwrap();
    let settings = Settings::new(train_config(dir.path(), 1, 4, 2), samples(8), samples(4)).unwrap();
    let mut optimization = Optimization::new(& OptimConfig::default(), & network, settings.batch_count()).unwrap();

    let err = train_model(& network, & settings, & mut optimization, & CountingPlotter::default()).unwrap_err();
    assert!(matches!(err.downcast_ref::<trainer::TrainError>(), Some(trainer::TrainError::Configuration(_))));
}

#[test]
fn illegal_targets_abort_the_epoch ()
{
    let dir = tempfile::tempdir().unwrap();
    let train = samples(8);
    let _ = train.mask.narrow(1, 0, 1).fill_(0.0);
    let _ = train.policy.narrow(1, 0, 1).fill_(1.0);
    let _ = train.mask.narrow(1, 1, 1).fill_(1.0);

    let network = Network::new(& network_config(), Device::Cpu).unwrap();
    let settings = Settings::new(train_config(dir.path(), 1, 4, 2), train, samples(4)).unwrap();
    let mut optimization = Optimization::new(& OptimConfig::default(), & network, settings.batch_count()).unwrap();

    let err = train_model(& network, & settings, & mut optimization, & CountingPlotter::default()).unwrap_err();
    assert!(err.chain().any(|e| matches!(e.downcast_ref::<trainer::TrainError>(), Some(trainer::TrainError::DataIntegrity(_)))));

    // The untrained checkpoint survives the aborted epoch.
    assert!(checkpoint::checkpoint_path(dir.path(), 0).exists());
    assert!(! checkpoint::checkpoint_path(dir.path(), 1).exists());
}
