
use crate::data::Samples;
use crate::loss;
use crate::neural::Network;
use crate::optim::Optimization;
use crate::record::MetricsRow;

use tch::{Device, Kind, Tensor};

use utils::error::Result;
use utils::log;

use super::settings::Settings;
use super::target::ValueTarget;

///
/// Returns the batches of an epoch at which the test set is sampled and a 
/// metrics row is recorded: min(plot_points, batch_count) distinct indices, 
/// ascending, from the first batch to the last.
///
pub fn plot_batches (batch_count: usize, plot_points: usize) -> Vec<usize>
{
    let points = plot_points.min(batch_count);

    match points 
    {
        0 => vec![],
        1 => vec![0],
        _ => (0 .. points).map(|i| i * (batch_count - 1) / (points - 1)).collect()
    }
}

///
/// Splits one random permutation of the training indices into consecutive 
/// batches. Every index appears at most once; the remainder that does not 
/// fill a batch is dropped.
///
pub fn epoch_batches (train_size: usize, batch_size: usize, device: Device) -> Vec<Tensor>
{
    let shuffle = Tensor::randperm(train_size as i64, (Kind::Int64, device));
    let batch_count = train_size / batch_size;

    (0 .. batch_count)
        .map(|bi| shuffle.narrow(0, (bi * batch_size) as i64, batch_size as i64))
        .collect()
}

///
/// Runs the network on a batch and returns the (value, policy) losses.
///
pub fn evaluate (network: & Network, batch: & Samples, target: ValueTarget, train: bool) -> Result<(Tensor, Tensor)>
{
    let (wdl, policy) = network.forward_t(& batch.input, train);

    let value_loss = loss::value_loss(& wdl, & target.select(batch));
    let policy_loss = loss::masked_cross_entropy(& loss::flatten_policy(& policy), & batch.policy, & batch.mask)?;

    Ok((value_loss, policy_loss))
}

///
/// Trains the network for one epoch and returns the metrics rows recorded at 
/// the plot batches.
///
pub fn train_epoch (epoch: usize, network: & Network, settings: & Settings, optimization: & mut Optimization) -> Result<Vec<MetricsRow>>
{
    let config = & settings.config;
    let device = network.device();
    let batch_count = settings.batch_count();

    let plot_batches = plot_batches(batch_count, config.plot_points);
    let mut next_plot = plot_batches.iter().peekable();
    let mut rows = Vec::with_capacity(plot_batches.len());

    for (bi, train_indices) in epoch_batches(settings.train_data.len(), config.batch_size, device).iter().enumerate()
    {
        let is_plot_batch = next_plot.next_if_eq(&& bi).is_some();
        let train_batch = settings.train_data.pick_batch(train_indices).random_symmetry();
        let mut row = MetricsRow::empty();

        if is_plot_batch 
        {
            // Test indices are drawn with replacement.

            let test_indices = Tensor::randint(settings.test_data.len() as i64, & [config.batch_size as i64], (Kind::Int64, device));
            let test_batch = settings.test_data.pick_batch(& test_indices).random_symmetry();

            let (test_value_loss, test_policy_loss) = tch::no_grad(|| evaluate(network, & test_batch, config.value_target, false))?;
            let test_loss = & test_value_loss + & test_policy_loss * config.policy_weight;

            row.test_total = test_loss.double_value(& []) as f32;
            row.test_value = test_value_loss.double_value(& []) as f32;
            row.test_policy = test_policy_loss.double_value(& []) as f32;

            log::info!("Test batch: {:.2}, {:.2}, {:.2}", row.test_total, row.test_value, row.test_policy);
        }

        let (train_value_loss, train_policy_loss) = evaluate(network, & train_batch, config.value_target, true)?;
        let train_loss = & train_value_loss + & train_policy_loss * config.policy_weight;

        let total = train_loss.double_value(& []) as f32;
        let value = train_value_loss.double_value(& []) as f32;
        let policy = train_policy_loss.double_value(& []) as f32;

        if is_plot_batch 
        {
            row.train_total = total;
            row.train_value = value;
            row.train_policy = policy;
            row.learning_rate = optimization.learning_rate().map_or(f32::NAN, |r| r as f32);

            rows.push(row);
        }

        log::info!("Epoch {}, train batch {}/{}: {:.2}, {:.2}, {:.2}", epoch, bi, batch_count, total, value, policy);

        optimization.step(& train_loss);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use crate::data::samples::tests::random_samples;
    use crate::config::NetworkConfig;

    #[test]
    fn configured_value_target_reaches_the_value_loss ()
    {
        let config = NetworkConfig { input_channels: 3, channels: 8, blocks: 1, wdl_size: 8, policy_channels: 1, ..NetworkConfig::default() };
        let network = Network::new(& config, Device::Cpu).unwrap();

        let s = random_samples(16, 3);
        let batch = Samples 
        { 
            value: Tensor::ones(& [16], (Kind::Float, Device::Cpu)), 
            final_value: - Tensor::ones(& [16], (Kind::Float, Device::Cpu)), 
            ..s 
        };

        let loss_for = |target: ValueTarget| evaluate(& network, & batch, target, false).unwrap().0.double_value(& []);
        let from_value = loss_for(ValueTarget::Value);
        let from_final = loss_for(ValueTarget::FinalValue);
        let from_mean = loss_for(ValueTarget::Mean);

        assert!((from_value - from_final).abs() > 1e-6);

        let (wdl, _) = network.forward_t(& batch.input, false);
        let midpoint = (& batch.value + & batch.final_value) / 2.0;
        let expected = loss::value_loss(& wdl, & midpoint).double_value(& []);

        assert!((from_mean - expected).abs() < 1e-6);
    }

    #[test]
    fn plot_batches_are_distinct_and_span_the_epoch ()
    {
        for batch_count in [1, 2, 7, 10, 113]
        {
            for plot_points in [1, 2, 3, 10, 50, 200]
            {
                let batches = plot_batches(batch_count, plot_points);
                let expected = plot_points.min(batch_count);

                assert_eq!(batches.len(), expected);
                assert!(batches.windows(2).all(|w| w[0] < w[1]));
                assert_eq!(batches[0], 0);
                assert!(* batches.last().unwrap() < batch_count);

                if expected > 1 
                {
                    assert_eq!(* batches.last().unwrap(), batch_count - 1);
                }
            }
        }
    }

    #[test]
    fn plot_batches_grow_with_plot_points ()
    {
        let counts : Vec<usize> = (1 ..= 40).map(|p| plot_batches(25, p).len()).collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(* counts.last().unwrap(), 25);
    }

    #[test]
    fn empty_epoch_has_no_plot_batches ()
    {
        assert!(plot_batches(0, 10).is_empty());
    }

    #[test]
    fn epoch_batches_cover_each_index_at_most_once ()
    {
        for (train_size, batch_size) in [(100, 10), (103, 10), (7, 3), (5, 8)]
        {
            let batches = epoch_batches(train_size, batch_size, Device::Cpu);
            assert_eq!(batches.len(), train_size / batch_size);

            let mut seen : Vec<i64> = batches.iter().flat_map(|b| Vec::<i64>::from(b)).collect();
            assert!(batches.iter().all(|b| b.size() == vec![batch_size as i64]));

            seen.sort_unstable();
            let before = seen.len();
            seen.dedup();

            assert_eq!(seen.len(), before);
            assert_eq!(seen.len(), (train_size / batch_size) * batch_size);
            assert!(seen.iter().all(|& i| 0 <= i && i < train_size as i64));
        }
    }

    #[test]
    fn even_split_consumes_every_index ()
    {
        let batches = epoch_batches(60, 12, Device::Cpu);
        let mut seen : Vec<i64> = batches.iter().flat_map(|b| Vec::<i64>::from(b)).collect();
        seen.sort_unstable();

        assert_eq!(seen, (0 .. 60).collect::<Vec<i64>>());
    }
}
