
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::TrainError;
use crate::record::checkpoint;

use board::Outcome;

use tch::{nn, Device, Tensor};
use tch::nn::{ModuleT, VarStore};

use utils::error::{Context, Result};

use super::block::{BlockConfig, ResBlock};
use super::config::Config;

///
/// The file, next to the checkpoints, that holds the network configuration.
///
pub const CONFIG_FILE : &str = "network.json";

///
/// The layers of the network, registered under the tower, wdl and policy paths.
///
#[derive(Debug)]
struct Model 
{
    stem: nn::Conv2D,
    stem_norm: nn::BatchNorm,
    blocks: Vec<ResBlock>,

    wdl_conv: nn::Conv2D,
    wdl_norm: nn::BatchNorm,
    wdl_hidden: nn::Linear,
    wdl_out: nn::Linear,

    policy_conv: nn::Conv2D
}

impl Model 
{
    fn new (root: & nn::Path, config: & Config, block: BlockConfig) -> Model 
    {
        let tower = root / "tower";
        let wdl = root / "wdl";
        let policy = root / "policy";

        let stem_config = nn::ConvConfig { padding: 1, bias: false, ..Default::default() };
        let blocks_path = & tower / "blocks";
        let blocks = (0 .. config.blocks).map(|i| ResBlock::new(& (& blocks_path / i), block)).collect();

        Model 
        {
            stem: nn::conv2d(& tower / "stem", config.input_channels, config.channels, 3, stem_config),
            stem_norm: nn::batch_norm2d(& tower / "stem_norm", config.channels, Default::default()),
            blocks,

            wdl_conv: nn::conv2d(& wdl / "conv", config.channels, config.wdl_channels, 1, nn::ConvConfig { bias: false, ..Default::default() }),
            wdl_norm: nn::batch_norm2d(& wdl / "norm", config.wdl_channels, Default::default()),
            wdl_hidden: nn::linear(& wdl / "hidden", config.wdl_channels, config.wdl_size, Default::default()),
            wdl_out: nn::linear(& wdl / "out", config.wdl_size, Outcome::COUNT as i64, Default::default()),

            policy_conv: nn::conv2d(& policy / "conv", config.channels, config.policy_channels, 1, Default::default())
        }
    }
}

///
/// A network that functions simultaneously as an outcome and policy head 
/// on top of a shared residual tower.
///
/// The input shape is a [N, C, 9, 9] board image tensor, with C fixed by 
/// the input encoding.
///
/// The outcome output shape is [N, 3], holding win/draw/loss logits in that 
/// order. The policy output shape is [N, P, 9, 9] with P policy planes; the 
/// logits are not masked against legal moves, which is left to the loss.
///
#[derive(Debug)]
pub struct Network 
{
    config: Config,
    vs: VarStore,
    model: Model
}

impl Network 
{
    ///
    /// Returns this network's configuration.
    ///
    pub fn config (& self) -> & Config 
    {
        & self.config
    }

    ///
    /// Returns the device the parameters live on.
    ///
    pub fn device (& self) -> Device 
    {
        self.vs.device()
    }

    ///
    /// For a given input tensor of board images, predicts the outcome and policy logits.
    /// Batch norms use batch statistics when training and running statistics otherwise.
    ///
    pub fn forward_t (& self, input: & Tensor, train: bool) -> (Tensor, Tensor)
    {
        let m = & self.model;

        let mut common = input.apply(& m.stem).apply_t(& m.stem_norm, train).relu();
        for block in & m.blocks 
        {
            common = block.forward_t(& common, train);
        }

        // The pooling window covers the 7x7 corner of the 9x9 map; with a 
        // stride of 7 it yields exactly one value per channel.

        let wdl = common
            .apply(& m.wdl_conv)
            .apply_t(& m.wdl_norm, train)
            .relu()
            .avg_pool2d_default(7)
            .flatten(1, -1)
            .apply(& m.wdl_hidden)
            .relu()
            .apply(& m.wdl_out);

        let policy = common.apply(& m.policy_conv);

        (wdl, policy)
    }

    ///
    /// Creates a network from a checkpoint directory, reading the configuration 
    /// stored beside the checkpoints and the weights of the given epoch.
    ///
    pub fn from_checkpoint (dir: impl AsRef<Path>, epoch: usize, device: Device) -> Result<Network>
    {
        let dir = dir.as_ref();
        let config : Config = utils::read_json(dir.join(CONFIG_FILE))?;

        let mut net = Network::new(& config, device)?;
        net.load(checkpoint::checkpoint_path(dir, epoch))?;

        Ok(net)
    }

    ///
    /// Loads weights into this network from a saved var store.
    ///
    pub fn load (& mut self, path: impl AsRef<Path>) -> Result<()>
    {
        let path = path.as_ref();
        self.vs.load(path).map_err(|e| TrainError::Resource(e.to_string())).context(format!("Failed to load weights file from '{}'.", path.display()))?;
        Ok(())
    }

    ///
    /// Creates a brand-new network with freshly initialized weights.
    ///
    pub fn new (config: & Config, device: Device) -> Result<Network> 
    {
        let block = BlockConfig::from_network(config)?;

        for (name, value) in [("input_channels", config.input_channels), ("wdl_channels", config.wdl_channels), ("wdl_size", config.wdl_size), ("policy_channels", config.policy_channels)]
        {
            if value <= 0 
            {
                return Err(TrainError::Configuration(format!("{} must be positive, got {}", name, value)).into());
            }
        }

        let vs = VarStore::new(device);
        let model = Model::new(& vs.root(), config, block);

        Ok(Network { config: config.clone(), vs, model })
    }

    ///
    /// Returns the number of trainable parameters.
    ///
    pub fn parameter_count (& self) -> i64 
    {
        self.parameter_counts().values().sum()
    }

    ///
    /// Returns the number of trainable parameters of each top-level component.
    ///
    pub fn parameter_counts (& self) -> BTreeMap<String, i64>
    {
        let mut counts = BTreeMap::new();

        for (name, tensor) in self.vs.variables().iter().filter(|(_, t)| t.requires_grad())
        {
            let component = name.split('.').next().unwrap_or("").to_owned();
            * counts.entry(component).or_insert(0) += tensor.size().iter().product::<i64>();
        }

        counts
    }

    ///
    /// Saves this network's weights.
    ///
    pub fn save (& self, path: impl AsRef<Path>) -> Result<()> 
    {
        let path = path.as_ref();
        self.vs.save(path).map_err(|e| TrainError::Resource(e.to_string())).context(format!("Failed to save model to path '{}'.", path.display()))?;
        Ok(())
    }

    ///
    /// Returns the var store holding the parameters, for building optimizers.
    ///
    pub fn var_store (& self) -> & VarStore 
    {
        & self.vs
    }
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use tch::Kind;

    fn small_config () -> Config 
    {
        Config { input_channels: 3, channels: 8, blocks: 2, wdl_channels: 2, wdl_size: 4, policy_channels: 17, ..Config::default() }
    }

    #[test]
    fn forward_yields_wdl_logits_and_policy_planes ()
    {
        let net = Network::new(& small_config(), Device::Cpu).unwrap();
        let input = Tensor::randn(& [5, 3, 9, 9], (Kind::Float, Device::Cpu));

        let (wdl, policy) = net.forward_t(& input, false);
        assert_eq!(wdl.size(), vec![5, 3]);
        assert_eq!(policy.size(), vec![5, 17, 9, 9]);
    }

    #[test]
    fn evaluation_forward_is_deterministic ()
    {
        let config = Config { squeeze_size: Some(4), squeeze_bias: true, separable: true, ..small_config() };
        let net = Network::new(& config, Device::Cpu).unwrap();
        let input = Tensor::randn(& [2, 3, 9, 9], (Kind::Float, Device::Cpu));

        let (wdl_a, policy_a) = net.forward_t(& input, false);
        let (wdl_b, policy_b) = net.forward_t(& input, false);

        assert_eq!((wdl_a - wdl_b).abs().max().double_value(& []), 0.0);
        assert_eq!((policy_a - policy_b).abs().max().double_value(& []), 0.0);
    }

    #[test]
    fn invalid_configurations_are_rejected ()
    {
        let bias_only = Config { squeeze_bias: true, squeeze_size: None, ..small_config() };
        assert!(Network::new(& bias_only, Device::Cpu).is_err());

        let no_input = Config { input_channels: 0, ..small_config() };
        assert!(Network::new(& no_input, Device::Cpu).is_err());
    }

    #[test]
    fn parameters_split_across_the_three_components ()
    {
        let net = Network::new(& small_config(), Device::Cpu).unwrap();
        let counts = net.parameter_counts();

        assert_eq!(counts.keys().cloned().collect::<Vec<String>>(), vec!["policy", "tower", "wdl"]);

        // 1x1 policy conv with bias: 8 * 17 weights + 17 biases.
        assert_eq!(counts["policy"], 8 * 17 + 17);
        assert_eq!(net.parameter_count(), counts.values().sum::<i64>());
    }

    #[test]
    fn saved_weights_reload_into_a_fresh_network ()
    {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("weights.ot");
        let input = Tensor::randn(& [2, 3, 9, 9], (Kind::Float, Device::Cpu));

        let net = Network::new(& small_config(), Device::Cpu).unwrap();
        net.save(& path).unwrap();

        let mut other = Network::new(& small_config(), Device::Cpu).unwrap();
        other.load(& path).unwrap();

        let (wdl_a, _) = net.forward_t(& input, false);
        let (wdl_b, _) = other.forward_t(& input, false);
        assert!((wdl_a - wdl_b).abs().max().double_value(& []) < 1e-6);
    }
}
