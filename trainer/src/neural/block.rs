
use crate::error::TrainError;

use tch::{nn, Kind, Tensor};
use tch::nn::ModuleT;

use super::config::Config;

///
/// The convolution pipeline used for each of the two stages of a block.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConvKind 
{
    Standard,
    Separable
}

///
/// The squeeze-and-excitation mode of a block. Bias only exists on top of a gate.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Squeeze 
{
    Absent,
    Gate { size: i64 },
    GateAndBias { size: i64 }
}

impl Squeeze 
{
    ///
    /// Builds the squeeze mode from its flat configuration fields.
    ///
    pub fn new (size: Option<i64>, bias: bool) -> Result<Squeeze, TrainError>
    {
        match (size, bias) 
        {
            (None, false)      => Ok(Squeeze::Absent),
            (Some(size), false) => Ok(Squeeze::Gate { size }),
            (Some(size), true)  => Ok(Squeeze::GateAndBias { size }),
            (None, true)       => Err(TrainError::Configuration("squeeze_bias requires squeeze_size to be set".to_owned()))
        }
    }
}

///
/// The shape shared by every block in the tower.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockConfig 
{
    pub channels: i64,
    pub res: bool,
    pub conv: ConvKind,
    pub squeeze: Squeeze
}

impl BlockConfig 
{
    ///
    /// Extracts and validates the block shape from a network configuration.
    ///
    pub fn from_network (config: & Config) -> Result<BlockConfig, TrainError>
    {
        if config.channels <= 0 
        {
            return Err(TrainError::Configuration(format!("channels must be positive, got {}", config.channels)));
        }

        if let Some(size) = config.squeeze_size 
        {
            if size <= 0 
            {
                return Err(TrainError::Configuration(format!("squeeze_size must be positive, got {}", size)));
            }
        }

        let conv = match config.separable 
        {
            true  => ConvKind::Separable,
            false => ConvKind::Standard
        };

        Ok(BlockConfig 
        { 
            channels: config.channels, 
            res: config.res, 
            conv, 
            squeeze: Squeeze::new(config.squeeze_size, config.squeeze_bias)? 
        })
    }
}

///
/// A bias-free 3x3 convolution, either in one piece or as a depthwise 
/// spatial pass followed by a pointwise channel mix.
///
#[derive(Debug)]
enum Conv 
{
    Standard(nn::Conv2D),
    Separable { depthwise: nn::Conv2D, pointwise: nn::Conv2D }
}

impl Conv 
{
    fn new (p: & nn::Path, kind: ConvKind, channels: i64) -> Conv 
    {
        let spatial = nn::ConvConfig { padding: 1, bias: false, ..Default::default() };

        match kind 
        {
            ConvKind::Standard  => Conv::Standard(nn::conv2d(p / "conv", channels, channels, 3, spatial)),
            ConvKind::Separable => 
            {
                let depthwise_config = nn::ConvConfig { groups: channels, ..spatial };
                let pointwise_config = nn::ConvConfig { bias: false, ..Default::default() };

                Conv::Separable 
                {
                    depthwise: nn::conv2d(p / "depthwise", channels, channels, 3, depthwise_config),
                    pointwise: nn::conv2d(p / "pointwise", channels, channels, 1, pointwise_config)
                }
            }
        }
    }

    fn forward (& self, xs: & Tensor) -> Tensor 
    {
        match self 
        {
            Conv::Standard(conv)                     => xs.apply(conv),
            Conv::Separable { depthwise, pointwise } => xs.apply(depthwise).apply(pointwise)
        }
    }
}

///
/// The two-layer bottleneck that turns a pooled feature map into per-channel 
/// gate logits (and optionally per-channel biases).
///
#[derive(Debug)]
struct Gate 
{
    squeeze: nn::Linear,
    excite: nn::Linear
}

impl Gate 
{
    fn new (p: & nn::Path, channels: i64, size: i64, outputs: i64) -> Gate 
    {
        Gate 
        {
            squeeze: nn::linear(p / "squeeze", channels, size, Default::default()),
            excite: nn::linear(p / "excite", size, outputs, Default::default())
        }
    }

    fn weights (& self, ys: & Tensor) -> Tensor 
    {
        ys.mean_dim(& [2, 3], false, Kind::Float).apply(& self.squeeze).relu().apply(& self.excite)
    }
}

#[derive(Debug)]
enum Excitation 
{
    Absent,
    Gate(Gate),
    GateAndBias(Gate)
}

impl Excitation 
{
    fn new (p: & nn::Path, squeeze: Squeeze, channels: i64) -> Excitation 
    {
        match squeeze 
        {
            Squeeze::Absent                => Excitation::Absent,
            Squeeze::Gate { size }         => Excitation::Gate(Gate::new(p, channels, size, channels)),
            Squeeze::GateAndBias { size }  => Excitation::GateAndBias(Gate::new(p, channels, size, 2 * channels))
        }
    }

    fn apply (& self, ys: Tensor, channels: i64) -> Tensor 
    {
        match self 
        {
            Excitation::Absent          => ys,
            Excitation::Gate(gate)      => 
            {
                let factor = gate.weights(& ys).sigmoid().reshape(& [-1, channels, 1, 1]);
                ys * factor
            },
            Excitation::GateAndBias(gate) => 
            {
                let weights = gate.weights(& ys);
                let factor = weights.narrow(1, 0, channels).sigmoid().reshape(& [-1, channels, 1, 1]);
                let bias = weights.narrow(1, channels, channels).reshape(& [-1, channels, 1, 1]);
                ys * factor + bias
            }
        }
    }
}

///
/// A tower block: conv, norm, relu, conv, norm, then the optional gate, the 
/// optional skip connection and a final relu. Spatial shape and channel count 
/// are preserved.
///
#[derive(Debug)]
pub struct ResBlock 
{
    config: BlockConfig,
    first: Conv,
    first_norm: nn::BatchNorm,
    second: Conv,
    second_norm: nn::BatchNorm,
    excitation: Excitation
}

impl ResBlock 
{
    ///
    /// Creates a block with freshly initialized weights under the given path.
    ///
    pub fn new (p: & nn::Path, config: BlockConfig) -> ResBlock 
    {
        let c = config.channels;

        ResBlock 
        {
            config,
            first: Conv::new(& (p / "first"), config.conv, c),
            first_norm: nn::batch_norm2d(p / "first_norm", c, Default::default()),
            second: Conv::new(& (p / "second"), config.conv, c),
            second_norm: nn::batch_norm2d(p / "second_norm", c, Default::default()),
            excitation: Excitation::new(& (p / "gate"), config.squeeze, c)
        }
    }
}

impl ModuleT for ResBlock 
{
    fn forward_t (& self, xs: & Tensor, train: bool) -> Tensor 
    {
        let ys = self.first.forward(xs).apply_t(& self.first_norm, train).relu();
        let ys = self.second.forward(& ys).apply_t(& self.second_norm, train);
        let ys = self.excitation.apply(ys, self.config.channels);

        match self.config.res 
        {
            true  => (ys + xs).relu(),
            false => ys.relu()
        }
    }
}
