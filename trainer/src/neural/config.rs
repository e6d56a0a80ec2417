
use utils::{Serialize, Deserialize};

///
/// A configuration for the dual-head residual network.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "input_channels")]
    pub input_channels: i64,

    #[serde(default = "channels")]
    pub channels: i64,

    #[serde(default = "blocks")]
    pub blocks: usize,

    #[serde(default = "wdl_channels")]
    pub wdl_channels: i64,

    #[serde(default = "wdl_size")]
    pub wdl_size: i64,

    #[serde(default = "policy_channels")]
    pub policy_channels: i64,

    #[serde(default = "res")]
    pub res: bool,

    #[serde(default)]
    pub separable: bool,

    #[serde(default)]
    pub squeeze_size: Option<i64>,

    #[serde(default)]
    pub squeeze_bias: bool
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            input_channels: input_channels(),
            channels: channels(),
            blocks: blocks(),
            wdl_channels: wdl_channels(),
            wdl_size: wdl_size(),
            policy_channels: policy_channels(),
            res: res(),
            separable: false,
            squeeze_size: None,
            squeeze_bias: false
        }
    }
}

fn input_channels () -> i64 
{
    5
}

fn channels () -> i64 
{
    32
}

fn blocks () -> usize 
{
    6
}

fn wdl_channels () -> i64 
{
    1
}

fn wdl_size () -> i64 
{
    16
}

fn policy_channels () -> i64 
{
    17
}

fn res () -> bool 
{
    true
}
