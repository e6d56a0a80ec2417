
use utils::{Serialize, Deserialize};

pub use crate::data::config::Config as DataConfig;
pub use crate::neural::config::Config as NetworkConfig;
pub use crate::optim::config::Config as OptimConfig;
pub use crate::train::config::Config as TrainConfig;

///
/// Represents a full configuration.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub optim: OptimConfig,

    #[serde(default)]
    pub train: TrainConfig,

    #[serde(default = "log_path")]
    pub log_path: String
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            data: DataConfig::default(),
            network: NetworkConfig::default(),
            optim: OptimConfig::default(),
            train: TrainConfig::default(),
            log_path: log_path()
        }
    }
}

///
/// Returns the default log path.
///
fn log_path () -> String 
{
    "logs".to_owned()
}
