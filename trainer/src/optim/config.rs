
use utils::{Serialize, Deserialize};

use super::schedule::ScheduleConfig;

///
/// The optimization algorithms available to a run.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizerKind 
{
    Sgd,
    Adam,
    #[serde(rename = "adamw")]
    AdamW
}

///
/// A configuration for the optimizer and its optional schedule.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "kind")]
    pub kind: OptimizerKind,

    #[serde(default = "learning_rate")]
    pub learning_rate: f64,

    #[serde(default)]
    pub momentum: f64,

    #[serde(default = "weight_decay")]
    pub weight_decay: f64,

    #[serde(default)]
    pub schedule: Option<ScheduleConfig>
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            kind: kind(),
            learning_rate: learning_rate(),
            momentum: 0.0,
            weight_decay: weight_decay(),
            schedule: None
        }
    }
}

fn kind () -> OptimizerKind 
{
    OptimizerKind::AdamW
}

fn learning_rate () -> f64 
{
    0.001
}

fn weight_decay () -> f64 
{
    0.00001
}
