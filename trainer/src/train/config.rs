
use utils::{Serialize, Deserialize};

use super::target::ValueTarget;

///
/// The immutable parameters of a training run.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "output_path")]
    pub output_path: String,

    #[serde(default = "epochs")]
    pub epochs: usize,

    #[serde(default = "batch_size")]
    pub batch_size: usize,

    #[serde(default = "value_target")]
    pub value_target: ValueTarget,

    #[serde(default = "policy_weight")]
    pub policy_weight: f64,

    /// The number of plot points per epoch, for both test and train data.
    #[serde(default = "plot_points")]
    pub plot_points: usize,

    #[serde(default = "plot_window_size")]
    pub plot_window_size: usize,

    #[serde(default)]
    pub seed: Option<i64>,

    #[serde(default)]
    pub initial_weights: Option<String>
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            output_path: output_path(),
            epochs: epochs(),
            batch_size: batch_size(),
            value_target: value_target(),
            policy_weight: policy_weight(),
            plot_points: plot_points(),
            plot_window_size: plot_window_size(),
            seed: None,
            initial_weights: None
        }
    }
}

fn output_path () -> String 
{
    "runs/latest".to_owned()
}

fn epochs () -> usize 
{
    15
}

fn batch_size () -> usize 
{
    256
}

fn value_target () -> ValueTarget 
{
    ValueTarget::FinalValue
}

fn policy_weight () -> f64 
{
    2.0
}

fn plot_points () -> usize 
{
    100
}

fn plot_window_size () -> usize 
{
    5
}
