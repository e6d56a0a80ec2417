
use std::str::FromStr;

use crate::data::Samples;
use crate::error::TrainError;

use tch::Tensor;

use utils::{Serialize, Deserialize};

///
/// Which label of a sample the outcome head is regressed against.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ValueTarget 
{
    Value,
    FinalValue,
    Mean
}

impl FromStr for ValueTarget 
{
    type Err = TrainError;

    fn from_str (s: & str) -> Result<ValueTarget, TrainError>
    {
        match s 
        {
            "value"       => Ok(ValueTarget::Value),
            "final_value" => Ok(ValueTarget::FinalValue),
            "mean"        => Ok(ValueTarget::Mean),
            _             => Err(TrainError::Configuration(format!("unsupported value target '{}'", s)))
        }
    }
}

impl TryFrom<String> for ValueTarget 
{
    type Error = TrainError;

    fn try_from (s: String) -> Result<ValueTarget, TrainError>
    {
        s.parse()
    }
}

impl ValueTarget 
{
    ///
    /// Returns the [N] regression target for the given samples.
    ///
    pub fn select (& self, samples: & Samples) -> Tensor 
    {
        match self 
        {
            ValueTarget::Value      => samples.value.shallow_clone(),
            ValueTarget::FinalValue => samples.final_value.shallow_clone(),
            ValueTarget::Mean       => (& samples.value + & samples.final_value) / 2.0
        }
    }
}
