
use utils::{Serialize, Deserialize};

///
/// Where the train and test sample directories live.
///
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config 
{
    #[serde(default = "train")]
    pub train: String,

    #[serde(default = "test")]
    pub test: String,

    #[serde(default = "validate")]
    pub validate: bool
}

impl Default for Config 
{
    fn default () -> Config 
    {
        Config 
        {
            train: train(),
            test: test(),
            validate: validate()
        }
    }
}

fn train () -> String 
{
    "data/train".to_owned()
}

fn test () -> String 
{
    "data/test".to_owned()
}

fn validate () -> bool 
{
    true
}
