
use tabled::{Table, Tabled};

use super::network::Network;

#[derive(Tabled)]
struct Component 
{
    name: String,
    parameters: i64,
    share: String
}

///
/// Renders the parameter count of the network and the share of each component.
///
pub fn summary (network: & Network) -> String 
{
    let total = network.parameter_count();
    let rows : Vec<Component> = network.parameter_counts().into_iter().map(|(name, parameters)| 
    {
        let share = format!("{:.2}", parameters as f64 / total.max(1) as f64);
        Component { name, parameters, share }
    }).collect();

    format!(
        "Model has {} parameters, which takes {:.3} Mb\n{}", 
        total, (total * 4) as f64 / (1024.0 * 1024.0), Table::new(rows)
    )
}

#[cfg(test)]
mod tests 
{
    use super::*;

    use crate::neural::config::Config;

    use tch::Device;

    #[test]
    fn summary_lists_every_component ()
    {
        let net = Network::new(& Config { channels: 4, blocks: 1, ..Config::default() }, Device::Cpu).unwrap();
        let text = summary(& net);

        assert!(text.contains(& net.parameter_count().to_string()));
        for name in ["tower", "wdl", "policy"]
        {
            assert!(text.contains(name));
        }
    }
}
