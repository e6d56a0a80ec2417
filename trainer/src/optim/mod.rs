
pub mod config;
pub mod schedule;

pub use config::OptimizerKind;
pub use schedule::{Cyclic, Schedule, ScheduleConfig, StepDecay};

use crate::neural::Network;

use tch::Tensor;
use tch::nn::{self, OptimizerConfig};

use utils::error::Result;

use self::config::Config;

///
/// The mutable half of a run: the optimizer and its optional learning-rate schedule.
///
pub struct Optimization 
{
    optimizer: nn::Optimizer,
    schedule: Option<Box<dyn Schedule>>
}

impl Optimization 
{
    ///
    /// Returns the rate the schedule currently prescribes, if there is a schedule.
    ///
    pub fn learning_rate (& self) -> Option<f64>
    {
        self.schedule.as_ref().map(|s| s.current_rate())
    }

    ///
    /// Builds the configured optimizer over the network's parameters. The 
    /// batch count of an epoch sizes schedules that are defined per epoch.
    ///
    pub fn new (config: & Config, network: & Network, batch_count: usize) -> Result<Optimization>
    {
        let schedule = match & config.schedule 
        {
            Some(schedule) => Some(schedule.build(config.learning_rate, batch_count)?),
            None           => None
        };

        let rate = schedule.as_ref().map_or(config.learning_rate, |s| s.current_rate());
        let vs = network.var_store();

        let optimizer = match config.kind 
        {
            OptimizerKind::Sgd   => nn::Sgd { momentum: config.momentum, wd: config.weight_decay, ..Default::default() }.build(vs, rate)?,
            OptimizerKind::Adam  => nn::Adam { wd: config.weight_decay, ..Default::default() }.build(vs, rate)?,
            OptimizerKind::AdamW => nn::AdamW { wd: config.weight_decay, ..Default::default() }.build(vs, rate)?
        };

        Ok(Optimization { optimizer, schedule })
    }

    ///
    /// Backpropagates the loss, steps the optimizer, then steps the schedule 
    /// and hands its new rate to the optimizer.
    ///
    pub fn step (& mut self, loss: & Tensor)
    {
        self.optimizer.zero_grad();
        loss.backward();
        self.optimizer.step();

        if let Some(schedule) = self.schedule.as_mut() 
        {
            schedule.step();
            self.optimizer.set_lr(schedule.current_rate());
        }
    }
}
