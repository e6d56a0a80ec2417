
use crate::error::TrainError;

use utils::{Serialize, Deserialize};

///
/// A learning-rate schedule, stepped once per optimizer step.
///
pub trait Schedule 
{
    ///
    /// Returns the rate for the next optimizer step.
    ///
    fn current_rate (& self) -> f64;

    ///
    /// Advances the schedule by one optimizer step.
    ///
    fn step (& mut self);
}

///
/// The configurable schedules.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleConfig 
{
    ///
    /// Triangular cycling between two rates, rising for half a cycle and falling for the other half.
    ///
    Cyclic 
    { 
        base_lr: f64, 
        max_lr: f64, 

        #[serde(default = "cycles_per_epoch")]
        cycles_per_epoch: f64 
    },

    ///
    /// Multiplies the rate by gamma every step_size steps.
    ///
    StepDecay 
    { 
        gamma: f64, 
        step_size: usize 
    }
}

fn cycles_per_epoch () -> f64 
{
    2.0
}

impl ScheduleConfig 
{
    ///
    /// Builds the schedule for a run whose epochs have the given number of batches.
    ///
    pub fn build (& self, learning_rate: f64, batch_count: usize) -> Result<Box<dyn Schedule>, TrainError>
    {
        match * self 
        {
            ScheduleConfig::Cyclic { base_lr, max_lr, cycles_per_epoch } => 
            {
                if ! (0.0 <= base_lr && base_lr <= max_lr) || cycles_per_epoch <= 0.0 
                {
                    return Err(TrainError::Configuration(format!(
                        "cyclic schedule needs 0 <= base_lr <= max_lr and positive cycles, got {} .. {} x {}", base_lr, max_lr, cycles_per_epoch
                    )));
                }

                // Half a cycle rises, half falls.
                let step_size_up = ((batch_count as f64 / (2.0 * cycles_per_epoch)) as usize).max(1);
                Ok(Box::new(Cyclic::new(base_lr, max_lr, step_size_up)))
            },
            ScheduleConfig::StepDecay { gamma, step_size } => 
            {
                if step_size == 0 || gamma <= 0.0 
                {
                    return Err(TrainError::Configuration(format!("step decay needs positive gamma and step_size, got {} and {}", gamma, step_size)));
                }

                Ok(Box::new(StepDecay::new(learning_rate, gamma, step_size)))
            }
        }
    }
}

///
/// A triangular cyclic schedule.
///
#[derive(Clone, Debug)]
pub struct Cyclic 
{
    base_lr: f64,
    max_lr: f64,
    step_size_up: usize,
    steps: usize
}

impl Cyclic 
{
    pub fn new (base_lr: f64, max_lr: f64, step_size_up: usize) -> Cyclic 
    {
        Cyclic { base_lr, max_lr, step_size_up: step_size_up.max(1), steps: 0 }
    }
}

impl Schedule for Cyclic 
{
    fn current_rate (& self) -> f64 
    {
        let period = 2 * self.step_size_up;
        let phase = (self.steps % period) as f64 / self.step_size_up as f64;
        let height = 1.0 - (phase - 1.0).abs();

        self.base_lr + (self.max_lr - self.base_lr) * height
    }

    fn step (& mut self)
    {
        self.steps += 1;
    }
}

///
/// A step decay schedule: lr = lr_initial * gamma ^ floor(steps / step_size).
///
#[derive(Clone, Debug)]
pub struct StepDecay 
{
    initial: f64,
    gamma: f64,
    step_size: usize,
    steps: usize
}

impl StepDecay 
{
    pub fn new (initial: f64, gamma: f64, step_size: usize) -> StepDecay 
    {
        StepDecay { initial, gamma, step_size: step_size.max(1), steps: 0 }
    }
}

impl Schedule for StepDecay 
{
    fn current_rate (& self) -> f64 
    {
        self.initial * self.gamma.powi((self.steps / self.step_size) as i32)
    }

    fn step (& mut self)
    {
        self.steps += 1;
    }
}
