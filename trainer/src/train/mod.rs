
pub mod config;
pub mod epoch;
pub mod run;
pub mod settings;
pub mod target;

pub use epoch::{epoch_batches, evaluate, plot_batches, train_epoch};
pub use run::train_model;
pub use settings::Settings;
pub use target::ValueTarget;
