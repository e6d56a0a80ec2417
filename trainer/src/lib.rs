
pub mod config;
pub mod data;
pub mod error;
pub mod loss;
pub mod neural;
pub mod optim;
pub mod plot;
pub mod record;
pub mod train;

pub use error::TrainError;
