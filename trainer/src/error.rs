
use thiserror::Error;

///
/// The failure classes of a training run. None of them are recoverable; 
/// a run that raises one aborts, keeping whatever was persisted at the 
/// last epoch boundary.
///
#[derive(Debug, Error)]
pub enum TrainError 
{
    ///
    /// The run was configured with a combination that cannot be built.
    ///
    #[error("configuration error: {0}")]
    Configuration(String),

    ///
    /// The samples break an invariant the losses rely on.
    ///
    #[error("data integrity violation: {0}")]
    DataIntegrity(String),

    ///
    /// Run state could not be persisted or restored.
    ///
    #[error("resource error: {0}")]
    Resource(String)
}
