
use crate::error::TrainError;

use board::Outcome;

use tch::{Kind, Reduction, Tensor};

///
/// Collapses policy logits of shape [N, P, 9, 9] into one logit per cell, [N, 81].
///
/// The probability of a cell is the total mass of that cell across the P 
/// planes, which in logit space is a log-sum-exp over the plane axis. With a 
/// single plane this is a plain flatten.
///
pub fn flatten_policy (policy: & Tensor) -> Tensor 
{
    policy.logsumexp(& [1], false).flatten(1, -1)
}

///
/// Returns the log-probabilities of the logits restricted to the legal cells; 
/// illegal cells get a log-probability of -inf and thus exactly zero mass.
///
pub fn masked_log_softmax (logits: & Tensor, mask: & Tensor) -> Tensor 
{
    (logits + mask.log()).log_softmax(1, Kind::Float)
}

///
/// Cross-entropy of [N, 81] logits against a target distribution that is only 
/// supported on the cells the mask marks legal, averaged over the batch.
///
/// Cells where the target is zero contribute nothing, even where the masked 
/// log-probability is -inf. A non-finite per-sample loss means the target puts 
/// mass on an illegal cell, which is reported as a data integrity violation.
///
pub fn masked_cross_entropy (logits: & Tensor, target: & Tensor, mask: & Tensor) -> Result<Tensor, TrainError>
{
    let shape = logits.size();
    if shape.len() != 2 || target.size() != shape || mask.size() != shape 
    {
        return Err(TrainError::DataIntegrity(format!(
            "policy shapes disagree: logits {:?}, target {:?}, mask {:?}", shape, target.size(), mask.size()
        )));
    }

    let log = masked_log_softmax(logits, mask);
    let terms = (target * & log).masked_fill(& target.eq(0.0), 0.0);
    let loss = - terms.sum_dim_intlist(& [1], false, Kind::Float);

    if loss.isfinite().all().int64_value(& []) == 0 
    {
        return Err(TrainError::DataIntegrity(
            "non-finite policy loss, the target assigns probability to a move the mask marks illegal".to_owned()
        ));
    }

    Ok(loss.mean(Kind::Float))
}

///
/// Reduces win/draw/loss logits [N, 3] to the expected scalar outcome [N] in [-1, 1].
///
pub fn expected_value (wdl: & Tensor) -> Tensor 
{
    let values : Vec<f32> = Outcome::as_array().iter().map(|o| o.value()).collect();
    let values = Tensor::of_slice(& values).to_device(wdl.device());

    wdl.softmax(1, Kind::Float).mv(& values)
}

///
/// Mean squared error between the expected outcome of the logits and a scalar target [N].
///
pub fn value_loss (wdl: & Tensor, target: & Tensor) -> Tensor 
{
    expected_value(wdl).mse_loss(target, Reduction::Mean)
}
