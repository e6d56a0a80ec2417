
use std::path::Path;

use crate::error::TrainError;

use board::{Transform, BOARD_CELLS, BOARD_SIZE};

use tch::{Device, Kind, Tensor};

use utils::error::{Context, Result};
use utils::log;

///
/// Represents a batch of board positions with their supervision signals.
///
/// * `input` is [N, C, 9, 9], the encoded positions.
/// * `value` and `final_value` are [N], the recorded and the terminal outcome.
/// * `policy` is [N, 81], a distribution over the legal cells.
/// * `mask` is [N, 81], 1 where a move is legal and 0 otherwise.
///
/// The policy and mask are always indexed and transformed together.
///
#[derive(Debug)]
pub struct Samples 
{
    pub input: Tensor,
    pub value: Tensor,
    pub final_value: Tensor,
    pub policy: Tensor,
    pub mask: Tensor
}

impl Samples 
{
    ///
    /// Returns the device the samples live on.
    ///
    pub fn device (& self) -> Device 
    {
        self.input.device()
    }

    ///
    /// Returns whether there are no samples.
    ///
    pub fn is_empty (& self) -> bool 
    {
        self.len() == 0
    }

    ///
    /// Returns the number of samples.
    ///
    pub fn len (& self) -> usize 
    {
        self.input.size()[0] as usize
    }

    ///
    /// Loads samples from a directory of `.npy` arrays named after the fields.
    ///
    pub fn load (dir: impl AsRef<Path>, device: Device) -> Result<Samples>
    {
        let dir = dir.as_ref();

        let read = |name: & str| -> Result<Tensor> 
        {
            let path = dir.join(format!("{}.npy", name));
            let tensor = Tensor::read_npy(& path).map_err(|e| TrainError::Resource(e.to_string())).context(format!("Failed to read '{}'.", path.display()))?;
            Ok(tensor.to_device(device))
        };

        let samples = Samples::new(read("input")?, read("value")?, read("final_value")?, read("policy")?, read("mask")?)
            .context(format!("Invalid samples in '{}'.", dir.display()))?;

        log::info!("Loaded {} samples from '{}'.", samples.len(), dir.display());
        Ok(samples)
    }

    ///
    /// Creates a sample set, checking that the shapes agree and normalizing 
    /// scalar labels to [N] and board-shaped policies and masks to [N, 81].
    ///
    pub fn new (input: Tensor, value: Tensor, final_value: Tensor, policy: Tensor, mask: Tensor) -> Result<Samples, TrainError>
    {
        let shape = input.size();
        if shape.len() != 4 || shape[2] != BOARD_SIZE as i64 || shape[3] != BOARD_SIZE as i64 
        {
            return Err(TrainError::DataIntegrity(format!("input must be [N, C, 9, 9], got {:?}", shape)));
        }

        let n = shape[0];
        let cells = BOARD_CELLS as i64;

        let scalar = |name: & str, t: Tensor| -> Result<Tensor, TrainError> 
        {
            match t.numel() as i64 == n 
            {
                true  => Ok(t.reshape(& [n]).to_kind(Kind::Float)),
                false => Err(TrainError::DataIntegrity(format!("{} must hold {} values, got shape {:?}", name, n, t.size())))
            }
        };

        let plane = |name: & str, t: Tensor| -> Result<Tensor, TrainError> 
        {
            let size = t.size();
            match size.first() == Some(& n) && size[1 ..].iter().product::<i64>() == cells 
            {
                true  => Ok(t.reshape(& [n, cells]).to_kind(Kind::Float)),
                false => Err(TrainError::DataIntegrity(format!("{} must be [N, 81] or [N, 9, 9], got {:?}", name, size)))
            }
        };

        Ok(Samples 
        {
            input: input.to_kind(Kind::Float),
            value: scalar("value", value)?,
            final_value: scalar("final_value", final_value)?,
            policy: plane("policy", policy)?,
            mask: plane("mask", mask)?
        })
    }

    ///
    /// Picks the samples at the given indices, keeping every field aligned.
    ///
    pub fn pick_batch (& self, indices: & Tensor) -> Samples 
    {
        let indices = indices.to_device(self.device());

        Samples 
        {
            input: self.input.index_select(0, & indices),
            value: self.value.index_select(0, & indices),
            final_value: self.final_value.index_select(0, & indices),
            policy: self.policy.index_select(0, & indices),
            mask: self.mask.index_select(0, & indices)
        }
    }

    ///
    /// Applies a uniformly drawn board symmetry to the whole batch.
    ///
    pub fn random_symmetry (& self) -> Samples 
    {
        let index = Tensor::randint(Transform::COUNT as i64, & [1], (Kind::Int64, Device::Cpu)).int64_value(& [0]);
        self.with_symmetry(Transform::from_index(index as usize))
    }

    ///
    /// Checks the labels: values lie in [-1, 1], every row has a legal move, 
    /// and the policy is non-negative with no mass on illegal cells.
    ///
    pub fn validate (& self) -> Result<(), TrainError>
    {
        let any = |t: Tensor| t.any().int64_value(& []) != 0;

        if any(self.value.abs().gt(1.0)) || any(self.final_value.abs().gt(1.0))
        {
            return Err(TrainError::DataIntegrity("value labels must lie in [-1, 1]".to_owned()));
        }

        if any(self.mask.sum_dim_intlist(& [1], false, Kind::Float).eq(0.0))
        {
            return Err(TrainError::DataIntegrity("a position has no legal moves".to_owned()));
        }

        if any(self.policy.lt(0.0))
        {
            return Err(TrainError::DataIntegrity("policy targets must be non-negative".to_owned()));
        }

        if any(self.policy.masked_fill(& self.mask.ne(0.0), 0.0).gt(0.0))
        {
            return Err(TrainError::DataIntegrity("policy assigns probability to an illegal move".to_owned()));
        }

        Ok(())
    }

    ///
    /// Applies a board symmetry identically to the input planes, the policy and the mask.
    ///
    pub fn with_symmetry (& self, transform: Transform) -> Samples 
    {
        let perm : Vec<i64> = transform.permutation().iter().map(|& i| i as i64).collect();
        let perm = Tensor::of_slice(& perm).to_device(self.device());

        let shape = self.input.size();
        let input = self.input
            .reshape(& [shape[0], shape[1], BOARD_CELLS as i64])
            .index_select(2, & perm)
            .reshape(& shape);

        Samples 
        {
            input,
            value: self.value.shallow_clone(),
            final_value: self.final_value.shallow_clone(),
            policy: self.policy.index_select(1, & perm),
            mask: self.mask.index_select(1, & perm)
        }
    }
}
