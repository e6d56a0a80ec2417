
use std::path::Path;

use crate::error::TrainError;

use tch::{Kind, Tensor};

use utils::error::{Context, Result};

///
/// The metrics buffer file.
///
pub const DATA_FILE : &str = "plot_data.npy";

///
/// The x-axis file, one epoch-fraction per buffer row.
///
pub const AXIS_FILE : &str = "plot_axis.npy";

///
/// One plot point: the train and test losses sampled at a plot batch and the 
/// learning rate at that time. Unsampled entries are NaN.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricsRow 
{
    pub train_total: f32,
    pub train_value: f32,
    pub train_policy: f32,
    pub test_total: f32,
    pub test_value: f32,
    pub test_policy: f32,
    pub learning_rate: f32
}

impl MetricsRow 
{
    ///
    /// The number of columns in the persisted buffer.
    ///
    pub const COLUMNS : usize = 7;

    ///
    /// Returns a row with every entry unsampled.
    ///
    pub fn empty () -> MetricsRow 
    {
        MetricsRow::from_slice(& [f32::NAN; MetricsRow::COLUMNS])
    }

    ///
    /// Builds a row from its persisted column order.
    ///
    pub fn from_slice (values: & [f32]) -> MetricsRow 
    {
        MetricsRow 
        {
            train_total: values[0],
            train_value: values[1],
            train_policy: values[2],
            test_total: values[3],
            test_value: values[4],
            test_policy: values[5],
            learning_rate: values[6]
        }
    }

    ///
    /// Returns the row in its persisted column order.
    ///
    pub fn to_array (& self) -> [f32; MetricsRow::COLUMNS]
    {
        [self.train_total, self.train_value, self.train_policy, self.test_total, self.test_value, self.test_policy, self.learning_rate]
    }
}

///
/// Returns `rows` points evenly spaced over [0, epochs), excluding the right endpoint.
///
pub fn axis (rows: usize, epochs: usize) -> Vec<f32>
{
    (0 .. rows).map(|i| (i as f64 * epochs as f64 / rows as f64) as f32).collect()
}

fn read_floats (path: & Path) -> Result<(Vec<f32>, Vec<i64>)>
{
    let tensor = Tensor::read_npy(path).map_err(|e| TrainError::Resource(e.to_string())).context(format!("Failed to read '{}'.", path.display()))?;
    let tensor = tensor.to_kind(Kind::Float);

    let numel = tensor.size().iter().product::<i64>() as usize;
    let mut data = vec![0.0f32; numel];
    tensor.copy_data::<f32>(& mut data, numel);

    Ok((data, tensor.size()))
}

///
/// Stages the array beside its destination and renames it into place, so a 
/// reader never sees a half-written file.
///
fn write_floats (path: & Path, data: & [f32], shape: & [i64]) -> Result<()>
{
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    let staged = tempfile::Builder::new()
        .prefix(".staged")
        .suffix(".npy")
        .tempfile_in(dir)
        .map_err(|e| TrainError::Resource(e.to_string()))
        .context(format!("Failed to stage '{}'.", path.display()))?;

    Tensor::of_slice(data)
        .reshape(shape)
        .write_npy(staged.path())
        .map_err(|e| TrainError::Resource(e.to_string()))
        .context(format!("Failed to write '{}'.", path.display()))?;

    staged
        .persist(path)
        .map_err(|e| TrainError::Resource(e.to_string()))
        .context(format!("Failed to replace '{}'.", path.display()))?;

    Ok(())
}

///
/// Reloads the metrics buffer and its axis from a run directory.
///
pub fn load (dir: impl AsRef<Path>) -> Result<(Vec<MetricsRow>, Vec<f32>)>
{
    let dir = dir.as_ref();

    let (data, shape) = read_floats(& dir.join(DATA_FILE))?;
    if shape.len() != 2 || shape[1] != MetricsRow::COLUMNS as i64 
    {
        return Err(TrainError::Resource(format!("metrics buffer has shape {:?}, expected [rows, {}]", shape, MetricsRow::COLUMNS)).into());
    }

    let rows = data.chunks(MetricsRow::COLUMNS).map(MetricsRow::from_slice).collect::<Vec<MetricsRow>>();
    let (axis, _) = read_floats(& dir.join(AXIS_FILE))?;

    if axis.len() != rows.len() 
    {
        return Err(TrainError::Resource(format!("metrics axis has {} points for {} rows", axis.len(), rows.len())).into());
    }

    Ok((rows, axis))
}

///
/// Overwrites the metrics buffer and its axis in a run directory.
///
pub fn save (dir: impl AsRef<Path>, rows: & [MetricsRow], axis: & [f32]) -> Result<()>
{
    let dir = dir.as_ref();
    let data : Vec<f32> = rows.iter().flat_map(|r| r.to_array()).collect();

    write_floats(& dir.join(DATA_FILE), & data, & [rows.len() as i64, MetricsRow::COLUMNS as i64])?;
    write_floats(& dir.join(AXIS_FILE), axis, & [axis.len() as i64])?;

    Ok(())
}

#[cfg(test)]
mod tests 
{
    use super::*;

    #[test]
    fn axis_excludes_the_right_endpoint ()
    {
        assert_eq!(axis(4, 2), vec![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(axis(3, 1).len(), 3);
        assert!(axis(30, 3).iter().all(|& x| (0.0 .. 3.0).contains(& x)));
        assert!(axis(0, 0).is_empty());
    }

    #[test]
    fn empty_row_is_all_nan ()
    {
        assert!(MetricsRow::empty().to_array().iter().all(|x| x.is_nan()));
    }

    #[test]
    fn column_order_is_train_then_test_then_rate ()
    {
        let row = MetricsRow::from_slice(& [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(row.train_policy, 2.0);
        assert_eq!(row.test_total, 3.0);
        assert_eq!(row.learning_rate, 6.0);
        assert_eq!(row.to_array(), [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn saving_again_replaces_both_files_without_leftovers ()
    {
        let dir = tempfile::tempdir().unwrap();
        let row = |x: f32| MetricsRow::from_slice(& [x; MetricsRow::COLUMNS]);

        save(dir.path(), & [row(1.0)], & axis(1, 1)).unwrap();
        save(dir.path(), & [row(1.0), row(2.0), row(3.0)], & axis(3, 2)).unwrap();

        let (rows, points) = load(dir.path()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[2].test_policy, 3.0);
        assert_eq!(points, axis(3, 2));

        let mut names : Vec<String> = std::fs::read_dir(dir.path()).unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names, vec![AXIS_FILE.to_owned(), DATA_FILE.to_owned()]);
    }

    #[test]
    fn saving_into_a_missing_directory_fails ()
    {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent");

        assert!(save(& missing, & [MetricsRow::empty()], & axis(1, 1)).is_err());
        assert!(! missing.exists());
    }

    #[test]
    fn a_buffer_with_the_wrong_width_is_rejected ()
    {
        let dir = tempfile::tempdir().unwrap();
        write_floats(& dir.path().join(DATA_FILE), & [0.0; 6], & [2, 3]).unwrap();
        write_floats(& dir.path().join(AXIS_FILE), & [0.0; 2], & [2]).unwrap();

        assert!(load(dir.path()).is_err());
    }
}
