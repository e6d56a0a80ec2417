
pub mod smoothing;

pub use smoothing::uniform_window_filter;

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::TrainConfig;
use crate::record::{metrics, MetricsRow};

use utils::error::Result;
use utils::log;
use utils::Serialize;

///
/// The loss categories, each plotted as a train and a test line.
///
pub const TITLES : [&str; 3] = ["total", "value", "policy"];

///
/// Renders the persisted metrics of a run. Implementations reload the buffer 
/// from the run's output directory rather than receiving it, so that a run can 
/// be re-rendered after the fact.
///
pub trait Plotter 
{
    fn plot (& self, config: & TrainConfig, has_schedule: bool) -> Result<()>;
}

///
/// A rendered figure: named lines over a shared x-axis.
///
#[derive(Debug, Serialize)]
pub struct Figure 
{
    pub title: String,
    pub axis: Vec<f32>,
    pub lines: BTreeMap<String, Vec<f32>>
}

///
/// A plotter that writes each figure as a JSON series file beside the metrics.
///
#[derive(Clone, Copy, Debug, Default)]
pub struct SeriesPlotter;

impl SeriesPlotter 
{
    ///
    /// Builds the figures for a metrics buffer: one per loss category with 
    /// smoothed train and test lines, and the raw learning-rate trace if requested.
    ///
    pub fn figures (rows: & [MetricsRow], axis: & [f32], window: usize, has_schedule: bool) -> Vec<(String, Figure)>
    {
        let column = |i: usize| rows.iter().map(|r| r.to_array()[i]).collect::<Vec<f32>>();
        let mut figures = vec![];

        for (i, title) in TITLES.iter().enumerate()
        {
            let mut lines = BTreeMap::new();
            lines.insert("train".to_owned(), uniform_window_filter(& column(i), window));
            lines.insert("test".to_owned(), uniform_window_filter(& column(3 + i), window));

            figures.push((format!("plot_{}.json", title), Figure { title: title.to_string(), axis: axis.to_vec(), lines }));
        }

        if has_schedule 
        {
            let mut lines = BTreeMap::new();
            lines.insert("learning_rate".to_owned(), column(6));

            figures.push(("plot_lr_schedule.json".to_owned(), Figure { title: "Learning rate schedule".to_owned(), axis: axis.to_vec(), lines }));
        }

        figures
    }
}

impl Plotter for SeriesPlotter 
{
    fn plot (& self, config: & TrainConfig, has_schedule: bool) -> Result<()>
    {
        let dir = Path::new(& config.output_path);
        let (rows, axis) = metrics::load(dir)?;

        for (name, figure) in SeriesPlotter::figures(& rows, & axis, config.plot_window_size, has_schedule)
        {
            utils::write_json(dir.join(& name), & figure)?;
            log::debug!("Rendered '{}'.", name);
        }

        Ok(())
    }
}
