//! Build the binned statistics of every plot type for one experiment.

use crate::{
    accumulate::{Binned, ProfileStats},
    error::{ProfileError, Result},
    experiment::Experiment,
    levels::LevelTable,
    mask::{MaskPlan, MaskProvider, Selection},
    source::ObsSource,
};
use log::{debug, info, warn};

/// Counts of what happened to the records of an experiment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationSummary {
    /// Number of files read.
    pub files: usize,
    /// Number of records read.
    pub records: usize,
    /// Number of (record, plot type) pairs added to a bin.
    pub binned: usize,
    /// Number of selected (record, plot type) pairs skipped for non-finite values.
    pub malformed: usize,
    /// Number of selected (record, plot type) pairs skipped for being below the deepest level.
    pub out_of_range: usize,
}

/// The finished statistics of one experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentProfile {
    /// Label of the experiment.
    pub label: String,
    /// Statistics for each plot type, in plot type order.
    pub stats: Vec<ProfileStats>,
    /// What happened to the records.
    pub summary: AggregationSummary,
}

/// The read only inputs shared by the aggregation of every experiment.
#[derive(Clone, Copy)]
pub struct Aggregator<'a> {
    /// Depth bins.
    pub levels: &'a LevelTable,
    /// Masks needed by every plot type.
    pub plan: &'a MaskPlan,
    /// Filters applied to every plot type.
    pub selection: Selection,
    /// Reads the files of the experiments.
    pub source: &'a dyn ObsSource,
    /// Evaluates the masks.
    pub masks: &'a dyn MaskProvider,
}

impl<'a> Aggregator<'a> {
    /// Accumulate the statistics of every plot type over all files of an experiment.
    ///
    /// Files are processed in the experiment's order. The whole aggregation fails on the first
    /// file that can't be read or has no ensemble members.
    pub fn run(&self, exp: &Experiment) -> Result<ExperimentProfile> {
        info!("processing {} ({} files)", exp.label(), exp.files().len());

        let mut stats = vec![ProfileStats::new(self.levels); self.plan.num_plots()];
        let mut summary = AggregationSummary::default();

        for path in exp.files() {
            let batch = self.source.read(path)?;
            let correction =
                batch
                    .spread_correction()
                    .ok_or_else(|| ProfileError::InvalidMemberCount {
                        path: path.clone(),
                        members: batch.members,
                    })?;

            let masks = self.plan.evaluate(self.masks, &batch.records)?;
            let selected = self.selection.mask(&batch.records, masks.valid());

            let before = summary;
            for (plot, plot_stats) in stats.iter_mut().enumerate() {
                let mask = masks.plot_mask(plot, &selected);
                for rec in mask.select(&batch.records) {
                    match plot_stats.add(self.levels, rec, correction) {
                        Binned::Added(_) => summary.binned += 1,
                        Binned::Malformed => summary.malformed += 1,
                        Binned::OutOfRange => summary.out_of_range += 1,
                    }
                }
            }

            summary.files += 1;
            summary.records += batch.len();
            debug!(
                "{}: {} records, {} members, {} binned, {} skipped",
                path.display(),
                batch.len(),
                batch.members,
                summary.binned - before.binned,
                (summary.malformed - before.malformed) + (summary.out_of_range - before.out_of_range)
            );
        }

        if summary.malformed > 0 {
            warn!(
                "{}: skipped {} selected records with non-finite values",
                exp.label(),
                summary.malformed
            );
        }
        if summary.out_of_range > 0 {
            warn!(
                "{}: skipped {} selected records deeper than the last level",
                exp.label(),
                summary.out_of_range
            );
        }
        info!("finished {}: {:?}", exp.label(), summary);

        Ok(ExperimentProfile {
            label: exp.label().to_owned(),
            stats,
            summary,
        })
    }
}
