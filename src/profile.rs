//! Create the profiles that get plotted.
//!
//! For each plot type and experiment the binned statistics are smoothed into three curves:
//!   - the bias, the smoothed mean of the increment mean,
//!   - the RMSD, the square root of the smoothed mean squared increment mean,
//!   - the spread, the square root of the smoothed mean squared increment spread.
//!
//! A `Comparison` holds these curves for every experiment being compared, and hands them to a
//! `Renderer` to draw.
use crate::{
    accumulate::ProfileStats,
    aggregate::{AggregationSummary, Aggregator, ExperimentProfile},
    config::ProfileConfig,
    dispatch::aggregate_experiments,
    error::{ProfileError, Result},
    experiment::{align_experiments, DateRange, Experiment},
    keys::{ProfileKind, Statistic},
    levels::LevelTable,
    mask::{MaskPlan, MaskProvider},
    plot_type::PlotType,
    smoothing::smooth,
    source::ObsSource,
};
use log::info;
use metfor::Meters;
use optional::Optioned;
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// The smoothed curves of one experiment for one plot type.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileCurves {
    /// Depth of each level.
    pub depths: Vec<Meters>,
    /// Smoothed mean increment.
    pub bias: Vec<Optioned<f64>>,
    /// Root of the smoothed mean squared increment.
    pub rmsd: Vec<Optioned<f64>>,
    /// Root of the smoothed mean squared ensemble spread.
    pub spread: Vec<Optioned<f64>>,
    /// Largest number of records in any level.
    pub max_count: u32,
}

impl ProfileCurves {
    /// The curve drawn for a kind of profile.
    #[inline]
    pub fn curve(&self, kind: ProfileKind) -> &[Optioned<f64>] {
        match kind {
            ProfileKind::Bias => &self.bias,
            ProfileKind::Rmsd => &self.rmsd,
        }
    }
}

/// Smooth the statistics of one plot type into curves.
///
/// # Examples
///
/// ```rust
/// use omf_profile::{accumulate::ProfileStats, profile::profile_curves, LevelTable, ObsRecord};
/// use metfor::Meters;
///
/// let lvls = LevelTable::from_meters(vec![10.0, 20.0, 30.0]).unwrap();
/// let mut stats = ProfileStats::new(&lvls);
/// stats.add(&lvls, &ObsRecord::new(Meters(15.0)).with_increment(-2.0, 1.0), 1.0);
///
/// let curves = profile_curves(&stats, &lvls, 0);
///
/// assert_eq!(curves.bias[1].into_option(), Some(-2.0));
/// assert_eq!(curves.rmsd[1].into_option(), Some(2.0));
/// assert_eq!(curves.spread[1].into_option(), Some(1.0));
/// assert!(curves.bias[0].is_none());
/// assert_eq!(curves.max_count, 1);
/// ```
pub fn profile_curves(
    stats: &ProfileStats,
    levels: &LevelTable,
    half_width: usize,
) -> ProfileCurves {
    let counts = stats.counts();
    let smoothed = |stat| smooth(&counts, &stats.values(stat), half_width);
    let root = |vals: Vec<Optioned<f64>>| -> Vec<Optioned<f64>> {
        vals.into_iter()
            .map(|v| v.map_t(|v| v.max(0.0).sqrt()))
            .collect()
    };

    ProfileCurves {
        depths: levels.depths().to_vec(),
        bias: smoothed(Statistic::IncMean),
        rmsd: root(smoothed(Statistic::IncMean2)),
        spread: root(smoothed(Statistic::IncSprd2)),
        max_count: stats.max_count(),
    }
}

/// Draws the profiles of a plot type.
pub trait Renderer {
    /// Draw one kind of profile for a plot type to `path`, one line per experiment in `curves`.
    fn render(
        &mut self,
        plot_type: &PlotType,
        kind: ProfileKind,
        path: &Path,
        curves: &[(&str, &ProfileCurves)],
        dates: &DateRange,
    ) -> Result<()>;
}

/// The profiles of every plot type for a set of experiments over the same dates.
#[derive(Debug, Clone)]
pub struct Comparison {
    date_range: DateRange,
    plot_types: Vec<PlotType>,
    labels: Vec<String>,
    summaries: Vec<AggregationSummary>,
    // Indexed [plot type][experiment]
    curves: Vec<Vec<ProfileCurves>>,
}

impl Comparison {
    /// Smooth the aggregated statistics of each experiment.
    ///
    /// # Panics
    ///
    /// If a profile has statistics for fewer plot types than `plot_types`, or its statistics
    /// have a different number of bins than `levels`. `compare_experiments` always builds
    /// matching inputs.
    pub fn new(
        date_range: DateRange,
        plot_types: Vec<PlotType>,
        profiles: &[ExperimentProfile],
        levels: &LevelTable,
        half_width: usize,
    ) -> Self {
        let curves = (0..plot_types.len())
            .map(|plot| {
                profiles
                    .iter()
                    .map(|p| profile_curves(&p.stats[plot], levels, half_width))
                    .collect()
            })
            .collect();

        Comparison {
            date_range,
            plot_types,
            labels: profiles.iter().map(|p| p.label.clone()).collect(),
            summaries: profiles.iter().map(|p| p.summary).collect(),
            curves,
        }
    }

    /// The dates all experiments were aggregated over.
    #[inline]
    pub fn date_range(&self) -> &DateRange {
        &self.date_range
    }

    /// The plot types, in configuration order.
    #[inline]
    pub fn plot_types(&self) -> &[PlotType] {
        &self.plot_types
    }

    /// The experiment labels, in experiment order.
    #[inline]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// What happened to the records of each experiment, in experiment order.
    #[inline]
    pub fn summaries(&self) -> &[AggregationSummary] {
        &self.summaries
    }

    /// The labelled curves of every experiment for the plot type at index `plot`.
    ///
    /// # Panics
    ///
    /// If `plot` is not less than `plot_types().len()`.
    pub fn curves(&self, plot: usize) -> Vec<(&str, &ProfileCurves)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.curves[plot].iter())
            .collect()
    }

    /// Render every kind of profile for every plot type into `out_dir`.
    ///
    /// Returns the paths handed to the renderer, in the order they were rendered.
    pub fn render<R>(&self, renderer: &mut R, out_dir: &Path) -> Result<Vec<PathBuf>>
    where
        R: Renderer + ?Sized,
    {
        let mut written = Vec::with_capacity(self.plot_types.len() * 2);

        for (plot, plot_type) in self.plot_types.iter().enumerate() {
            let curves = self.curves(plot);
            for kind in ProfileKind::iter() {
                let path = plot_type.output_path(out_dir, kind);
                renderer.render(plot_type, kind, &path, &curves, &self.date_range)?;
                written.push(path);
            }
        }

        info!("rendered {} profiles to {}", written.len(), out_dir.display());
        Ok(written)
    }
}

/// Build the profiles of every plot type for each experiment.
///
/// The experiments are first restricted to the dates they all share within the configured date
/// range, then aggregated in parallel, and finally smoothed.
pub fn compare_experiments(
    experiments: Vec<Experiment>,
    source: &dyn ObsSource,
    masks: &dyn MaskProvider,
    plot_types: Vec<PlotType>,
    levels: &LevelTable,
    cfg: &ProfileConfig,
) -> Result<Comparison> {
    cfg.validate()?;
    if plot_types.is_empty() {
        return Err(ProfileError::InvalidConfig("no plot types".to_owned()));
    }

    let (experiments, date_range) = align_experiments(experiments, cfg.start(), cfg.end())?;

    let plan = MaskPlan::new(&plot_types)?;
    let agg = Aggregator {
        levels,
        plan: &plan,
        selection: cfg.selection(),
        source,
        masks,
    };
    let profiles = aggregate_experiments(&agg, &experiments, cfg.workers())?;

    Ok(Comparison::new(
        date_range,
        plot_types,
        &profiles,
        levels,
        cfg.smooth_half_width(),
    ))
}
