//! Experiments and the files they are built from.
//!
//! Each OmF file name starts with the date it is valid for, as `YYYYMMDD`. Before experiments are
//! compared their file lists are cut down to the dates that every experiment has, so that every
//! profile is built from the same days.
use crate::error::{ProfileError, Result};
use chrono::NaiveDate;
use log::{debug, info};
use std::{
    collections::BTreeSet,
    fmt::{self, Display},
    fs,
    path::{Path, PathBuf},
};

/// A named, sorted list of OmF files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experiment {
    label: String,
    files: Vec<PathBuf>,
}

impl Experiment {
    /// Create a new experiment. The files are sorted.
    pub fn new<S>(label: S, mut files: Vec<PathBuf>) -> Self
    where
        S: Into<String>,
    {
        files.sort();
        Experiment {
            label: label.into(),
            files,
        }
    }

    /// Find the OmF files of an experiment directory, `<dir>/output/omf/<year>/*.nc`.
    ///
    /// The label is the last component of `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let omf_dir = dir.join("output").join("omf");

        let mut files = vec![];
        for year_dir in fs::read_dir(&omf_dir)? {
            let year_dir = year_dir?.path();
            let is_year = year_dir
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.len() == 4 && n.chars().all(|c| c.is_ascii_digit()))
                .unwrap_or(false);
            if !is_year || !year_dir.is_dir() {
                continue;
            }

            for entry in fs::read_dir(&year_dir)? {
                let path = entry?.path();
                if path.extension().map(|ext| ext == "nc").unwrap_or(false) {
                    files.push(path);
                }
            }
        }

        let label = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());

        debug!("found {} files for {} in {}", files.len(), label, omf_dir.display());
        Ok(Self::new(label, files))
    }

    /// Builder method replacing the label.
    #[inline]
    pub fn with_label<S>(self, label: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            label: label.into(),
            ..self
        }
    }

    /// Name of the experiment, used in plot legends.
    #[inline]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The files, in sorted order.
    #[inline]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// The dates of all files that have one.
    pub fn dates(&self) -> BTreeSet<NaiveDate> {
        self.files.iter().filter_map(|f| file_date(f)).collect()
    }

    fn retain_dates<F>(&mut self, mut keep: F)
    where
        F: FnMut(NaiveDate) -> bool,
    {
        self.files
            .retain(|f| file_date(f).map(|d| keep(d)).unwrap_or(false));
    }
}

/// The date encoded in the first 8 characters of a file name, `YYYYMMDD`.
///
/// # Examples
///
/// ```rust
/// use omf_profile::experiment::file_date;
/// use chrono::NaiveDate;
/// use std::path::Path;
///
/// assert_eq!(
///     file_date(Path::new("exp/output/omf/2019/20190402.nc")),
///     NaiveDate::from_ymd_opt(2019, 4, 2)
/// );
/// assert_eq!(file_date(Path::new("exp/output/omf/2019/notes.txt")), None);
/// ```
pub fn file_date(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let stamp = name.get(..8)?;
    NaiveDate::parse_from_str(stamp, "%Y%m%d").ok()
}

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First date.
    pub first: NaiveDate,
    /// Last date.
    pub last: NaiveDate,
}

impl Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} to {}",
            self.first.format("%Y%m%d"),
            self.last.format("%Y%m%d")
        )
    }
}

/// Restrict every experiment to the dates within `[start, end]` that all experiments have files
/// for.
///
/// Files without a date in their name are dropped. Fails if no date is shared by all experiments,
/// or if afterwards an experiment has a different number of files than the first one.
pub fn align_experiments(
    mut experiments: Vec<Experiment>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(Vec<Experiment>, DateRange)> {
    if experiments.is_empty() {
        return Err(ProfileError::NoExperiments);
    }

    let in_range = |d: NaiveDate| {
        start.map(|s| d >= s).unwrap_or(true) && end.map(|e| d <= e).unwrap_or(true)
    };

    for exp in experiments.iter_mut() {
        exp.retain_dates(&in_range);
    }

    let mut exp_iter = experiments.iter();
    let first_dates = exp_iter.next().map(Experiment::dates).unwrap_or_default();
    let valid_dates: BTreeSet<NaiveDate> = exp_iter.fold(first_dates, |acc, exp| {
        acc.intersection(&exp.dates()).copied().collect()
    });

    let range = match (valid_dates.iter().next(), valid_dates.iter().next_back()) {
        (Some(&first), Some(&last)) => DateRange { first, last },
        _ => return Err(ProfileError::NoOverlappingDates),
    };
    info!("Using overlapping dates {}", range);

    for exp in experiments.iter_mut() {
        exp.retain_dates(|d| valid_dates.contains(&d));
    }

    let expected = experiments[0].files.len();
    if let Some(bad) = experiments.iter().find(|e| e.files.len() != expected) {
        return Err(ProfileError::ExperimentMismatch {
            experiment: bad.label.clone(),
            expected,
            found: bad.files.len(),
        });
    }

    Ok((experiments, range))
}
