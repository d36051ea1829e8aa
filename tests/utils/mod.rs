#![allow(dead_code)]

use metfor::{Meters, Quantity};
use omf_profile::{
    experiment::DateRange,
    keys::{ObsVariable, ProfileKind, RegionId, RegionSet},
    Experiment, ObsBatch, ObsRecord, ObsSource, PlotType, ProfileCurves, ProfileError, Region,
    Renderer, Result,
};
use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
    str::FromStr,
};
use strum::IntoEnumIterator;

#[allow(unused_macros)] // False alarm
macro_rules! check_summary {
    ($test_name:ident, $label:expr, $files:expr, $records:expr, $binned:expr, $malformed:expr, $out_of_range:expr) => {
        #[test]
        fn $test_name() {
            let cmp = utils::compare_test_experiments(0);
            let idx = cmp
                .labels()
                .iter()
                .position(|l| l == $label)
                .expect("missing experiment");

            assert_eq!(
                cmp.summaries()[idx],
                omf_profile::AggregationSummary {
                    files: $files,
                    records: $records,
                    binned: $binned,
                    malformed: $malformed,
                    out_of_range: $out_of_range,
                }
            );
        }
    };
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_data_dir() -> PathBuf {
    PathBuf::from("test_data")
}

pub fn load_test_experiments() -> Vec<Experiment> {
    ["ctrl", "test"]
        .iter()
        .map(|name| Experiment::discover(&test_data_dir().join(name)).expect("missing test data"))
        .collect()
}

pub fn test_regions() -> Vec<Region> {
    vec![
        Region::new(RegionId(0), "global", "Global"),
        Region::new(RegionId(1), "np", "N. Pacific"),
    ]
}

pub fn test_levels() -> omf_profile::LevelTable {
    omf_profile::LevelTable::uniform(Meters(10.0), Meters(10.0), 5).expect("bad levels")
}

pub fn compare_test_experiments(half_width: usize) -> omf_profile::Comparison {
    init_logger();

    let cfg = omf_profile::ProfileConfig::new()
        .with_smooth_half_width(half_width)
        .with_workers(2);

    omf_profile::compare_experiments(
        load_test_experiments(),
        &CsvSource,
        &omf_profile::TagMaskProvider,
        omf_profile::default_plot_types(&test_regions()),
        &test_levels(),
        &cfg,
    )
    .expect("comparison failed")
}

/// Reads batches stored as CSV text. The first line is `members,<m>`, the second a header.
#[derive(Debug, Clone, Copy)]
pub struct CsvSource;

impl ObsSource for CsvSource {
    fn read(&self, path: &Path) -> Result<ObsBatch> {
        let mut contents = String::new();
        File::open(path)?.read_to_string(&mut contents)?;

        let bad = |reason: String| ProfileError::DataSource {
            path: path.to_owned(),
            reason,
        };

        let mut lines = contents.lines();
        let members = lines
            .next()
            .and_then(|line| line.strip_prefix("members,"))
            .and_then(|m| u32::from_str(m.trim()).ok())
            .ok_or_else(|| bad("missing member count".to_owned()))?;

        let records = lines
            .skip(1)
            .filter(|line| !line.trim().is_empty())
            .map(|line| parse_record(line).ok_or_else(|| bad(format!("bad line: {}", line))))
            .collect::<Result<Vec<_>>>()?;

        Ok(ObsBatch::new(records, members))
    }
}

fn parse_record(line: &str) -> Option<ObsRecord> {
    let tokens: Vec<&str> = line.split(',').map(str::trim).collect();
    if tokens.len() != 10 {
        return None;
    }

    let f = |i: usize| f64::from_str(tokens[i]).ok();

    let variable = ObsVariable::iter().find(|v| v.to_string() == tokens[5])?;
    let regions = tokens[6]
        .split(';')
        .map(|r| u8::from_str(r).ok().map(RegionId))
        .collect::<Option<RegionSet>>()?;

    Some(
        ObsRecord::new(Meters(f(0)?))
            .with_value(f(1)?)
            .with_error(f(2)?)
            .with_increment(f(3)?, f(4)?)
            .with_variable(variable)
            .with_regions(regions)
            .with_qc(u8::from_str(tokens[7]).ok()?)
            .with_hour(i32::from_str(tokens[8]).ok()?)
            .with_platform(i64::from_str(tokens[9]).ok()?),
    )
}

/// Writes each profile as a CSV table of depth and one column per experiment.
#[derive(Debug, Default)]
pub struct CsvRenderer {
    pub written: Vec<PathBuf>,
}

impl Renderer for CsvRenderer {
    fn render(
        &mut self,
        plot_type: &PlotType,
        kind: ProfileKind,
        path: &Path,
        curves: &[(&str, &ProfileCurves)],
        dates: &DateRange,
    ) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        let mut f = File::create(path)?;
        writeln!(f, "# {} {}, {}", plot_type.title, kind, dates)?;
        write!(f, "depth")?;
        for (label, c) in curves {
            write!(f, ",{} (max count {})", label, c.max_count)?;
        }
        writeln!(f)?;

        let depths = curves.first().map(|(_, c)| c.depths.as_slice()).unwrap_or(&[]);
        for (i, depth) in depths.iter().enumerate() {
            write!(f, "{}", depth.unpack())?;
            for (_, c) in curves {
                match c.curve(kind)[i].into_option() {
                    Some(v) => write!(f, ",{}", v)?,
                    None => write!(f, ",")?,
                }
            }
            writeln!(f)?;
        }

        self.written.push(path.to_owned());
        Ok(())
    }
}
