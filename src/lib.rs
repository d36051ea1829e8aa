#![warn(missing_docs)]
//! Vertical profiles of observation minus forecast statistics from ensemble ocean data
//! assimilation experiments.
//!
//! Observations are binned by depth into a `LevelTable`. For every plot type, a named set of
//! masks such as a variable and a region, each experiment accumulates running means of the
//! ensemble increment mean, its square, the corrected square of the ensemble spread, the observed
//! value and the observation error in every bin. The binned statistics are then smoothed with a
//! count weighted triangular kernel into bias, RMSD and spread profiles that are handed to a
//! `Renderer`.
//!
//! ```rust
//! use omf_profile::{
//!     compare_experiments, Experiment, LevelTable, MemorySource, ObsBatch, ObsRecord,
//!     ObsVariable, PlotType, ProfileConfig, TagMaskProvider,
//! };
//! use omf_profile::keys::MaskKey;
//! use metfor::Meters;
//! use std::path::PathBuf;
//!
//! let levels = LevelTable::uniform(Meters(10.0), Meters(10.0), 10).unwrap();
//! let plot_types = vec![PlotType::new(
//!     "insitu-temp",
//!     "insitu T",
//!     vec![MaskKey::Variable(ObsVariable::Temperature)],
//!     "insitu-temp/#p#/#p#_insitu-temp",
//! )];
//!
//! let batch = ObsBatch::new(
//!     vec![ObsRecord::new(Meters(25.0)).with_increment(0.5, 0.2)],
//!     20,
//! );
//! let source = MemorySource::new().with_batch("ctrl/20200101.nc", batch);
//! let exp = Experiment::new("ctrl", vec![PathBuf::from("ctrl/20200101.nc")]);
//!
//! let cmp = compare_experiments(
//!     vec![exp],
//!     &source,
//!     &TagMaskProvider,
//!     plot_types,
//!     &levels,
//!     &ProfileConfig::new(),
//! )
//! .unwrap();
//!
//! let curves = cmp.curves(0);
//! assert_eq!(curves[0].0, "ctrl");
//! assert_eq!(curves[0].1.bias[2].into_option(), Some(0.5));
//! ```

//
// API
//
pub use crate::{
    aggregate::{AggregationSummary, Aggregator, ExperimentProfile},
    config::ProfileConfig,
    error::{ProfileError, Result},
    experiment::{align_experiments, DateRange, Experiment},
    keys::{ObsVariable, ProfileKind},
    levels::LevelTable,
    mask::{Mask, MaskPlan, MaskProvider, Selection, TagMaskProvider},
    plot_type::{default_plot_types, PlotType, Region},
    profile::{compare_experiments, Comparison, ProfileCurves, Renderer},
    record::{ObsBatch, ObsRecord},
    source::{MemorySource, ObsSource},
};

pub mod accumulate;
pub mod aggregate;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod experiment;
pub mod keys;
pub mod levels;
pub mod mask;
pub mod plot_type;
pub mod profile;
pub mod record;
pub mod smoothing;
pub mod source;

//
// Internal use only
//
mod utility;
