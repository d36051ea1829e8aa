//! Error types for the omf-profile crate.
use crate::keys::MaskKey;
use std::path::PathBuf;
use thiserror::Error;

/// Error type for the crate.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The level table is empty, contains non-finite values, or is not strictly increasing.
    #[error("Invalid level table: {0}")]
    InvalidLevels(String),

    /// A configuration value is out of range or inconsistent with another value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A batch reported an ensemble member count that cannot be used for the spread correction.
    #[error("Invalid ensemble member count {members} in {}", .path.display())]
    InvalidMemberCount {
        /// File the batch was read from.
        path: PathBuf,
        /// The offending member count.
        members: u32,
    },

    /// A mask provider returned a mask that does not match the batch it was evaluated for.
    #[error("Mask {key:?} has {found} entries for a batch of {expected} records.")]
    MaskLength {
        /// The mask that was evaluated.
        key: MaskKey,
        /// Number of records in the batch.
        expected: usize,
        /// Number of entries in the mask.
        found: usize,
    },

    /// The data source failed to produce a batch for a file.
    #[error("Failed to read observations from {}: {reason}", .path.display())]
    DataSource {
        /// File that could not be read.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// There was nothing to compare.
    #[error("No experiments given.")]
    NoExperiments,

    /// The experiments being compared share no dates within the requested range.
    #[error("No overlapping dates between experiments.")]
    NoOverlappingDates,

    /// After date alignment an experiment has a different number of files than the others.
    #[error(
        "Number of files does not match for all experiments: {experiment} has {found}, expected {expected}."
    )]
    ExperimentMismatch {
        /// Label of the offending experiment.
        experiment: String,
        /// Number of files in the first experiment.
        expected: usize,
        /// Number of files in the offending experiment.
        found: usize,
    },

    /// Aggregation of one experiment failed, which fails the whole comparison.
    #[error("Aggregation failed for experiment {experiment}: {source}")]
    WorkerFailure {
        /// Label of the failed experiment.
        experiment: String,
        /// The underlying failure.
        #[source]
        source: Box<ProfileError>,
    },

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Forward an I/O error from file discovery.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, ProfileError>;
