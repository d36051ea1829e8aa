//! Settings for building profiles.

use crate::{
    error::{ProfileError, Result},
    mask::Selection,
};
use chrono::NaiveDate;
use metfor::{Meters, Quantity};

/// Default shallowest depth used.
pub const DEFAULT_MIN_DEPTH: Meters = Meters(5.0);
/// Default deepest depth used.
pub const DEFAULT_MAX_DEPTH: Meters = Meters(500.0);
/// Default half width of the smoothing window, in levels.
pub const DEFAULT_SMOOTH_HALF_WIDTH: usize = 2;
/// Default number of experiments processed at the same time.
pub const DEFAULT_WORKERS: usize = 4;

/// Everything that controls record selection, smoothing, and scheduling.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    min_depth: Meters,
    max_depth: Meters,
    hours: (i32, i32),
    platform: Option<i64>,
    smooth_half_width: usize,
    workers: usize,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        ProfileConfig {
            min_depth: DEFAULT_MIN_DEPTH,
            max_depth: DEFAULT_MAX_DEPTH,
            hours: (i32::MIN, i32::MAX),
            platform: None,
            smooth_half_width: DEFAULT_SMOOTH_HALF_WIDTH,
            workers: DEFAULT_WORKERS,
            start: None,
            end: None,
        }
    }
}

impl ProfileConfig {
    /// Create a configuration with default values. This is a proxy for default with a clearer
    /// name.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use omf_profile::ProfileConfig;
    /// use metfor::Meters;
    ///
    /// let cfg = ProfileConfig::new()
    ///     .with_depth_range(Meters(0.0), Meters(1000.0))
    ///     .with_hours(0, 11)
    ///     .with_platform(Some(4_902_345))
    ///     .with_smooth_half_width(3)
    ///     .with_workers(8);
    ///
    /// assert!(cfg.validate().is_ok());
    /// assert_eq!(cfg.workers(), 8);
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method for the inclusive depth range.
    #[inline]
    pub fn with_depth_range(self, min_depth: Meters, max_depth: Meters) -> Self {
        Self {
            min_depth,
            max_depth,
            ..self
        }
    }

    /// Builder method for the inclusive hour of day range.
    #[inline]
    pub fn with_hours(self, hour_min: i32, hour_max: i32) -> Self {
        Self {
            hours: (hour_min, hour_max),
            ..self
        }
    }

    /// Builder method to restrict records to a single platform. With `None` any identified
    /// platform is kept.
    #[inline]
    pub fn with_platform(self, platform: Option<i64>) -> Self {
        Self { platform, ..self }
    }

    /// Builder method for the half width of the smoothing window.
    #[inline]
    pub fn with_smooth_half_width(self, smooth_half_width: usize) -> Self {
        Self {
            smooth_half_width,
            ..self
        }
    }

    /// Builder method for the number of worker threads.
    #[inline]
    pub fn with_workers(self, workers: usize) -> Self {
        Self { workers, ..self }
    }

    /// Builder method for the inclusive range of file dates to use. `None` leaves that end open.
    #[inline]
    pub fn with_dates(self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end, ..self }
    }

    /// Shallowest depth used.
    #[inline]
    pub fn min_depth(&self) -> Meters {
        self.min_depth
    }

    /// Deepest depth used.
    #[inline]
    pub fn max_depth(&self) -> Meters {
        self.max_depth
    }

    /// Inclusive hour of day range.
    #[inline]
    pub fn hours(&self) -> (i32, i32) {
        self.hours
    }

    /// The platform records are restricted to, if any.
    #[inline]
    pub fn platform(&self) -> Option<i64> {
        self.platform
    }

    /// Half width of the smoothing window.
    #[inline]
    pub fn smooth_half_width(&self) -> usize {
        self.smooth_half_width
    }

    /// Number of worker threads.
    #[inline]
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// First file date used.
    #[inline]
    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Last file date used.
    #[inline]
    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// The filters applied to every plot type.
    pub fn selection(&self) -> Selection {
        Selection {
            min_depth: self.min_depth,
            max_depth: self.max_depth,
            hour_min: self.hours.0,
            hour_max: self.hours.1,
            platform: self.platform,
        }
    }

    /// Check the configuration for inconsistent values.
    pub fn validate(&self) -> Result<()> {
        let (min_d, max_d) = (self.min_depth.unpack(), self.max_depth.unpack());
        if min_d.is_nan() || max_d.is_nan() || min_d > max_d {
            return Err(ProfileError::InvalidConfig(format!(
                "depth range {} to {}",
                min_d, max_d
            )));
        }

        if self.hours.0 > self.hours.1 {
            return Err(ProfileError::InvalidConfig(format!(
                "hour range {} to {}",
                self.hours.0, self.hours.1
            )));
        }

        if self.workers == 0 {
            return Err(ProfileError::InvalidConfig("zero workers".to_owned()));
        }

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(ProfileError::InvalidConfig(format!(
                    "start date {} after end date {}",
                    start, end
                )));
            }
        }

        Ok(())
    }
}
