//! Observation records and the batches they are delivered in.

use crate::keys::{ObsVariable, RegionSet};
use metfor::{Meters, Quantity};

/// One observation with the ensemble increment statistics at its location.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ObsRecord {
    /// Depth in meters, positive down.
    pub depth: Meters,
    /// Observed value.
    pub value: f64,
    /// Nominal observation error.
    pub error: f64,
    /// Mean of the ensemble increment.
    pub inc_mean: f64,
    /// Spread of the ensemble increment.
    pub inc_sprd: f64,
    /// Regions the observation lies in.
    pub regions: RegionSet,
    /// Observed quantity.
    pub variable: ObsVariable,
    /// Quality control flag, 0 is valid.
    pub qc: u8,
    /// Hour of day of the observation.
    pub hour: i32,
    /// Platform identifier, values less than 1 are unidentified platforms.
    pub platform: i64,
}

impl ObsRecord {
    /// A valid temperature observation at `depth` in no region, with all values zero and
    /// platform 1.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use omf_profile::{ObsRecord, ObsVariable};
    /// use metfor::Meters;
    ///
    /// let rec = ObsRecord::new(Meters(15.0))
    ///     .with_value(2.0)
    ///     .with_increment(1.0, 0.5)
    ///     .with_variable(ObsVariable::Salinity);
    ///
    /// assert_eq!(rec.inc_mean, 1.0);
    /// assert!(rec.is_well_formed());
    /// ```
    pub fn new(depth: Meters) -> Self {
        ObsRecord {
            depth,
            value: 0.0,
            error: 0.0,
            inc_mean: 0.0,
            inc_sprd: 0.0,
            regions: RegionSet::empty(),
            variable: ObsVariable::Temperature,
            qc: 0,
            hour: 0,
            platform: 1,
        }
    }

    /// Builder method for the observed value.
    #[inline]
    pub fn with_value(self, value: f64) -> Self {
        Self { value, ..self }
    }

    /// Builder method for the observation error.
    #[inline]
    pub fn with_error(self, error: f64) -> Self {
        Self { error, ..self }
    }

    /// Builder method for the ensemble increment mean and spread.
    #[inline]
    pub fn with_increment(self, inc_mean: f64, inc_sprd: f64) -> Self {
        Self {
            inc_mean,
            inc_sprd,
            ..self
        }
    }

    /// Builder method for the region memberships.
    #[inline]
    pub fn with_regions(self, regions: RegionSet) -> Self {
        Self { regions, ..self }
    }

    /// Builder method for the observed quantity.
    #[inline]
    pub fn with_variable(self, variable: ObsVariable) -> Self {
        Self { variable, ..self }
    }

    /// Builder method for the quality control flag.
    #[inline]
    pub fn with_qc(self, qc: u8) -> Self {
        Self { qc, ..self }
    }

    /// Builder method for the hour of day.
    #[inline]
    pub fn with_hour(self, hour: i32) -> Self {
        Self { hour, ..self }
    }

    /// Builder method for the platform id.
    #[inline]
    pub fn with_platform(self, platform: i64) -> Self {
        Self { platform, ..self }
    }

    /// True if every value used in the statistics is finite.
    #[inline]
    pub fn is_well_formed(&self) -> bool {
        self.depth.unpack().is_finite()
            && self.value.is_finite()
            && self.error.is_finite()
            && self.inc_mean.is_finite()
            && self.inc_sprd.is_finite()
    }
}

/// The records read from one file along with the size of the ensemble that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct ObsBatch {
    /// The observations.
    pub records: Vec<ObsRecord>,
    /// Number of ensemble members.
    pub members: u32,
}

impl ObsBatch {
    /// Create a new batch.
    #[inline]
    pub fn new(records: Vec<ObsRecord>, members: u32) -> Self {
        ObsBatch { records, members }
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if there are no records.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Finite ensemble size correction applied to the squared spread, `(m + 1) / m`.
    ///
    /// `None` for an empty ensemble.
    #[inline]
    pub fn spread_correction(&self) -> Option<f64> {
        if self.members == 0 {
            None
        } else {
            let m = f64::from(self.members);
            Some((m + 1.0) / m)
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_spread_correction() {
        assert_eq!(ObsBatch::new(vec![], 10).spread_correction(), Some(1.1));
        assert_eq!(ObsBatch::new(vec![], 1).spread_correction(), Some(2.0));
        assert_eq!(ObsBatch::new(vec![], 0).spread_correction(), None);
    }

    #[test]
    fn test_well_formed() {
        let rec = ObsRecord::new(Meters(10.0));
        assert!(rec.is_well_formed());
        assert!(!rec.with_value(std::f64::NAN).is_well_formed());
        assert!(!rec.with_increment(1.0, std::f64::INFINITY).is_well_formed());
        assert!(!ObsRecord::new(Meters(std::f64::NAN)).is_well_formed());
    }
}
