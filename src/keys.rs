//! Enums used as keys for selecting observations and statistics.

use strum_macros::{AsRefStr, Display, EnumIter};

/// The observed quantity of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, Display, AsRefStr)]
pub enum ObsVariable {
    /// In situ potential temperature.
    #[strum(serialize = "insitu-temp")]
    Temperature,
    /// In situ salinity.
    #[strum(serialize = "insitu-salt")]
    Salinity,
}

impl ObsVariable {
    /// Short label used in plot titles.
    pub fn label(self) -> &'static str {
        match self {
            ObsVariable::Temperature => "insitu T",
            ObsVariable::Salinity => "insitu S",
        }
    }
}

/// Identifier of a geographic region, an index into the configured region list.
///
/// At most `RegionSet::CAPACITY` regions can be distinguished. Plans using larger ids are
/// rejected by `MaskPlan::new`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub u8);

/// The set of regions a record lies in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegionSet(u64);

impl RegionSet {
    /// Number of distinct regions a set can hold, region ids must be less than this.
    pub const CAPACITY: u8 = 64;

    /// True if `region` can be a member of a set.
    #[inline]
    pub fn can_hold(region: RegionId) -> bool {
        region.0 < Self::CAPACITY
    }

    /// A set with no regions.
    #[inline]
    pub fn empty() -> Self {
        RegionSet(0)
    }

    /// Builder method adding a region to the set.
    #[inline]
    pub fn with(self, region: RegionId) -> Self {
        RegionSet(self.0 | Self::bit(region))
    }

    /// Test for membership.
    #[inline]
    pub fn contains(self, region: RegionId) -> bool {
        self.0 & Self::bit(region) != 0
    }

    #[inline]
    fn bit(region: RegionId) -> u64 {
        1u64.checked_shl(u32::from(region.0)).unwrap_or(0)
    }
}

impl std::iter::FromIterator<RegionId> for RegionSet {
    fn from_iter<I: IntoIterator<Item = RegionId>>(iter: I) -> Self {
        iter.into_iter().fold(RegionSet::empty(), RegionSet::with)
    }
}

/// A named selection mask that a `MaskProvider` knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MaskKey {
    /// Records that passed quality control.
    Valid,
    /// Records of one observed quantity.
    Variable(ObsVariable),
    /// Records inside a region.
    Region(RegionId),
}

/// Running statistics kept for each depth bin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, Display, AsRefStr)]
pub enum Statistic {
    /// Mean of the ensemble increment mean.
    #[strum(serialize = "inc_mean")]
    IncMean,
    /// Mean of the squared ensemble increment mean.
    #[strum(serialize = "inc_mean2")]
    IncMean2,
    /// Mean of the bias corrected squared ensemble increment spread.
    #[strum(serialize = "inc_sprd2")]
    IncSprd2,
    /// Mean of the observed value.
    #[strum(serialize = "val")]
    Val,
    /// Mean of the nominal observation error.
    #[strum(serialize = "err")]
    Err,
}

/// The kinds of profile plotted for every plot type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, AsRefStr)]
pub enum ProfileKind {
    /// Smoothed mean increment.
    #[strum(serialize = "bias")]
    Bias,
    /// Root of the smoothed mean squared increment, with the ensemble spread.
    #[strum(serialize = "rmsd")]
    Rmsd,
}
