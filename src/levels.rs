//! The vertical levels observations are binned into.
//!
//! A `LevelTable` is an ordered list of depth boundaries. A depth is assigned to the bin of the
//! first boundary at or below it (deeper than or equal to it), which is a left bisection of the
//! table. Depths above (shallower than) the first boundary land in bin 0, depths deeper than the
//! last boundary have no bin.
use crate::error::{ProfileError, Result};
use itertools::Itertools;
use metfor::{Meters, Quantity};

/// Strictly increasing depth boundaries, positive down.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    depths: Vec<Meters>,
}

impl LevelTable {
    /// Create a level table, checking that it is non-empty, finite, and strictly increasing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use omf_profile::LevelTable;
    /// use metfor::Meters;
    ///
    /// let lvls = LevelTable::new(vec![Meters(10.0), Meters(20.0), Meters(30.0)]).unwrap();
    /// assert_eq!(lvls.len(), 3);
    ///
    /// assert!(LevelTable::new(vec![]).is_err());
    /// assert!(LevelTable::new(vec![Meters(20.0), Meters(10.0)]).is_err());
    /// ```
    pub fn new(depths: Vec<Meters>) -> Result<Self> {
        if depths.is_empty() {
            return Err(ProfileError::InvalidLevels("no levels".to_owned()));
        }

        if let Some(bad) = depths.iter().find(|d| !d.unpack().is_finite()) {
            return Err(ProfileError::InvalidLevels(format!(
                "non-finite depth {:?}",
                bad
            )));
        }

        if let Some((upper, lower)) = depths.iter().tuple_windows().find(|(a, b)| a >= b) {
            return Err(ProfileError::InvalidLevels(format!(
                "depths not strictly increasing at {:?}, {:?}",
                upper, lower
            )));
        }

        Ok(LevelTable { depths })
    }

    /// Build a table from plain values in meters.
    pub fn from_meters<I>(depths: I) -> Result<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        Self::new(depths.into_iter().map(Meters).collect())
    }

    /// A table of `n` evenly spaced levels starting at `top`.
    pub fn uniform(top: Meters, spacing: Meters, n: usize) -> Result<Self> {
        let (top, spacing) = (top.unpack(), spacing.unpack());
        Self::new((0..n).map(|i| Meters(top + spacing * i as f64)).collect())
    }

    /// Number of levels, and so the number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    /// Always false, a level table has at least one level.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    /// The level depths.
    #[inline]
    pub fn depths(&self) -> &[Meters] {
        &self.depths
    }

    /// Index of the first level with a depth greater than or equal to `depth`.
    ///
    /// Returns `len()` when `depth` is deeper than every level.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use omf_profile::LevelTable;
    /// use metfor::Meters;
    ///
    /// let lvls = LevelTable::from_meters(vec![10.0, 20.0, 30.0]).unwrap();
    /// assert_eq!(lvls.bisect(Meters(5.0)), 0);
    /// assert_eq!(lvls.bisect(Meters(15.0)), 1);
    /// assert_eq!(lvls.bisect(Meters(20.0)), 1);
    /// assert_eq!(lvls.bisect(Meters(35.0)), 3);
    /// ```
    #[inline]
    pub fn bisect(&self, depth: Meters) -> usize {
        self.depths.partition_point(|&lvl| lvl < depth)
    }

    /// The bin a depth falls in, `None` if it is deeper than the last level or not a number.
    #[inline]
    pub fn bin_index(&self, depth: Meters) -> Option<usize> {
        if depth.unpack().is_nan() {
            return None;
        }

        let idx = self.bisect(depth);
        if idx < self.depths.len() {
            Some(idx)
        } else {
            None
        }
    }
}
