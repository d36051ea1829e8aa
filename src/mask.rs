//! Selection masks over a batch of records.
//!
//! Masks are evaluated by a `MaskProvider` once per batch for every key any plot type needs. The
//! `MaskPlan` resolves the keys of each plot type to positions in that evaluated list when it is
//! built, so selecting the records for a plot type is only a series of element-wise ANDs.
//!
//! Every plot type is further restricted by a `Selection`: the quality control mask, the depth
//! range, the hour of day range, and the platform filter.
use crate::{
    error::{ProfileError, Result},
    keys::{MaskKey, RegionSet},
    plot_type::PlotType,
    record::ObsRecord,
};
use itertools::izip;
use metfor::Meters;

/// One boolean per record of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask(Vec<bool>);

impl Mask {
    /// A mask selecting all `len` records.
    #[inline]
    pub fn all(len: usize) -> Self {
        Mask(vec![true; len])
    }

    /// Evaluate a predicate for every record.
    #[inline]
    pub fn from_records<F>(records: &[ObsRecord], pred: F) -> Self
    where
        F: FnMut(&ObsRecord) -> bool,
    {
        Mask(records.iter().map(pred).collect())
    }

    /// Number of entries, which is the length of the batch it was made for.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a mask over an empty batch.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of selected records.
    #[inline]
    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    /// The raw values.
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }

    /// Element-wise AND of two masks over the same batch.
    #[inline]
    pub fn and(mut self, other: &Mask) -> Self {
        self.and_assign(other);
        self
    }

    /// In place element-wise AND.
    #[inline]
    pub fn and_assign(&mut self, other: &Mask) {
        debug_assert_eq!(self.len(), other.len());
        for (a, &b) in self.0.iter_mut().zip(&other.0) {
            *a &= b;
        }
    }

    /// Iterate the selected records.
    pub fn select<'a>(&'a self, records: &'a [ObsRecord]) -> impl Iterator<Item = &'a ObsRecord> {
        debug_assert_eq!(self.len(), records.len());
        izip!(&self.0, records).filter_map(|(&keep, rec)| if keep { Some(rec) } else { None })
    }
}

impl std::iter::FromIterator<bool> for Mask {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Mask(iter.into_iter().collect())
    }
}

/// AND together any number of masks over a batch of `len` records.
///
/// With no masks every record is selected.
pub fn combine<'a, I>(len: usize, masks: I) -> Mask
where
    I: IntoIterator<Item = &'a Mask>,
{
    masks.into_iter().fold(Mask::all(len), Mask::and)
}

/// Evaluates named masks over a batch of records.
pub trait MaskProvider: Send + Sync {
    /// Evaluate the mask for `key`. The result must have one entry per record.
    fn evaluate(&self, key: MaskKey, records: &[ObsRecord]) -> Mask;
}

/// Evaluates masks from the tags carried by the records.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagMaskProvider;

impl MaskProvider for TagMaskProvider {
    fn evaluate(&self, key: MaskKey, records: &[ObsRecord]) -> Mask {
        match key {
            MaskKey::Valid => Mask::from_records(records, |r| r.qc == 0),
            MaskKey::Variable(var) => Mask::from_records(records, |r| r.variable == var),
            MaskKey::Region(region) => Mask::from_records(records, |r| r.regions.contains(region)),
        }
    }
}

/// The distinct mask keys used by a list of plot types, and which of them each plot type needs.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskPlan {
    keys: Vec<MaskKey>,
    plots: Vec<Vec<usize>>,
}

impl MaskPlan {
    /// Resolve the mask keys of the plot types. `MaskKey::Valid` is always part of the plan.
    ///
    /// Fails with `InvalidConfig` if a plot type uses a region id that a `RegionSet` can't hold.
    pub fn new(plot_types: &[PlotType]) -> Result<Self> {
        let mut keys = vec![MaskKey::Valid];
        let mut plots: Vec<Vec<usize>> = Vec::with_capacity(plot_types.len());

        for pt in plot_types {
            let mut indexes = Vec::with_capacity(pt.masks.len());
            for &key in &pt.masks {
                if let MaskKey::Region(region) = key {
                    if !RegionSet::can_hold(region) {
                        return Err(ProfileError::InvalidConfig(format!(
                            "plot type {} uses region id {}, ids must be less than {}",
                            pt.name,
                            region.0,
                            RegionSet::CAPACITY
                        )));
                    }
                }

                let idx = match keys.iter().position(|&k| k == key) {
                    Some(idx) => idx,
                    None => {
                        keys.push(key);
                        keys.len() - 1
                    }
                };
                indexes.push(idx);
            }
            plots.push(indexes);
        }

        Ok(MaskPlan { keys, plots })
    }

    /// The distinct keys, evaluated once per batch.
    #[inline]
    pub fn keys(&self) -> &[MaskKey] {
        &self.keys
    }

    /// Number of plot types in the plan.
    #[inline]
    pub fn num_plots(&self) -> usize {
        self.plots.len()
    }

    /// Evaluate every key of the plan over a batch.
    pub fn evaluate<P>(&self, provider: &P, records: &[ObsRecord]) -> Result<EvaluatedMasks<'_>>
    where
        P: MaskProvider + ?Sized,
    {
        let masks = self
            .keys
            .iter()
            .map(|&key| {
                let mask = provider.evaluate(key, records);
                if mask.len() == records.len() {
                    Ok(mask)
                } else {
                    Err(ProfileError::MaskLength {
                        key,
                        expected: records.len(),
                        found: mask.len(),
                    })
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(EvaluatedMasks { plan: self, masks })
    }
}

/// The masks of a plan evaluated for one batch.
#[derive(Debug)]
pub struct EvaluatedMasks<'p> {
    plan: &'p MaskPlan,
    masks: Vec<Mask>,
}

impl<'p> EvaluatedMasks<'p> {
    /// The quality control mask.
    #[inline]
    pub fn valid(&self) -> &Mask {
        &self.masks[0]
    }

    /// The combined mask for plot type `plot`, restricted by the batch's `selection` mask.
    pub fn plot_mask(&self, plot: usize, selection: &Mask) -> Mask {
        combine(
            selection.len(),
            std::iter::once(selection).chain(self.plan.plots[plot].iter().map(|&i| &self.masks[i])),
        )
    }
}

/// Filters applied to every plot type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    /// Shallowest depth kept, inclusive.
    pub min_depth: Meters,
    /// Deepest depth kept, inclusive.
    pub max_depth: Meters,
    /// Earliest hour of day kept, inclusive.
    pub hour_min: i32,
    /// Latest hour of day kept, inclusive.
    pub hour_max: i32,
    /// Keep only this platform, or any identified platform if `None`.
    pub platform: Option<i64>,
}

impl Selection {
    /// True if a record passes the depth, hour, and platform filters.
    #[inline]
    pub fn accepts(&self, rec: &ObsRecord) -> bool {
        let platform_ok = match self.platform {
            Some(id) => rec.platform == id,
            None => rec.platform > 0,
        };

        rec.depth >= self.min_depth
            && rec.depth <= self.max_depth
            && rec.hour >= self.hour_min
            && rec.hour <= self.hour_max
            && platform_ok
    }

    /// The depth, hour, and platform filters ANDed with the quality control mask.
    pub fn mask(&self, records: &[ObsRecord], valid: &Mask) -> Mask {
        Mask::from_records(records, |r| self.accepts(r)).and(valid)
    }
}
