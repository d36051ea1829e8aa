//! Running statistics of observations binned by depth.
//!
//! Each bin keeps running means updated one record at a time with Welford's update,
//! `mean += (x - mean) / n`, which stays accurate for long sequences without storing the
//! records.
use crate::{keys::Statistic, levels::LevelTable, record::ObsRecord};

/// Running statistics for one depth bin.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BinStats {
    /// Number of records added.
    pub count: u32,
    /// Mean of the ensemble increment mean.
    pub inc_mean: f64,
    /// Mean of the squared ensemble increment mean.
    pub inc_mean2: f64,
    /// Mean of the squared ensemble increment spread, scaled by the finite ensemble correction.
    pub inc_sprd2: f64,
    /// Mean of the observed value.
    pub val: f64,
    /// Mean of the nominal observation error.
    pub err: f64,
}

impl BinStats {
    /// Add a record. `spread_correction` is the `(m + 1) / m` factor for the ensemble size `m` of
    /// the record's batch.
    #[inline]
    pub fn add(&mut self, rec: &ObsRecord, spread_correction: f64) {
        self.count += 1;
        let n = f64::from(self.count);

        self.inc_mean += (rec.inc_mean - self.inc_mean) / n;
        self.inc_mean2 += (rec.inc_mean * rec.inc_mean - self.inc_mean2) / n;
        self.inc_sprd2 += (spread_correction * rec.inc_sprd * rec.inc_sprd - self.inc_sprd2) / n;
        self.val += (rec.value - self.val) / n;
        self.err += (rec.error - self.err) / n;
    }

    /// Get one of the running statistics.
    #[inline]
    pub fn get(&self, stat: Statistic) -> f64 {
        match stat {
            Statistic::IncMean => self.inc_mean,
            Statistic::IncMean2 => self.inc_mean2,
            Statistic::IncSprd2 => self.inc_sprd2,
            Statistic::Val => self.val,
            Statistic::Err => self.err,
        }
    }
}

/// What happened to a record offered to `ProfileStats::add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binned {
    /// Added to the bin with this index.
    Added(usize),
    /// Skipped because a value used in the statistics is not finite.
    Malformed,
    /// Skipped because it is deeper than the deepest level.
    OutOfRange,
}

/// Running statistics for every bin of a level table.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileStats {
    bins: Vec<BinStats>,
}

impl ProfileStats {
    /// Zeroed statistics with one bin per level.
    pub fn new(levels: &LevelTable) -> Self {
        ProfileStats {
            bins: vec![BinStats::default(); levels.len()],
        }
    }

    /// Bin a record by depth and add it to that bin.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use omf_profile::{accumulate::{Binned, ProfileStats}, LevelTable, ObsRecord};
    /// use metfor::Meters;
    ///
    /// let lvls = LevelTable::from_meters(vec![10.0, 20.0, 30.0]).unwrap();
    /// let mut stats = ProfileStats::new(&lvls);
    ///
    /// let rec = ObsRecord::new(Meters(15.0)).with_increment(1.0, 0.0);
    /// assert_eq!(stats.add(&lvls, &rec, 1.1), Binned::Added(1));
    /// assert_eq!(stats.bins()[1].count, 1);
    ///
    /// let deep = ObsRecord::new(Meters(45.0));
    /// assert_eq!(stats.add(&lvls, &deep, 1.1), Binned::OutOfRange);
    /// ```
    #[inline]
    pub fn add(&mut self, levels: &LevelTable, rec: &ObsRecord, spread_correction: f64) -> Binned {
        debug_assert_eq!(levels.len(), self.bins.len());

        if !rec.is_well_formed() {
            return Binned::Malformed;
        }

        match levels.bin_index(rec.depth) {
            Some(idx) => {
                self.bins[idx].add(rec, spread_correction);
                Binned::Added(idx)
            }
            None => Binned::OutOfRange,
        }
    }

    /// The per bin statistics.
    #[inline]
    pub fn bins(&self) -> &[BinStats] {
        &self.bins
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// True if there are no bins.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// The record count of every bin.
    pub fn counts(&self) -> Vec<u32> {
        self.bins.iter().map(|b| b.count).collect()
    }

    /// One statistic for every bin.
    pub fn values(&self, stat: Statistic) -> Vec<f64> {
        self.bins.iter().map(|b| b.get(stat)).collect()
    }

    /// The largest count of any bin.
    pub fn max_count(&self) -> u32 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Total number of records added.
    pub fn total_count(&self) -> u64 {
        self.bins.iter().map(|b| u64::from(b.count)).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::approx_equal;
    use metfor::Meters;

    fn make_test_levels() -> LevelTable {
        LevelTable::from_meters(vec![10.0, 20.0, 30.0]).unwrap()
    }

    #[test]
    fn test_two_records_in_one_bin() {
        let lvls = make_test_levels();
        let mut stats = ProfileStats::new(&lvls);
        let c = 11.0 / 10.0;

        let rec = ObsRecord::new(Meters(15.0))
            .with_value(2.0)
            .with_increment(1.0, 0.0);
        assert_eq!(stats.add(&lvls, &rec, c), Binned::Added(1));

        let bin = stats.bins()[1];
        assert_eq!(bin.count, 1);
        assert_eq!(bin.inc_mean, 1.0);
        assert_eq!(bin.val, 2.0);
        assert_eq!(bin.inc_mean2, 1.0);
        assert_eq!(bin.inc_sprd2, 0.0);

        let rec = ObsRecord::new(Meters(12.0))
            .with_value(2.0)
            .with_increment(3.0, 0.0);
        assert_eq!(stats.add(&lvls, &rec, c), Binned::Added(1));

        let bin = stats.bins()[1];
        assert_eq!(bin.count, 2);
        assert!(approx_equal(bin.inc_mean, 2.0, 1.0e-12));
        assert!(approx_equal(bin.inc_mean2, 5.0, 1.0e-12));

        assert_eq!(stats.counts(), vec![0, 2, 0]);
        assert_eq!(stats.max_count(), 2);
        assert_eq!(stats.total_count(), 2);
    }

    #[test]
    fn test_spread_correction_applied() {
        let lvls = make_test_levels();
        let mut stats = ProfileStats::new(&lvls);

        stats.add(&lvls, &ObsRecord::new(Meters(5.0)).with_increment(0.0, 2.0), 1.5);
        stats.add(&lvls, &ObsRecord::new(Meters(5.0)).with_increment(0.0, 4.0), 1.5);

        // (1.5 * 4 + 1.5 * 16) / 2
        assert!(approx_equal(stats.bins()[0].inc_sprd2, 15.0, 1.0e-12));
    }

    #[test]
    fn test_running_mean_matches_direct_mean() {
        let lvls = make_test_levels();
        let values: Vec<f64> = (0..1000).map(|i| ((i * 37) % 101) as f64 * 0.173 - 4.2).collect();
        let recs: Vec<ObsRecord> = values
            .iter()
            .map(|&v| {
                ObsRecord::new(Meters(25.0))
                    .with_value(v * 2.0)
                    .with_error(v.abs())
                    .with_increment(v, v / 2.0)
            })
            .collect();

        let n = values.len() as f64;
        let direct_mean = values.iter().sum::<f64>() / n;
        let direct_mean2 = values.iter().map(|v| v * v).sum::<f64>() / n;
        let direct_sprd2 = values.iter().map(|v| 1.1 * (v / 2.0) * (v / 2.0)).sum::<f64>() / n;
        let direct_val = values.iter().map(|v| v * 2.0).sum::<f64>() / n;
        let direct_err = values.iter().map(|v| v.abs()).sum::<f64>() / n;

        let mut forward = ProfileStats::new(&lvls);
        recs.iter().for_each(|r| {
            forward.add(&lvls, r, 1.1);
        });

        let mut backward = ProfileStats::new(&lvls);
        recs.iter().rev().for_each(|r| {
            backward.add(&lvls, r, 1.1);
        });

        for stats in &[forward, backward] {
            let bin = stats.bins()[2];
            assert_eq!(bin.count, 1000);
            assert!(approx_equal(bin.inc_mean, direct_mean, 1.0e-9));
            assert!(approx_equal(bin.inc_mean2, direct_mean2, 1.0e-9));
            assert!(approx_equal(bin.inc_sprd2, direct_sprd2, 1.0e-9));
            assert!(approx_equal(bin.val, direct_val, 1.0e-9));
            assert!(approx_equal(bin.err, direct_err, 1.0e-9));
        }
    }

    #[test]
    fn test_skipped_records() {
        let lvls = make_test_levels();
        let mut stats = ProfileStats::new(&lvls);

        let bad = ObsRecord::new(Meters(15.0)).with_increment(std::f64::NAN, 0.0);
        assert_eq!(stats.add(&lvls, &bad, 1.1), Binned::Malformed);

        let deep = ObsRecord::new(Meters(30.5));
        assert_eq!(stats.add(&lvls, &deep, 1.1), Binned::OutOfRange);

        // On the deepest boundary is still in range.
        let bottom = ObsRecord::new(Meters(30.0));
        assert_eq!(stats.add(&lvls, &bottom, 1.1), Binned::Added(2));

        assert_eq!(stats.total_count(), 1);
        assert!(stats.bins()[1].inc_mean.is_finite());
    }

    #[test]
    fn test_get_statistic() {
        let mut bin = BinStats::default();
        bin.add(
            &ObsRecord::new(Meters(1.0))
                .with_value(3.0)
                .with_error(0.5)
                .with_increment(-2.0, 1.0),
            2.0,
        );

        assert_eq!(bin.get(Statistic::IncMean), -2.0);
        assert_eq!(bin.get(Statistic::IncMean2), 4.0);
        assert_eq!(bin.get(Statistic::IncSprd2), 2.0);
        assert_eq!(bin.get(Statistic::Val), 3.0);
        assert_eq!(bin.get(Statistic::Err), 0.5);
    }
}
