#![allow(dead_code)]

use metfor::Meters;
use omf_profile::{
    keys::{ObsVariable, RegionId, RegionSet},
    LevelTable, ObsBatch, ObsRecord,
};

pub const NUM_RECORDS: usize = 100_000;

pub fn make_levels() -> LevelTable {
    LevelTable::uniform(Meters(5.0), Meters(5.0), 100).expect("bad levels")
}

/// A batch with depths and increments spread over the levels without any randomness.
pub fn make_batch() -> ObsBatch {
    let north = RegionSet::empty().with(RegionId(0));
    let south = RegionSet::empty().with(RegionId(1));

    let records = (0..NUM_RECORDS)
        .map(|i| {
            let depth = ((i * 7919) % 5200) as f64 * 0.1;
            let inc = ((i * 31) % 200) as f64 / 100.0 - 1.0;
            let (variable, regions) = if i % 3 == 0 {
                (ObsVariable::Salinity, north)
            } else {
                (ObsVariable::Temperature, if i % 2 == 0 { north } else { south })
            };

            ObsRecord::new(Meters(depth))
                .with_value(10.0 + inc)
                .with_error(0.5)
                .with_increment(inc, 0.25 * inc.abs())
                .with_variable(variable)
                .with_regions(regions)
                .with_qc((i % 17 == 0) as u8)
        })
        .collect();

    ObsBatch::new(records, 40)
}
