//! Where observation batches come from.
//!
//! Reading the files written by the assimilation system is left to implementors of `ObsSource`.
//! The `MemorySource` serves batches that are already in memory.

use crate::{
    error::{ProfileError, Result},
    record::ObsBatch,
};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

/// Reads the batch of observations stored in one file.
pub trait ObsSource: Send + Sync {
    /// Read all records of a file and the ensemble size that produced them.
    fn read(&self, path: &Path) -> Result<ObsBatch>;
}

/// A source holding batches in memory, keyed by file path.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    batches: HashMap<PathBuf, ObsBatch>,
}

impl MemorySource {
    /// Create an empty source.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method adding the batch for a path, replacing any batch already stored for it.
    pub fn with_batch<P>(mut self, path: P, batch: ObsBatch) -> Self
    where
        P: Into<PathBuf>,
    {
        self.insert(path, batch);
        self
    }

    /// Store the batch for a path, replacing any batch already stored for it.
    pub fn insert<P>(&mut self, path: P, batch: ObsBatch)
    where
        P: Into<PathBuf>,
    {
        self.batches.insert(path.into(), batch);
    }

    /// Number of stored batches.
    #[inline]
    pub fn len(&self) -> usize {
        self.batches.len()
    }

    /// True if no batches are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

impl ObsSource for MemorySource {
    fn read(&self, path: &Path) -> Result<ObsBatch> {
        self.batches
            .get(path)
            .cloned()
            .ok_or_else(|| ProfileError::DataSource {
                path: path.to_owned(),
                reason: "no such file".to_owned(),
            })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::record::ObsRecord;
    use metfor::Meters;

    #[test]
    fn test_memory_source() {
        let batch = ObsBatch::new(vec![ObsRecord::new(Meters(10.0))], 20);
        let src = MemorySource::new().with_batch("exp/20200101.nc", batch.clone());

        assert_eq!(src.len(), 1);
        assert_eq!(src.read(Path::new("exp/20200101.nc")).unwrap(), batch);

        match src.read(Path::new("exp/20200102.nc")) {
            Err(ProfileError::DataSource { path, .. }) => {
                assert_eq!(path, PathBuf::from("exp/20200102.nc"))
            }
            other => panic!("unexpected result {:?}", other),
        }
    }
}
