//! Descriptions of the profiles to compute and where to put them.

use crate::keys::{MaskKey, ObsVariable, ProfileKind, RegionId};
use std::path::{Path, PathBuf};
use strum::IntoEnumIterator;

/// Placeholder in a file template that is replaced by the profile kind.
pub const KIND_PLACEHOLDER: &str = "#p#";

/// A geographic region plots can be restricted to.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// Id used in the `RegionSet` of records.
    pub id: RegionId,
    /// Short name used in file names.
    pub name: String,
    /// Name used in plot titles.
    pub title: String,
}

impl Region {
    /// Create a new region.
    pub fn new<S, T>(id: RegionId, name: S, title: T) -> Self
    where
        S: Into<String>,
        T: Into<String>,
    {
        Region {
            id,
            name: name.into(),
            title: title.into(),
        }
    }
}

/// One statistical profile to compute for every experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotType {
    /// Unique name.
    pub name: String,
    /// Title for the plot.
    pub title: String,
    /// Masks a record must pass, in addition to the selection every plot type uses.
    pub masks: Vec<MaskKey>,
    /// Output file path relative to the output directory, without extension. Every occurrence of
    /// `#p#` is replaced by the profile kind.
    pub file_template: String,
}

impl PlotType {
    /// Create a new plot type.
    pub fn new<N, T, F>(name: N, title: T, masks: Vec<MaskKey>, file_template: F) -> Self
    where
        N: Into<String>,
        T: Into<String>,
        F: Into<String>,
    {
        PlotType {
            name: name.into(),
            title: title.into(),
            masks,
            file_template: file_template.into(),
        }
    }

    /// Output path for one kind of profile of this plot type.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use omf_profile::{PlotType, ProfileKind};
    /// use std::path::Path;
    ///
    /// let pt = PlotType::new("t", "T", vec![], "insitu-temp/#p#/#p#_insitu-temp_global");
    /// assert_eq!(
    ///     pt.output_path(Path::new("out"), ProfileKind::Rmsd),
    ///     Path::new("out/insitu-temp/rmsd/rmsd_insitu-temp_global.png")
    /// );
    /// ```
    pub fn output_path(&self, out_dir: &Path, kind: ProfileKind) -> PathBuf {
        let stem = self.file_template.replace(KIND_PLACEHOLDER, kind.as_ref());
        out_dir.join(format!("{}.png", stem))
    }
}

/// The in situ temperature and salinity profiles for every region.
///
/// Plot types are ordered by region, then variable.
pub fn default_plot_types(regions: &[Region]) -> Vec<PlotType> {
    regions
        .iter()
        .flat_map(|region| {
            ObsVariable::iter().map(move |var| {
                PlotType::new(
                    format!("{}_{}", var, region.name),
                    format!("{} ({})", var.label(), region.title),
                    vec![MaskKey::Variable(var), MaskKey::Region(region.id)],
                    format!(
                        "{var}/{p}/{p}_{var}_{region}",
                        var = var,
                        p = KIND_PLACEHOLDER,
                        region = region.name
                    ),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_plot_types() {
        let regions = vec![
            Region::new(RegionId(0), "global", "Global"),
            Region::new(RegionId(1), "np", "N. Pacific"),
        ];

        let pts = default_plot_types(&regions);
        assert_eq!(pts.len(), 4);

        assert_eq!(pts[0].name, "insitu-temp_global");
        assert_eq!(pts[0].title, "insitu T (Global)");
        assert_eq!(pts[0].file_template, "insitu-temp/#p#/#p#_insitu-temp_global");
        assert_eq!(
            pts[0].masks,
            vec![
                MaskKey::Variable(ObsVariable::Temperature),
                MaskKey::Region(RegionId(0))
            ]
        );

        assert_eq!(pts[3].title, "insitu S (N. Pacific)");
        assert_eq!(pts[3].masks[1], MaskKey::Region(RegionId(1)));
    }

    #[test]
    fn test_output_path() {
        let pts = default_plot_types(&[Region::new(RegionId(0), "global", "Global")]);

        assert_eq!(
            pts[1].output_path(Path::new("/tmp/plots"), ProfileKind::Bias),
            PathBuf::from("/tmp/plots/insitu-salt/bias/bias_insitu-salt_global.png")
        );
    }
}
