use crate::error::{CliError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileSearchConfig {
    pub stencil: Option<String>,
    pub direction: Option<[f64; 3]>,
    /// A stencil name, or `"none"` to disable the fallback search.
    pub fallback_stencil: Option<String>,
    pub min_path_length: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileNebConfig {
    pub images: Option<usize>,
    pub engine: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub search: Option<FileSearchConfig>,
    pub neb: Option<FileNebConfig>,
    /// Covalent radius overrides, element symbol to Angstroms.
    pub radii: Option<BTreeMap<String, f64>>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_all_sections() {
        let config: FileConfig = toml::from_str(
            r#"
            [search]
            stencil = "fixed-single"
            direction = [0.0, 0.0, -1.0]
            fallback-stencil = "none"
            min-path-length = 3

            [neb]
            images = 16
            engine = "ForceField"

            [radii]
            O = 0.7
            "#,
        )
        .unwrap();

        let search = config.search.unwrap();
        assert_eq!(search.stencil.as_deref(), Some("fixed-single"));
        assert_eq!(search.direction, Some([0.0, 0.0, -1.0]));
        assert_eq!(search.fallback_stencil.as_deref(), Some("none"));
        assert_eq!(search.min_path_length, Some(3));
        assert_eq!(config.neb.unwrap().images, Some(16));
        assert_eq!(config.radii.unwrap().get("O"), Some(&0.7));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[search]\nstencils = \"axis-6\"\n").unwrap();
        assert!(matches!(
            FileConfig::from_file(&path),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = FileConfig::from_file(Path::new("no_such_mofneb_config.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
