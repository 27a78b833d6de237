//! Conversion defaults loaded from YAML.
//!
//! ```yaml
//! format: yuv10
//! matrix: rec2020      # omit to follow the SD/HD default
//! input_narrow: false
//! output_narrow: true
//! strict: false
//! ```
//!
//! Every key is optional. Command-line flags override whatever is loaded.

use std::path::{Path, PathBuf};

use sdi_color::RangePolicy;
use sdi_core::{ColorMatrix, DisplayMode, WireFormat};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::{DecodeOptions, EncodeOptions};
use crate::policy::resolve_matrix;

/// Result type for config loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Config loading failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML syntax or schema error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// File does not exist.
    #[error("config file not found: {path}")]
    NotFound {
        /// Path that was looked up
        path: PathBuf,
    },
}

/// Persisted conversion defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    /// Wire format for output
    pub format: WireFormat,
    /// Matrix override; `None` picks by geometry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matrix: Option<ColorMatrix>,
    /// Integer RGB input is narrow range
    pub input_narrow: bool,
    /// Wire codes are narrow range
    pub output_narrow: bool,
    /// Reject out-of-range input instead of clamping
    pub strict: bool,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            format: WireFormat::Yuv10,
            matrix: None,
            input_narrow: false,
            output_narrow: true,
            strict: false,
        }
    }
}

impl ConvertConfig {
    /// Reads a YAML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Parses YAML text. An empty document yields the defaults.
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serializes to YAML.
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Encode options for frames of `mode`.
    pub fn encode_options(&self, mode: DisplayMode) -> EncodeOptions {
        EncodeOptions {
            matrix: resolve_matrix(self.matrix, mode),
            input_narrow: self.input_narrow,
            output_narrow: self.output_narrow,
            policy: if self.strict { RangePolicy::Strict } else { RangePolicy::Clamp },
        }
    }

    /// Decode options for frames of `mode`, the inverse of [`encode_options`](Self::encode_options).
    pub fn decode_options(&self, mode: DisplayMode) -> DecodeOptions {
        DecodeOptions::from(self.encode_options(mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ConvertConfig::from_yaml_str("").unwrap();
        assert_eq!(cfg, ConvertConfig::default());
        let opts = cfg.encode_options(DisplayMode::Hd1080p25);
        assert_eq!(opts, EncodeOptions::default());
    }

    #[test]
    fn test_partial_document() {
        let cfg = ConvertConfig::from_yaml_str("matrix: rec2020\nstrict: true\n").unwrap();
        assert_eq!(cfg.format, WireFormat::Yuv10);
        let opts = cfg.encode_options(DisplayMode::Pal);
        assert_eq!(opts.matrix, ColorMatrix::Rec2020);
        assert_eq!(opts.policy, RangePolicy::Strict);
    }

    #[test]
    fn test_sd_default_matrix() {
        let cfg = ConvertConfig::from_yaml_str("format: rgb12").unwrap();
        assert_eq!(cfg.format, WireFormat::Rgb12);
        assert_eq!(cfg.encode_options(DisplayMode::Ntsc).matrix, ColorMatrix::Rec601);
        let dec = cfg.decode_options(DisplayMode::Ntsc);
        assert!(dec.input_narrow);
        assert!(!dec.output_narrow);
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            ConvertConfig::from_yaml_str("colour: rec709"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(ConvertConfig::from_yaml_str("format: nv12").is_err());
    }

    #[test]
    fn test_yaml_round_trip() {
        let cfg = ConvertConfig {
            matrix: Some(ColorMatrix::Rec601),
            ..Default::default()
        };
        let text = cfg.to_yaml().unwrap();
        assert_eq!(ConvertConfig::from_yaml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("convert.yaml");
        std::fs::write(&path, "format: yuv10\noutput_narrow: false\n").unwrap();
        let cfg = ConvertConfig::load(&path).unwrap();
        assert_eq!(cfg.format, WireFormat::Yuv10);
        assert!(!cfg.output_narrow);

        let empty = dir.path().join("empty.yaml");
        std::fs::write(&empty, "").unwrap();
        assert_eq!(ConvertConfig::load(&empty).unwrap(), ConvertConfig::default());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.yaml");
        match ConvertConfig::load(&missing) {
            Err(ConfigError::NotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }

        // a directory exists but cannot be read as text
        assert!(matches!(ConvertConfig::load(dir.path()), Err(ConfigError::Io(_))));

        let bad = dir.path().join("bad.yaml");
        std::fs::write(&bad, "format: [").unwrap();
        assert!(matches!(ConvertConfig::load(&bad), Err(ConfigError::Yaml(_))));
    }
}
