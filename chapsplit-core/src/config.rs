//! Style configuration for automatic chapter detection
//!
//! The configuration file is plain text with one `KEY: value` pair per line.
//! Lines without a colon and lines starting with `#` are ignored, so the
//! file can double as a Markdown note:
//!
//! ```text
//! # Chapter detection
//! CHAPTER_KEYWORD: Chapter
//! MIN_FONT_SIZE: 16
//! MUST_BE_BOLD: true
//! ```

use crate::error::ConfigError;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

/// Default configuration file name, looked up next to the executable
pub const CONFIG_FILE_NAME: &str = "chapters_config.md";

/// Default heading keyword
pub const DEFAULT_KEYWORD: &str = "Chapter";

/// Default minimum heading size in points
pub const DEFAULT_MIN_FONT_SIZE: f32 = 16.0;

/// Default bold requirement
pub const DEFAULT_MUST_BE_BOLD: bool = true;

const KEY_KEYWORD: &str = "CHAPTER_KEYWORD";
const KEY_MIN_FONT_SIZE: &str = "MIN_FONT_SIZE";
const KEY_MUST_BE_BOLD: &str = "MUST_BE_BOLD";

/// Detection thresholds loaded from the configuration file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleConfig {
    /// `CHAPTER_KEYWORD`
    pub chapter_keyword: Option<String>,

    /// `MIN_FONT_SIZE`
    pub min_font_size: Option<f32>,

    /// `MUST_BE_BOLD`
    pub must_be_bold: Option<bool>,

    /// Unrecognized keys, kept verbatim
    pub extra: BTreeMap<String, String>,
}

impl StyleConfig {
    /// Load the configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let config = Self::parse(&content)?;
        log::debug!("Loaded style configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (index, line) in content.lines().enumerate() {
            if line.trim_start().starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());

            match key {
                KEY_MIN_FONT_SIZE => {
                    let size = value
                        .parse::<f32>()
                        .map_err(|_| ConfigError::InvalidNumber {
                            key: key.to_string(),
                            value: value.to_string(),
                            line: index + 1,
                        })?;
                    config.min_font_size = Some(size);
                }
                KEY_MUST_BE_BOLD => {
                    config.must_be_bold = Some(value.eq_ignore_ascii_case("true"));
                }
                KEY_KEYWORD => {
                    config.chapter_keyword = Some(value.to_string());
                }
                _ => {
                    config.extra.insert(key.to_string(), value.to_string());
                }
            }
        }

        Ok(config)
    }

    /// Heading keyword, defaulting to `Chapter`
    pub fn keyword(&self) -> &str {
        self.chapter_keyword.as_deref().unwrap_or(DEFAULT_KEYWORD)
    }

    /// Minimum heading size, defaulting to 16pt
    pub fn min_font_size(&self) -> f32 {
        self.min_font_size.unwrap_or(DEFAULT_MIN_FONT_SIZE)
    }

    /// Whether headings must use a bold font, defaulting to `true`
    pub fn must_be_bold(&self) -> bool {
        self.must_be_bold.unwrap_or(DEFAULT_MUST_BE_BOLD)
    }
}
