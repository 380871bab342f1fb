use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::generator::{GeneratorConfig, MetadataEntry, Theme};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub default_theme: String,
    #[serde(default)]
    pub tokens: Vec<String>,
    #[serde(default)]
    pub themes: Vec<ThemeTable>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ThemeTable {
    pub name: String,
    #[serde(default)]
    pub colors: toml::Table,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataError {
    pub message: String,
}

pub fn load(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|err| ConfigError {
        message: format!("failed to read config {}: {}", path.display(), err),
    })?;
    toml::from_str(&text).map_err(|err| ConfigError {
        message: format!("failed to parse config {}: {}", path.display(), err),
    })
}

pub fn resolve(config: &Config) -> Result<GeneratorConfig, ConfigError> {
    if config.tokens.is_empty() {
        return Err(ConfigError {
            message: "config must list at least one color token".to_string(),
        });
    }

    let mut themes = Vec::with_capacity(config.themes.len());
    for theme in &config.themes {
        let mut colors = Vec::with_capacity(theme.colors.len());
        for (token, value) in &theme.colors {
            match value {
                toml::Value::String(color) => colors.push((token.clone(), color.clone())),
                other => {
                    return Err(ConfigError {
                        message: format!(
                            "theme {} color {} must be a string, found {}",
                            theme.name,
                            token,
                            other.type_str()
                        ),
                    });
                }
            }
        }
        themes.push(Theme {
            name: theme.name.clone(),
            colors,
        });
    }

    if !themes.iter().any(|theme| theme.name == config.default_theme) {
        return Err(ConfigError {
            message: format!(
                "default theme {} is not defined in the theme collection",
                config.default_theme
            ),
        });
    }

    Ok(GeneratorConfig {
        tokens: config.tokens.clone(),
        default_theme: config.default_theme.clone(),
        themes,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    tokens: Vec<MetadataTable>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
struct MetadataTable {
    name: String,
    #[serde(default)]
    role: Vec<String>,
    alias: Option<String>,
    #[serde(default)]
    deprecated: bool,
}

pub fn load_metadata(path: &Path) -> Result<Vec<MetadataEntry>, MetadataError> {
    let text = fs::read_to_string(path).map_err(|err| MetadataError {
        message: format!("failed to read metadata {}: {}", path.display(), err),
    })?;
    let file: MetadataFile = toml::from_str(&text).map_err(|err| MetadataError {
        message: format!("failed to parse metadata {}: {}", path.display(), err),
    })?;
    Ok(file
        .tokens
        .into_iter()
        .map(|table| MetadataEntry {
            name: table.name,
            role: table.role,
            alias: table.alias,
            deprecated: table.deprecated,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::{load, load_metadata, resolve};
    use std::fs;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[test]
    fn loads_toml_config() {
        let path = temp_path("irontheme_config");
        let _ = fs::write(
            &path,
            r##"
default_theme = "white"
tokens = ["interactive01"]

[[themes]]
name = "white"
[themes.colors]
interactive01 = "#0f62fe"
"##,
        );
        let config = load(&path).expect("config should parse");
        assert_eq!(config.default_theme, "white");
        assert_eq!(config.tokens, vec!["interactive01".to_string()]);
        assert_eq!(config.themes.len(), 1);
        assert_eq!(config.themes[0].name, "white");
    }

    #[test]
    fn preserves_theme_and_color_order() {
        let path = temp_path("irontheme_config_order");
        let _ = fs::write(
            &path,
            r##"
default_theme = "white"
tokens = ["uiBackground", "interactive01"]

[[themes]]
name = "white"
[themes.colors]
uiBackground = "#ffffff"
interactive01 = "#0f62fe"

[[themes]]
name = "g90"
[themes.colors]
interactive01 = "#4589ff"
uiBackground = "#262626"
"##,
        );
        let config = load(&path).expect("config should parse");
        let resolved = resolve(&config).expect("config should resolve");
        assert_eq!(resolved.themes[0].name, "white");
        assert_eq!(resolved.themes[1].name, "g90");
        assert_eq!(resolved.themes[0].colors[0].0, "uiBackground");
        assert_eq!(resolved.themes[0].colors[1].0, "interactive01");
        assert_eq!(resolved.themes[1].colors[0].0, "interactive01");
        assert_eq!(resolved.themes[1].colors[1].0, "uiBackground");
    }

    #[test]
    fn rejects_non_string_color_values() {
        let path = temp_path("irontheme_config_bad_color");
        let _ = fs::write(
            &path,
            r##"
default_theme = "white"
tokens = ["interactive01"]

[[themes]]
name = "white"
[themes.colors]
interactive01 = 42
"##,
        );
        let config = load(&path).expect("config should parse");
        let err = resolve(&config).expect_err("resolve should fail");
        assert!(err.message.contains("must be a string"));
    }

    #[test]
    fn rejects_unknown_default_theme() {
        let path = temp_path("irontheme_config_bad_default");
        let _ = fs::write(
            &path,
            r##"
default_theme = "carbon"
tokens = ["interactive01"]

[[themes]]
name = "white"
[themes.colors]
interactive01 = "#0f62fe"
"##,
        );
        let config = load(&path).expect("config should parse");
        let err = resolve(&config).expect_err("resolve should fail");
        assert!(err.message.contains("default theme carbon"));
    }

    #[test]
    fn rejects_empty_token_list() {
        let path = temp_path("irontheme_config_no_tokens");
        let _ = fs::write(
            &path,
            r##"
default_theme = "white"

[[themes]]
name = "white"
"##,
        );
        let config = load(&path).expect("config should parse");
        let err = resolve(&config).expect_err("resolve should fail");
        assert!(err.message.contains("at least one color token"));
    }

    #[test]
    fn loads_metadata_with_defaults() {
        let path = temp_path("irontheme_metadata");
        let _ = fs::write(
            &path,
            r##"
[[tokens]]
name = "interactive01"
role = ["Primary interactive color"]

[[tokens]]
name = "uiBackground"
alias = "interactive01"
deprecated = true
"##,
        );
        let metadata = load_metadata(&path).expect("metadata should parse");
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata[0].name, "interactive01");
        assert_eq!(metadata[0].role, vec!["Primary interactive color".to_string()]);
        assert_eq!(metadata[0].alias, None);
        assert!(!metadata[0].deprecated);
        assert_eq!(metadata[1].alias.as_deref(), Some("interactive01"));
        assert!(metadata[1].deprecated);
    }

    #[test]
    fn reports_metadata_parse_failure() {
        let path = temp_path("irontheme_metadata_broken");
        let _ = fs::write(&path, "tokens = not toml");
        let err = load_metadata(&path).expect_err("metadata should fail to parse");
        assert!(err.message.contains("failed to parse metadata"));
    }

    #[test]
    fn reports_missing_metadata_file() {
        let path = temp_path("irontheme_metadata_missing");
        let err = load_metadata(&path).expect_err("metadata should fail to load");
        assert!(err.message.contains("failed to read metadata"));
    }

    fn temp_path(prefix: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("{}_{}.toml", prefix, nanos))
    }
}
