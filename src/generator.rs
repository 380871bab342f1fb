use crate::format;
use regex::{Captures, Regex};
use std::fmt;
use std::ops::Deref;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub tokens: Vec<String>,
    pub default_theme: String,
    pub themes: Vec<Theme>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub name: String,
    pub colors: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataEntry {
    pub name: String,
    pub role: Vec<String>,
    pub alias: Option<String>,
    pub deprecated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub theme_maps: ScssOutput,
    pub tokens: ScssOutput,
    pub mixins: ScssOutput,
    pub token_count: usize,
    pub theme_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScssOutput(String);

impl ScssOutput {
    pub fn new(scss: String) -> Self {
        Self(scss)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for ScssOutput {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for ScssOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl From<String> for ScssOutput {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<ScssOutput> for String {
    fn from(value: ScssOutput) -> Self {
        value.0
    }
}

const GENERATED_BANNER: &str = "\
// Code generated by irontheme. DO NOT EDIT.
//
// This file is licensed under the MIT license. It is regenerated on every
// run; changes made by hand will be lost.
";

pub fn generate(
    config: &GeneratorConfig,
    mut metadata: Vec<MetadataEntry>,
) -> Result<GenerationResult, GenerateError> {
    normalize_metadata(&mut metadata, &config.tokens);

    let theme_maps = assemble(&theme_maps_body(config), false)?;
    let tokens = assemble(&token_declarations_body(config, &metadata), false)?;
    let mixins = assemble(&theme_mixin_body(config), true)?;

    Ok(GenerationResult {
        theme_maps,
        tokens,
        mixins,
        token_count: config.tokens.len(),
        theme_count: config.themes.len(),
    })
}

pub fn format_token_name(token: &str) -> String {
    let mut formatted = String::with_capacity(token.len() + 4);
    let mut prev: Option<char> = None;
    for ch in token.chars() {
        let breaks = match prev {
            None => false,
            Some(p) => {
                (ch.is_ascii_uppercase() && !p.is_ascii_uppercase() && p != '-')
                    || (ch.is_ascii_digit() && !p.is_ascii_digit() && p != '-')
            }
        };
        if breaks {
            formatted.push('-');
        }
        formatted.push(ch.to_ascii_lowercase());
        prev = Some(ch);
    }
    formatted
}

pub fn normalize_metadata(entries: &mut [MetadataEntry], known_tokens: &[String]) {
    let matcher = token_matcher(known_tokens);

    for entry in entries.iter_mut() {
        if let Some(matcher) = matcher.as_ref() {
            let own_name = entry.name.clone();
            for text in entry.role.iter_mut() {
                let rewritten = matcher
                    .replace_all(text.as_str(), |caps: &Captures<'_>| {
                        let matched = caps[0].to_string();
                        if caps.get(1).is_some() || matched == own_name {
                            matched
                        } else {
                            format!("`${}`", format_token_name(&matched))
                        }
                    })
                    .into_owned();
                *text = rewritten;
            }
        }
        if let Some(alias) = entry.alias.as_mut() {
            *alias = format_token_name(alias);
        }
    }
}

// Longest identifier first so an identifier embedded in a longer one never
// wins; the optional backtick-sigil prefix keeps already-rewritten
// references stable across repeated runs.
fn token_matcher(known_tokens: &[String]) -> Option<Regex> {
    if known_tokens.is_empty() {
        return None;
    }
    let mut sorted: Vec<&String> = known_tokens.iter().collect();
    sorted.sort_by(|left, right| right.len().cmp(&left.len()).then_with(|| left.cmp(right)));
    let alternation = sorted
        .iter()
        .map(|token| regex::escape(token))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(`\$)?\b(?:{})\b", alternation)).ok()
}

fn theme_maps_body(config: &GeneratorConfig) -> String {
    let mut body = String::new();
    for theme in &config.themes {
        push_sassdoc_block(&mut body, &format!("{} theme", theme.name), "Map");
        body.push_str(&format!("$theme--{}: (\n", format_token_name(&theme.name)));
        for (token, value) in &theme.colors {
            body.push_str(&format!("  {}: {},\n", format_token_name(token), value));
        }
        body.push_str(") !default;\n\n");
    }
    push_sassdoc_block(&mut body, "Default theme", "Map");
    body.push_str(&format!(
        "$theme: $theme--{} !default;\n",
        format_token_name(&config.default_theme)
    ));
    body
}

fn token_declarations_body(config: &GeneratorConfig, metadata: &[MetadataEntry]) -> String {
    let mut body = String::new();
    for (index, token) in config.tokens.iter().enumerate() {
        if index > 0 {
            body.push('\n');
        }
        let entry = metadata.iter().find(|entry| entry.name == *token);
        if let Some(entry) = entry {
            if !entry.role.is_empty() {
                body.push_str(&format!("/// {}\n", entry.role.join("; ")));
            }
        }
        body.push_str("/// @type Color\n/// @access public\n/// @group irontheme\n");
        if let Some(entry) = entry {
            if let Some(alias) = entry.alias.as_ref() {
                body.push_str(&format!("/// @alias {}\n", alias));
            }
            if entry.deprecated {
                body.push_str("/// @deprecated\n");
            }
        }
        let name = format_token_name(token);
        body.push_str(&format!(
            "${}: map-get($theme, '{}') !default;\n",
            name, name
        ));
    }
    body
}

fn theme_mixin_body(config: &GeneratorConfig) -> String {
    let mut body = String::new();
    body.push_str("/// Rebinds each color token variable to its value in the supplied theme\n");
    body.push_str("/// map, exposes the rebound values to the wrapped content, then restores\n");
    body.push_str("/// the default theme.\n");
    body.push_str("/// @param {Map} $theme-map [$theme] - theme map to apply\n");
    body.push_str("/// @access public\n/// @group irontheme\n");
    body.push_str("@mixin apply-theme($theme-map: $theme) {\n");
    for token in &config.tokens {
        let name = format_token_name(token);
        body.push_str(&format!(
            "  ${}: map-get($theme-map, '{}') !global;\n",
            name, name
        ));
    }
    body.push_str("\n  @content;\n\n");
    body.push_str("  @if $theme-map != $theme {\n    @include apply-theme();\n  }\n}\n");
    body
}

fn push_sassdoc_block(body: &mut String, title: &str, type_name: &str) {
    body.push_str(&format!("/// {}\n", title));
    body.push_str(&format!("/// @type {}\n", type_name));
    body.push_str("/// @access public\n/// @group irontheme\n");
}

fn assemble(body: &str, import_maps: bool) -> Result<ScssOutput, GenerateError> {
    let mut artifact = String::from(GENERATED_BANNER);
    artifact.push('\n');
    if import_maps {
        artifact.push_str("@import 'theme-maps';\n\n");
    }
    artifact.push_str(body);

    let formatted = format::format_scss(&artifact).map_err(|err| GenerateError {
        message: format!("failed to format generated stylesheet: {}", err.message),
    })?;
    Ok(ScssOutput::new(formatted))
}
