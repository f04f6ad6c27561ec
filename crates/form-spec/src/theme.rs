use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Theme key used for both input borders and placeholder text.
pub const PLACEHOLDER_COLOR_KEY: &str = "placeholder";

const DEFAULT_PLACEHOLDER_COLOR: &str = "#999999";
const DEFAULT_FALLBACK_COLOR: &str = "#888888";

/// Read-only key → color lookup supplied by the host.
pub trait Theme {
    fn color(&self, key: &str) -> String;
}

impl<F> Theme for F
where
    F: Fn(&str) -> String,
{
    fn color(&self, key: &str) -> String {
        self(key)
    }
}

/// Theme backed by a fixed color table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StaticTheme {
    #[serde(default)]
    pub colors: BTreeMap<String, String>,
    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK_COLOR.to_string()
}

impl StaticTheme {
    pub fn with_color(mut self, key: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(key.into(), color.into());
        self
    }
}

impl Default for StaticTheme {
    fn default() -> Self {
        Self {
            colors: BTreeMap::from([(
                PLACEHOLDER_COLOR_KEY.to_string(),
                DEFAULT_PLACEHOLDER_COLOR.to_string(),
            )]),
            fallback: default_fallback(),
        }
    }
}

impl Theme for StaticTheme {
    fn color(&self, key: &str) -> String {
        self.colors
            .get(key)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// Colors applied to one rendered control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlStyle {
    pub border_color: String,
    pub placeholder_color: String,
}

impl ControlStyle {
    pub fn resolve(theme: &dyn Theme) -> Self {
        Self {
            border_color: theme.color(PLACEHOLDER_COLOR_KEY),
            placeholder_color: theme.color(PLACEHOLDER_COLOR_KEY),
        }
    }
}
