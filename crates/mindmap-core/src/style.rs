//! Node styles and their global defaults.
//!
//! Every style field is independently overridable. Unset fields fall back to
//! the [`StyleDefaults`] supplied by the caller.

use serde::Deserialize;

/// Global fallback values for unset style fields.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    pub background_color: String,
    pub text_color: String,
    pub font_size: f32,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            text_color: "#333333".to_string(),
            font_size: 14.0,
        }
    }
}

/// Per-node style overrides.
///
/// # Examples
///
/// ```
/// use mindmap_core::style::{NodeStyle, StyleDefaults};
///
/// let defaults = StyleDefaults::default();
/// let style = NodeStyle::default().with_font_size(18.0);
///
/// assert_eq!(style.font_size_or(&defaults), 18.0);
/// assert_eq!(style.background_color_or(&defaults), "#ffffff");
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeStyle {
    background_color: Option<String>,
    text_color: Option<String>,
    font_size: Option<f32>,
}

impl NodeStyle {
    /// Style given to the root of an imported linked-record tree.
    pub fn root_theme() -> Self {
        Self::default()
            .with_background_color("#f0f9ff")
            .with_text_color("#0369a1")
            .with_font_size(16.0)
    }

    /// Style given to the direct children of an imported linked-record root.
    pub fn branch_theme() -> Self {
        Self::default()
            .with_background_color("#f0fdf4")
            .with_text_color("#166534")
            .with_font_size(14.0)
    }

    /// Style given to nodes created from a responder's answer.
    pub fn answer_theme() -> Self {
        Self::default()
            .with_background_color("#fef9c3")
            .with_text_color("#854d0e")
            .with_font_size(14.0)
    }

    /// Style with every field set from `defaults`.
    pub fn from_defaults(defaults: &StyleDefaults) -> Self {
        Self {
            background_color: Some(defaults.background_color.clone()),
            text_color: Some(defaults.text_color.clone()),
            font_size: Some(defaults.font_size),
        }
    }

    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn text_color(&self) -> Option<&str> {
        self.text_color.as_deref()
    }

    pub fn font_size(&self) -> Option<f32> {
        self.font_size
    }

    pub fn background_color_or<'a>(&'a self, defaults: &'a StyleDefaults) -> &'a str {
        self.background_color
            .as_deref()
            .unwrap_or(defaults.background_color.as_str())
    }

    pub fn text_color_or<'a>(&'a self, defaults: &'a StyleDefaults) -> &'a str {
        self.text_color.as_deref().unwrap_or(defaults.text_color.as_str())
    }

    pub fn font_size_or(&self, defaults: &StyleDefaults) -> f32 {
        self.font_size.unwrap_or(defaults.font_size)
    }

    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = Some(color.into());
        self
    }

    pub fn with_text_color(mut self, color: impl Into<String>) -> Self {
        self.text_color = Some(color.into());
        self
    }

    pub fn with_font_size(mut self, size: f32) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Returns this style with every field that `patch` sets overriding the
    /// current value.
    pub fn patched(&self, patch: &NodeStyle) -> Self {
        Self {
            background_color: patch
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            text_color: patch
                .text_color
                .clone()
                .or_else(|| self.text_color.clone()),
            font_size: patch.font_size.or(self.font_size),
        }
    }

    /// Returns this style with every unset field taken from `defaults`.
    pub fn filled(&self, defaults: &StyleDefaults) -> Self {
        NodeStyle::from_defaults(defaults).patched(self)
    }
}
