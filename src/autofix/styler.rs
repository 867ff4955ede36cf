//! Attribute styling collaborator.
//!
//! Stages decide *which* visual context a section gets; the styler decides what that means
//! for background and text colours. Swap in another [`ContextStyler`] to re-theme without
//! touching the rules.

use crate::layout::{Section, VisualContext};
use serde_json::Value;

pub trait ContextStyler: Send + Sync {
    /// Set `section` to `context`, deriving background and module text colours.
    fn apply(&self, section: &mut Section, context: VisualContext);

    /// Background colour a context implies when nothing explicit is set.
    fn default_background(&self, context: VisualContext) -> &str;

    /// Fallback tint for alternated LIGHT sections.
    fn alternation_tint(&self) -> &str;
}

/// House palette.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteStyler {
    pub light: String,
    pub dark: String,
    pub primary: String,
    pub text_on_light: String,
    pub text_on_strong: String,
    pub alternation: String,
}

impl Default for PaletteStyler {
    fn default() -> Self {
        Self {
            light: "#ffffff".to_string(),
            dark: "#1e293b".to_string(),
            primary: "#3b82f6".to_string(),
            text_on_light: "#1f2937".to_string(),
            text_on_strong: "#ffffff".to_string(),
            alternation: "#f9fafb".to_string(),
        }
    }
}

impl ContextStyler for PaletteStyler {
    fn apply(&self, section: &mut Section, context: VisualContext) {
        section.visual_context = Some(context);
        section.background.color = Some(self.default_background(context).to_string());
        section.background.kind = Some("color".to_string());
        if context != VisualContext::Light {
            section.background.use_alt = false;
        }

        let text = match context {
            VisualContext::Dark | VisualContext::Primary => &self.text_on_strong,
            _ => &self.text_on_light,
        };
        for row in &mut section.rows {
            for column in &mut row.columns {
                for module in &mut column.modules {
                    module
                        .attrs
                        .insert("text_color".to_string(), Value::String(text.clone()));
                }
            }
        }
    }

    fn default_background(&self, context: VisualContext) -> &str {
        match context {
            VisualContext::Dark => &self.dark,
            VisualContext::Primary => &self.primary,
            VisualContext::Light | VisualContext::Inherit => &self.light,
        }
    }

    fn alternation_tint(&self) -> &str {
        &self.alternation
    }
}
