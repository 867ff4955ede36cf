//! Section: one content block with its presentation attributes.
//!
//! Attributes that may be absent in generated input are `Option`s. Readers use the
//! defaulting accessors (`context`, `density`, `attention`, `tone`) so an absent value never
//! aborts a rule.

use super::attributes::{
    AttentionLevel, EmotionalTone, NarrativeRole, Spacing, TypographyEmphasis, VisualContext,
    VisualDensity, VisualIntent, VisualScale,
};
use super::content::{Module, Row};
use serde::{Deserialize, Serialize};

/// Background styling owned by the styling collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Background {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Background type, e.g. `color`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Alternate-tint flag used to break up runs of LIGHT sections
    #[serde(default)]
    pub use_alt: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Section {
    #[serde(default)]
    pub id: String,
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_context: Option<VisualContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_intent: Option<VisualIntent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_density: Option<VisualDensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_scale: Option<VisualScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography_scale: Option<VisualScale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub typography_emphasis: Option<TypographyEmphasis>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative_role: Option<NarrativeRole>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotional_tone: Option<EmotionalTone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attention_level: Option<AttentionLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_spacing: Option<Spacing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_spacing: Option<Spacing>,
    #[serde(default)]
    pub background: Background,
    /// Vertical padding in pixels
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<u32>,
    /// Inserted by narrative correction rather than generated
    #[serde(default)]
    pub placeholder: bool,
    /// Fix rules that touched this section
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub autofix_tags: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Row>,
}

impl Section {
    pub fn new(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            pattern: pattern.into(),
            ..Default::default()
        }
    }

    pub fn with_context(mut self, context: VisualContext) -> Self {
        self.visual_context = Some(context);
        self
    }

    pub fn with_role(mut self, role: NarrativeRole) -> Self {
        self.narrative_role = Some(role);
        self
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.rows = rows;
        self
    }

    pub fn context(&self) -> VisualContext {
        self.visual_context.unwrap_or_default()
    }

    pub fn density(&self) -> VisualDensity {
        self.visual_density.unwrap_or(VisualDensity::Normal)
    }

    pub fn attention(&self) -> AttentionLevel {
        self.attention_level.unwrap_or(AttentionLevel::Medium)
    }

    pub fn tone(&self) -> EmotionalTone {
        self.emotional_tone.unwrap_or(EmotionalTone::Focus)
    }

    pub fn scale(&self) -> VisualScale {
        self.visual_scale.unwrap_or(VisualScale::Md)
    }

    pub fn typography(&self) -> VisualScale {
        self.typography_scale.unwrap_or(VisualScale::Md)
    }

    pub fn is_light(&self) -> bool {
        self.context() == VisualContext::Light
    }

    pub fn modules(&self) -> impl Iterator<Item = &Module> {
        self.rows.iter().flat_map(|r| r.modules())
    }

    pub fn module_count(&self) -> usize {
        self.modules().count()
    }

    /// Text of the first button module, in document order.
    pub fn first_button_text(&self) -> Option<&str> {
        self.modules()
            .find(|m| m.is("button"))
            .and_then(|m| m.text_attr("text"))
    }

    pub fn tag(&mut self, rule: &str) {
        if !self.autofix_tags.iter().any(|t| t == rule) {
            self.autofix_tags.push(rule.to_string());
        }
    }
}
