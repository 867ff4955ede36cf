//! Layout Model
//!
//! Typed value objects for a generated page: an ordered [`Layout`] of [`Section`]s, each with
//! presentation attributes and an opaque row/column/module content tree. Order is
//! significant: rules inspect the first and last positions.

pub mod attributes;
pub mod content;
pub mod hasher;
pub mod ingest;
pub mod section;

pub use attributes::{
    AttentionLevel, EmotionalTone, NarrativeRole, Spacing, TypographyEmphasis, VisualContext,
    VisualDensity, VisualIntent, VisualScale,
};
pub use content::{Column, Module, Row};
pub use hasher::{layout_hash, Hash};
pub use section::{Background, Section};

use serde::{Deserialize, Serialize};

/// Ordered sequence of sections
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl Layout {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Section> {
        self.sections.iter()
    }

    /// Section ids in order; used to detect structural change between passes.
    pub fn order(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn patterns(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.pattern.as_str()).collect()
    }
}

impl From<Vec<Section>> for Layout {
    fn from(sections: Vec<Section>) -> Self {
        Self::new(sections)
    }
}
