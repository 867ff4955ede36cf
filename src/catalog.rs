//! Category Catalog
//!
//! Static lookup tables that drive every rule and fix stage: pattern → category, visual
//! intent, density, narrative role and emotional profile, plus the light-only and
//! dark-allowed category sets. The tables are data: the house defaults live in
//! [`defaults`], and configuration may add exact entries on top.
//!
//! Every table resolves a pattern id the same way: exact id, then base id (variant suffix
//! stripped), then the first matching prioritized predicate, then the table's fallback.

mod defaults;
pub mod table;

pub use table::{base_pattern, Matcher, PatternTable};

use crate::layout::{AttentionLevel, EmotionalTone, NarrativeRole, VisualDensity, VisualIntent};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

string_enum! {
    /// Pattern family a section belongs to.
    pub enum Category {
        Hero => "hero",
        Problem => "problem",
        Features => "features",
        Grid => "grid",
        Services => "services",
        Benefits => "benefits",
        Zigzag => "zigzag",
        TrustMetrics => "trust_metrics",
        Testimonial => "testimonial",
        SocialProof => "social_proof",
        Pricing => "pricing",
        Faq => "faq",
        Tabs => "tabs",
        Disclosure => "disclosure",
        Comparison => "comparison",
        HowItWorks => "how_it_works",
        Contact => "contact",
        Newsletter => "newsletter",
        Team => "team",
        About => "about",
        Gallery => "gallery",
        Portfolio => "portfolio",
        Blog => "blog",
        Breathing => "breathing_space",
        VisualBridge => "visual_bridge",
        Divider => "divider",
        Footer => "footer",
        FinalCta => "final_cta",
        Other => "other",
    }
}

impl Category {
    /// Card-grid families whose single-column rows can be split.
    pub fn is_grid_like(&self) -> bool {
        matches!(
            self,
            Category::Grid
                | Category::Features
                | Category::Services
                | Category::Team
                | Category::Gallery
                | Category::Portfolio
                | Category::Blog
        )
    }

    /// Trust or testimonial content.
    pub fn is_social_proof(&self) -> bool {
        matches!(self, Category::TrustMetrics | Category::Testimonial)
    }
}

/// Emotional tone and attention level assigned together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmotionProfile {
    pub tone: EmotionalTone,
    pub attention: AttentionLevel,
}

impl EmotionProfile {
    pub const fn new(tone: EmotionalTone, attention: AttentionLevel) -> Self {
        Self { tone, attention }
    }
}

/// Exact-entry additions and set replacements loaded from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogOverrides {
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,
    #[serde(default)]
    pub intents: BTreeMap<String, VisualIntent>,
    #[serde(default)]
    pub densities: BTreeMap<String, VisualDensity>,
    #[serde(default)]
    pub roles: BTreeMap<String, NarrativeRole>,
    #[serde(default)]
    pub emotions: BTreeMap<String, EmotionProfile>,
    #[serde(default)]
    pub light_only: Option<Vec<Category>>,
    #[serde(default)]
    pub dark_allowed: Option<Vec<Category>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCatalog {
    categories: PatternTable<Category>,
    intents: PatternTable<VisualIntent>,
    densities: PatternTable<VisualDensity>,
    roles: PatternTable<NarrativeRole>,
    emotions: PatternTable<EmotionProfile>,
    light_only: BTreeSet<Category>,
    dark_allowed: BTreeSet<Category>,
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self {
            categories: defaults::categories(),
            intents: defaults::intents(),
            densities: defaults::densities(),
            roles: defaults::roles(),
            emotions: defaults::emotions(),
            light_only: defaults::LIGHT_ONLY.iter().copied().collect(),
            dark_allowed: defaults::DARK_ALLOWED.iter().copied().collect(),
        }
    }
}

impl CategoryCatalog {
    /// House tables with configured additions applied.
    pub fn with_overrides(mut self, overrides: &CatalogOverrides) -> Self {
        for (pattern, value) in &overrides.categories {
            self.categories.insert_exact(pattern, *value);
        }
        for (pattern, value) in &overrides.intents {
            self.intents.insert_exact(pattern, *value);
        }
        for (pattern, value) in &overrides.densities {
            self.densities.insert_exact(pattern, *value);
        }
        for (pattern, value) in &overrides.roles {
            self.roles.insert_exact(pattern, *value);
        }
        for (pattern, value) in &overrides.emotions {
            self.emotions.insert_exact(pattern, *value);
        }
        if let Some(light_only) = &overrides.light_only {
            self.light_only = light_only.iter().copied().collect();
        }
        if let Some(dark_allowed) = &overrides.dark_allowed {
            self.dark_allowed = dark_allowed.iter().copied().collect();
        }
        self
    }

    pub fn resolve_category(&self, pattern: &str) -> Category {
        self.categories.lookup(pattern)
    }

    pub fn intent_for(&self, pattern: &str) -> VisualIntent {
        self.intents.lookup(pattern)
    }

    pub fn density_for(&self, pattern: &str) -> VisualDensity {
        self.densities.lookup(pattern)
    }

    pub fn role_for(&self, pattern: &str) -> NarrativeRole {
        self.roles.lookup(pattern)
    }

    pub fn emotion_for(&self, pattern: &str) -> EmotionProfile {
        self.emotions.lookup(pattern)
    }

    pub fn is_final_cta(&self, pattern: &str) -> bool {
        self.resolve_category(pattern) == Category::FinalCta
    }

    pub fn is_hero(&self, pattern: &str) -> bool {
        self.resolve_category(pattern) == Category::Hero
    }

    pub fn is_trust(&self, pattern: &str) -> bool {
        self.resolve_category(pattern) == Category::TrustMetrics
    }

    pub fn is_light_only(&self, pattern: &str) -> bool {
        self.light_only.contains(&self.resolve_category(pattern))
    }

    pub fn is_dark_allowed(&self, pattern: &str) -> bool {
        self.dark_allowed.contains(&self.resolve_category(pattern))
    }

    /// DARK is misused on light-only categories and on any unlisted category except the
    /// final call-to-action.
    pub fn dark_is_misuse(&self, pattern: &str) -> bool {
        let category = self.resolve_category(pattern);
        self.light_only.contains(&category)
            || (!self.dark_allowed.contains(&category) && category != Category::FinalCta)
    }
}
