//! Metadata Extractor
//!
//! One linear pass over the sections producing the aggregate statistics every detector and
//! axis reads. Absent attributes fall back to the section defaults (LIGHT, NORMAL, medium,
//! focus), so extraction never fails.

use crate::catalog::{Category, CategoryCatalog};
use crate::layout::{
    AttentionLevel, EmotionalTone, Section, VisualContext, VisualDensity, VisualIntent,
    VisualScale,
};
use crate::narrative::{self, NarrativeValidation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use unicode_normalization::UnicodeNormalization;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub total: usize,
    pub dark_count: usize,
    pub primary_count: usize,
    /// Adjacent pairs of grid-category sections
    pub grid_pairs: usize,
    pub breathing_count: usize,
    /// Patterns of DARK sections that are not allowed to be DARK
    pub dark_misuse: Vec<String>,
    /// Patterns of PRIMARY sections that are not the final call-to-action
    pub primary_misuse: Vec<String>,
    pub final_cta_count: usize,
    pub final_cta_index: Option<usize>,
    pub hero_index: Option<usize>,
    pub intents: BTreeMap<VisualIntent, usize>,
    pub densities: BTreeMap<VisualDensity, usize>,
    pub max_dense_streak: usize,
    pub max_light_streak: usize,
    pub scales: BTreeMap<VisualScale, usize>,
    pub typography: BTreeMap<VisualScale, usize>,
    pub hero_scale: Option<VisualScale>,
    pub cta_scale: Option<VisualScale>,
    pub hero_typography: Option<VisualScale>,
    pub cta_typography: Option<VisualScale>,
    pub attention: BTreeMap<AttentionLevel, usize>,
    pub max_high_streak: usize,
    pub tones: BTreeSet<EmotionalTone>,
    pub first_urgency: Option<usize>,
    /// Grid-like sections holding a single-column row with more than two modules
    pub low_density_grids: Vec<usize>,
    pub hero_cta: Option<String>,
    pub final_cta: Option<String>,
    pub narrative: NarrativeValidation,
}

impl LayoutMetrics {
    pub fn intent_count(&self, intent: VisualIntent) -> usize {
        self.intents.get(&intent).copied().unwrap_or(0)
    }

    pub fn scale_count(&self, scale: VisualScale) -> usize {
        self.scales.get(&scale).copied().unwrap_or(0)
    }

    pub fn has_tone(&self, tone: EmotionalTone) -> bool {
        self.tones.contains(&tone)
    }

    /// Hero and final CTA labels are equal after NFKC folding and lowercasing.
    pub fn cta_duplicate(&self) -> bool {
        match (&self.hero_cta, &self.final_cta) {
            (Some(hero), Some(cta)) => fold_text(hero) == fold_text(cta),
            _ => false,
        }
    }
}

/// Index of the final-cta section that rules treat as *the* final call-to-action: the last
/// section when it is final-cta, otherwise the first final-cta section found.
pub fn canonical_final_cta(sections: &[Section], catalog: &CategoryCatalog) -> Option<usize> {
    match sections.last() {
        Some(last) if catalog.is_final_cta(&last.pattern) => Some(sections.len() - 1),
        _ => sections.iter().position(|s| catalog.is_final_cta(&s.pattern)),
    }
}

/// First button label found across hero-category sections, in page order.
pub fn hero_cta_text(sections: &[Section], catalog: &CategoryCatalog) -> Option<String> {
    sections
        .iter()
        .filter(|s| catalog.is_hero(&s.pattern))
        .find_map(|s| s.first_button_text())
        .map(str::to_string)
}

/// First button label of the canonical final call-to-action.
pub fn final_cta_text(sections: &[Section], catalog: &CategoryCatalog) -> Option<String> {
    canonical_final_cta(sections, catalog)
        .and_then(|i| sections[i].first_button_text())
        .map(str::to_string)
}

/// Compatibility folding for label comparison.
pub fn fold_text(text: &str) -> String {
    text.nfkc().collect::<String>().trim().to_lowercase()
}

/// True when the section holds a single-column row with more than two modules.
pub fn has_crowded_column(section: &Section) -> bool {
    section
        .rows
        .iter()
        .any(|row| row.columns.len() == 1 && row.columns[0].modules.len() > 2)
}

pub fn extract(sections: &[Section], catalog: &CategoryCatalog) -> LayoutMetrics {
    let mut dark_count = 0;
    let mut primary_count = 0;
    let mut grid_pairs = 0;
    let mut breathing_count = 0;
    let mut dark_misuse = Vec::new();
    let mut primary_misuse = Vec::new();
    let mut final_cta_count = 0;
    let mut hero_index = None;
    let mut intents = BTreeMap::new();
    let mut densities = BTreeMap::new();
    let mut scales = BTreeMap::new();
    let mut typography = BTreeMap::new();
    let mut attention = BTreeMap::new();
    let mut tones = BTreeSet::new();
    let mut first_urgency = None;
    let mut low_density_grids = Vec::new();

    let mut dense_streak = 0;
    let mut max_dense_streak = 0;
    let mut light_streak = 0;
    let mut max_light_streak = 0;
    let mut high_streak = 0;
    let mut max_high_streak = 0;
    let mut previous_category: Option<Category> = None;

    for (index, section) in sections.iter().enumerate() {
        let category = catalog.resolve_category(&section.pattern);

        match section.context() {
            VisualContext::Dark => {
                dark_count += 1;
                if catalog.dark_is_misuse(&section.pattern) {
                    dark_misuse.push(section.pattern.clone());
                }
            }
            VisualContext::Primary => {
                primary_count += 1;
                if category != Category::FinalCta {
                    primary_misuse.push(section.pattern.clone());
                }
            }
            _ => {}
        }

        if section.is_light() {
            light_streak += 1;
            max_light_streak = max_light_streak.max(light_streak);
        } else {
            light_streak = 0;
        }

        if category == Category::Grid && previous_category == Some(Category::Grid) {
            grid_pairs += 1;
        }
        previous_category = Some(category);

        match category {
            Category::Breathing => breathing_count += 1,
            Category::FinalCta => final_cta_count += 1,
            Category::Hero if hero_index.is_none() => hero_index = Some(index),
            _ => {}
        }
        if category.is_grid_like() && has_crowded_column(section) {
            low_density_grids.push(index);
        }

        if let Some(intent) = section.visual_intent {
            *intents.entry(intent).or_insert(0) += 1;
        }

        let density = section.density();
        *densities.entry(density).or_insert(0) += 1;
        if density == VisualDensity::Dense {
            dense_streak += 1;
            max_dense_streak = max_dense_streak.max(dense_streak);
        } else {
            dense_streak = 0;
        }

        *scales.entry(section.scale()).or_insert(0) += 1;
        *typography.entry(section.typography()).or_insert(0) += 1;

        let level = section.attention();
        *attention.entry(level).or_insert(0) += 1;
        if level == AttentionLevel::High {
            high_streak += 1;
            max_high_streak = max_high_streak.max(high_streak);
        } else {
            high_streak = 0;
        }

        let tone = section.tone();
        tones.insert(tone);
        if tone == EmotionalTone::Urgency && first_urgency.is_none() {
            first_urgency = Some(index);
        }
    }

    let final_cta_index = canonical_final_cta(sections, catalog);
    let hero = hero_index.map(|i| &sections[i]);
    let cta = final_cta_index.map(|i| &sections[i]);
    let roles = narrative::roles_of(sections, catalog);

    LayoutMetrics {
        total: sections.len(),
        dark_count,
        primary_count,
        grid_pairs,
        breathing_count,
        dark_misuse,
        primary_misuse,
        final_cta_count,
        final_cta_index,
        hero_index,
        intents,
        densities,
        max_dense_streak,
        max_light_streak,
        scales,
        typography,
        hero_scale: hero.map(Section::scale),
        cta_scale: cta.map(Section::scale),
        hero_typography: hero.map(Section::typography),
        cta_typography: cta.map(Section::typography),
        attention,
        max_high_streak,
        tones,
        first_urgency,
        low_density_grids,
        hero_cta: hero_cta_text(sections, catalog),
        final_cta: final_cta_text(sections, catalog),
        narrative: narrative::validate(&roles),
    }
}
