//! Five independent axes, each clamped to 0..=5, summed and clamped to 0..=25.

use super::metadata::{fold_text, LayoutMetrics};
use crate::catalog::{Category, CategoryCatalog};
use crate::layout::{Section, VisualContext, VisualDensity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub const AXIS_MAX: i32 = 5;
pub const TOTAL_MAX: u8 = 25;

const GENERIC_HEADINGS: [&str; 4] = ["welcome", "about us", "our services", "contact"];
const LOW_COMMITMENT: [&str; 6] = ["explore", "learn", "see", "discover", "view", "how it works"];
const HIGH_COMMITMENT: [&str; 8] = [
    "trial",
    "buy",
    "start",
    "sign up",
    "get started",
    "subscribe",
    "purchase",
    "order",
];
const UNIT_SUFFIXES: [&str; 7] = ["%", "+", "K", "M", "★", "k", "m"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityStatus {
    Excellent,
    Good,
    Acceptable,
    Reject,
}

impl QualityStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            21..=u8::MAX => QualityStatus::Excellent,
            16..=20 => QualityStatus::Good,
            11..=15 => QualityStatus::Acceptable,
            _ => QualityStatus::Reject,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityStatus::Excellent => "EXCELLENT",
            QualityStatus::Good => "GOOD",
            QualityStatus::Acceptable => "ACCEPTABLE",
            QualityStatus::Reject => "REJECT",
        }
    }
}

impl fmt::Display for QualityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub rhythm: u8,
    pub hierarchy: u8,
    pub contrast: u8,
    pub content: u8,
    pub conversion: u8,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u8 {
        let sum = self.rhythm as u16
            + self.hierarchy as u16
            + self.contrast as u16
            + self.content as u16
            + self.conversion as u16;
        sum.min(TOTAL_MAX as u16) as u8
    }

    pub fn axes(&self) -> [(&'static str, u8); 5] {
        [
            ("rhythm", self.rhythm),
            ("hierarchy", self.hierarchy),
            ("contrast", self.contrast),
            ("content", self.content),
            ("conversion", self.conversion),
        ]
    }
}

fn clamp_axis(score: i32) -> u8 {
    score.clamp(0, AXIS_MAX) as u8
}

pub fn score(
    sections: &[Section],
    metrics: &LayoutMetrics,
    catalog: &CategoryCatalog,
) -> ScoreBreakdown {
    ScoreBreakdown {
        rhythm: rhythm(sections, metrics, catalog),
        hierarchy: hierarchy(sections, metrics, catalog),
        contrast: contrast(sections, metrics, catalog),
        content: content(sections, catalog),
        conversion: conversion(sections, metrics, catalog),
    }
}

fn rhythm(sections: &[Section], metrics: &LayoutMetrics, catalog: &CategoryCatalog) -> u8 {
    let mut score = 2;
    if metrics.breathing_count > 0 {
        score += 1;
    }

    let densities: Vec<VisualDensity> = sections
        .iter()
        .map(|s| catalog.density_for(&s.pattern))
        .collect();
    if has_dense_sparse_dense(&densities) {
        score += 1;
    }
    if max_run(&densities, VisualDensity::Dense) >= 2 {
        score -= 1;
    }
    if metrics.max_light_streak > 3 {
        score -= 2;
    }
    clamp_axis(score)
}

/// A dense section, later a sparse one, later another dense one.
fn has_dense_sparse_dense(densities: &[VisualDensity]) -> bool {
    let mut dense_seen = false;
    let mut sparse_after_dense = false;
    for density in densities {
        match density {
            VisualDensity::Dense if sparse_after_dense => return true,
            VisualDensity::Dense => dense_seen = true,
            VisualDensity::Sparse if dense_seen => sparse_after_dense = true,
            _ => {}
        }
    }
    false
}

fn max_run(densities: &[VisualDensity], target: VisualDensity) -> usize {
    let mut run = 0;
    let mut best = 0;
    for density in densities {
        if *density == target {
            run += 1;
            best = best.max(run);
        } else {
            run = 0;
        }
    }
    best
}

fn hierarchy(sections: &[Section], metrics: &LayoutMetrics, catalog: &CategoryCatalog) -> u8 {
    let mut score = 0;
    if sections.first().map_or(false, |s| catalog.is_hero(&s.pattern)) {
        score += 1;
    }
    if sections.last().map_or(false, |s| catalog.is_final_cta(&s.pattern)) {
        score += 1;
    }
    if sections
        .iter()
        .any(|s| catalog.resolve_category(&s.pattern).is_social_proof())
    {
        score += 1;
    }
    if metrics.hero_cta.is_some() && metrics.final_cta.is_some() && !metrics.cta_duplicate() {
        score += 1;
    }
    if !sections.windows(2).any(|w| w[0].pattern == w[1].pattern) {
        score += 1;
    }
    clamp_axis(score)
}

fn contrast(sections: &[Section], metrics: &LayoutMetrics, catalog: &CategoryCatalog) -> u8 {
    let mut score = 0;
    if sections
        .iter()
        .any(|s| catalog.is_trust(&s.pattern) && s.context() == VisualContext::Dark)
    {
        score += 2;
    }

    // LIGHT with the alternation flag counts as its own bucket.
    let buckets: Vec<(VisualContext, bool)> = sections
        .iter()
        .map(|s| (s.context(), s.is_light() && s.background.use_alt))
        .collect();
    if buckets.windows(2).any(|w| w[0] != w[1]) {
        score += 1;
    }

    if metrics.primary_count == 1 && metrics.primary_misuse.is_empty() {
        score += 2;
    }
    clamp_axis(score)
}

fn content(sections: &[Section], catalog: &CategoryCatalog) -> u8 {
    let mut score = 3;

    let generic_heading = sections.iter().flat_map(Section::modules).any(|m| {
        m.is("heading")
            && m.text_attr("text")
                .map_or(false, |t| GENERIC_HEADINGS.contains(&fold_text(t).as_str()))
    });
    if generic_heading {
        score -= 1;
    }

    let mut icons: HashMap<&str, usize> = HashMap::new();
    for module in sections.iter().flat_map(Section::modules) {
        if module.is("blurb") {
            if let Some(icon) = module.text_attr("font_icon") {
                *icons.entry(icon).or_insert(0) += 1;
            }
        }
    }
    if icons.values().any(|count| *count > 3) {
        score -= 1;
    }

    let incomplete_testimonial = sections
        .iter()
        .filter(|s| catalog.resolve_category(&s.pattern) == Category::Testimonial)
        .flat_map(Section::modules)
        .any(|m| {
            m.is("testimonial")
                && ["author", "job_title", "company"]
                    .iter()
                    .any(|key| m.text_attr(key).is_none())
        });
    if incomplete_testimonial {
        score -= 1;
    }

    let suffixed_counter = sections
        .iter()
        .filter(|s| catalog.is_trust(&s.pattern))
        .flat_map(Section::modules)
        .any(|m| {
            m.is("number_counter")
                && m.text_attr("suffix")
                    .map_or(false, |suffix| UNIT_SUFFIXES.iter().any(|u| suffix.contains(u)))
        });
    if suffixed_counter {
        score += 1;
    }

    let single_featured_plan = sections
        .iter()
        .filter(|s| catalog.resolve_category(&s.pattern) == Category::Pricing)
        .any(|s| {
            s.modules()
                .filter(|m| m.is("pricing_table") && m.flag_attr("featured"))
                .count()
                == 1
        });
    if single_featured_plan {
        score += 1;
    }

    clamp_axis(score)
}

fn conversion(sections: &[Section], metrics: &LayoutMetrics, catalog: &CategoryCatalog) -> u8 {
    let mut score = 0;

    if let Some(hero) = metrics.hero_cta.as_deref().map(fold_text) {
        if LOW_COMMITMENT.iter().any(|p| hero.contains(p)) {
            score += 1;
        }
    }

    let categories: Vec<Category> = sections
        .iter()
        .map(|s| catalog.resolve_category(&s.pattern))
        .collect();
    if categories
        .iter()
        .any(|c| matches!(c, Category::Pricing | Category::Faq))
    {
        score += 1;
    }

    if let Some(cta) = metrics.final_cta.as_deref().map(fold_text) {
        if HIGH_COMMITMENT.iter().any(|p| cta.contains(p)) {
            score += 2;
        }
    }

    let faq = categories.iter().rposition(|c| *c == Category::Faq);
    if let (Some(faq), Some(cta)) = (faq, metrics.final_cta_index) {
        if faq < cta {
            score += 1;
        }
    }

    clamp_axis(score)
}
