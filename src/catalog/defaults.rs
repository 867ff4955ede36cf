//! House default tables.

use super::table::{Matcher, PatternTable};
use super::{Category, EmotionProfile};
use crate::layout::{
    AttentionLevel, EmotionalTone, NarrativeRole, VisualDensity, VisualIntent,
};

pub(super) const LIGHT_ONLY: [Category; 17] = [
    Category::Grid,
    Category::Features,
    Category::Services,
    Category::Testimonial,
    Category::Pricing,
    Category::Faq,
    Category::Contact,
    Category::Zigzag,
    Category::Tabs,
    Category::Disclosure,
    Category::Breathing,
    Category::VisualBridge,
    Category::Team,
    Category::Gallery,
    Category::Portfolio,
    Category::Blog,
    Category::Newsletter,
];

pub(super) const DARK_ALLOWED: [Category; 2] = [Category::TrustMetrics, Category::Hero];

pub(super) fn categories() -> PatternTable<Category> {
    PatternTable::new(Category::Other)
        .exact(&["hero", "hero_split", "hero_centered", "hero_asymmetric"], Category::Hero)
        .exact(&["final_cta", "final_cta_simple", "cta"], Category::FinalCta)
        .exact(&["trust_metrics", "trust", "stats"], Category::TrustMetrics)
        .exact(&["testimonials", "testimonial_spotlight"], Category::Testimonial)
        .exact(&["logos", "awards", "case_studies"], Category::SocialProof)
        .exact(&["pricing", "pricing_tiered"], Category::Pricing)
        .exact(&["faq", "faq_expandable"], Category::Faq)
        .exact(&["grid_density", "grid_featured"], Category::Grid)
        .exact(&["features"], Category::Features)
        .exact(&["services"], Category::Services)
        .exact(&["benefits"], Category::Benefits)
        .exact(&["zigzag", "zigzag_narrative"], Category::Zigzag)
        .exact(&["tabs", "tabbed_content"], Category::Tabs)
        .exact(&["progressive_disclosure"], Category::Disclosure)
        .exact(&["comparison"], Category::Comparison)
        .exact(&["how_it_works"], Category::HowItWorks)
        .exact(&["contact", "contact_gateway"], Category::Contact)
        .exact(&["newsletter"], Category::Newsletter)
        .exact(&["team"], Category::Team)
        .exact(&["about"], Category::About)
        .exact(&["gallery"], Category::Gallery)
        .exact(&["portfolio"], Category::Portfolio)
        .exact(&["blog"], Category::Blog)
        .exact(&["breathing_space"], Category::Breathing)
        .exact(&["visual_bridge"], Category::VisualBridge)
        .exact(&["divider"], Category::Divider)
        .exact(&["footer"], Category::Footer)
        .exact(&["problem", "problem_agitation", "challenges"], Category::Problem)
        .rule(Matcher::prefix("hero"), Category::Hero)
        .rule(Matcher::prefix("final_cta"), Category::FinalCta)
        .rule(Matcher::prefix("trust"), Category::TrustMetrics)
        .rule(Matcher::prefix("stats"), Category::TrustMetrics)
        .rule(Matcher::prefix("testimonial"), Category::Testimonial)
        .rule(Matcher::prefix("pricing"), Category::Pricing)
        .rule(Matcher::prefix("faq"), Category::Faq)
        .rule(Matcher::prefix("grid"), Category::Grid)
        .rule(Matcher::prefix("feature"), Category::Features)
        .rule(Matcher::prefix("service"), Category::Services)
        .rule(Matcher::prefix("zigzag"), Category::Zigzag)
        .rule(Matcher::prefix("tab"), Category::Tabs)
        .rule(Matcher::prefix("contact"), Category::Contact)
        .rule(Matcher::prefix("team"), Category::Team)
        .rule(Matcher::prefix("gallery"), Category::Gallery)
        .rule(Matcher::prefix("portfolio"), Category::Portfolio)
        .rule(Matcher::prefix("blog"), Category::Blog)
        .rule(Matcher::prefix("newsletter"), Category::Newsletter)
        .rule(Matcher::prefix("breathing"), Category::Breathing)
        .rule(Matcher::prefix("visual_bridge"), Category::VisualBridge)
        .rule(Matcher::prefix("footer"), Category::Footer)
        .rule(Matcher::prefix("divider"), Category::Divider)
        .rule(Matcher::prefix("problem"), Category::Problem)
}

pub(super) fn intents() -> PatternTable<VisualIntent> {
    PatternTable::new(VisualIntent::Neutral)
        .exact(
            &[
                "trust_metrics",
                "trust",
                "stats",
                "pricing",
                "pricing_tiered",
                "testimonial_spotlight",
            ],
            VisualIntent::Emphasis,
        )
        .exact(
            &[
                "faq",
                "faq_expandable",
                "breathing_space",
                "visual_bridge",
                "divider",
                "footer",
            ],
            VisualIntent::Soft,
        )
        .rule(Matcher::prefix("hero"), VisualIntent::Dominant)
        .rule(Matcher::prefix("final_cta"), VisualIntent::Dominant)
        .rule(Matcher::equals("cta"), VisualIntent::Dominant)
        .rule(Matcher::prefix("pricing"), VisualIntent::Emphasis)
        .rule(Matcher::prefix("trust"), VisualIntent::Emphasis)
        .rule(Matcher::prefix("stats"), VisualIntent::Emphasis)
        .rule(Matcher::prefix("faq"), VisualIntent::Soft)
        .rule(Matcher::prefix("footer"), VisualIntent::Soft)
}

pub(super) fn densities() -> PatternTable<VisualDensity> {
    PatternTable::new(VisualDensity::Normal)
        .exact(
            &[
                "features",
                "grid_density",
                "grid_featured",
                "pricing",
                "pricing_tiered",
                "trust_metrics",
            ],
            VisualDensity::Dense,
        )
        .exact(
            &[
                "testimonials",
                "testimonial_spotlight",
                "zigzag",
                "zigzag_narrative",
                "stats",
                "services",
                "portfolio",
                "gallery",
                "blog",
                "newsletter",
                "tabs",
                "tabbed_content",
                "progressive_disclosure",
                "final_cta",
                "final_cta_simple",
            ],
            VisualDensity::Normal,
        )
        .exact(
            &[
                "faq",
                "faq_expandable",
                "breathing_space",
                "visual_bridge",
                "contact",
                "contact_gateway",
                "team",
                "footer",
                "divider",
            ],
            VisualDensity::Sparse,
        )
        .rule(Matcher::prefix("hero"), VisualDensity::Dense)
        .rule(Matcher::prefix("features"), VisualDensity::Dense)
        .rule(Matcher::prefix("grid"), VisualDensity::Dense)
        .rule(Matcher::prefix("pricing"), VisualDensity::Dense)
        .rule(Matcher::prefix("faq"), VisualDensity::Sparse)
        .rule(Matcher::prefix("contact"), VisualDensity::Sparse)
        .rule(Matcher::prefix("breathing"), VisualDensity::Sparse)
        .rule(Matcher::prefix("visual_bridge"), VisualDensity::Sparse)
}

pub(super) fn roles() -> PatternTable<NarrativeRole> {
    PatternTable::new(NarrativeRole::Promise)
        .exact(
            &["hero", "hero_split", "hero_centered", "hero_asymmetric"],
            NarrativeRole::Hook,
        )
        .exact(
            &["problem", "problem_agitation", "challenges"],
            NarrativeRole::Problem,
        )
        .exact(
            &[
                "features",
                "grid_density",
                "grid_featured",
                "services",
                "benefits",
                "zigzag",
                "zigzag_narrative",
            ],
            NarrativeRole::Promise,
        )
        .exact(
            &[
                "trust_metrics",
                "trust",
                "testimonials",
                "testimonial_spotlight",
                "stats",
                "logos",
                "awards",
                "case_studies",
                "portfolio",
            ],
            NarrativeRole::Proof,
        )
        .exact(
            &[
                "pricing",
                "pricing_tiered",
                "faq",
                "faq_expandable",
                "tabbed_content",
                "tabs",
                "progressive_disclosure",
                "comparison",
                "how_it_works",
            ],
            NarrativeRole::Details,
        )
        .exact(
            &[
                "breathing_space",
                "visual_bridge",
                "contact",
                "contact_gateway",
                "newsletter",
                "team",
                "about",
            ],
            NarrativeRole::Relief,
        )
        .exact(&["final_cta", "final_cta_simple", "cta"], NarrativeRole::Resolution)
        .rule(Matcher::prefix("hero"), NarrativeRole::Hook)
        .rule(Matcher::prefix("problem"), NarrativeRole::Problem)
        .rule(Matcher::prefix("final_cta"), NarrativeRole::Resolution)
        .rule(Matcher::prefix("trust"), NarrativeRole::Proof)
        .rule(Matcher::prefix("testimonial"), NarrativeRole::Proof)
        .rule(Matcher::prefix("stats"), NarrativeRole::Proof)
        .rule(Matcher::prefix("pricing"), NarrativeRole::Details)
        .rule(Matcher::prefix("faq"), NarrativeRole::Details)
        .rule(Matcher::prefix("contact"), NarrativeRole::Relief)
        .rule(Matcher::prefix("breathing"), NarrativeRole::Relief)
        .rule(Matcher::prefix("grid"), NarrativeRole::Promise)
        .rule(Matcher::prefix("feature"), NarrativeRole::Promise)
}

pub(super) fn emotions() -> PatternTable<EmotionProfile> {
    use AttentionLevel::{High, Low, Medium};
    use EmotionalTone::{Calm, Focus, Trust, Urgency};

    PatternTable::new(EmotionProfile::new(Focus, Medium))
        .exact(
            &[
                "trust_metrics",
                "trust",
                "stats",
                "testimonials",
                "testimonial_spotlight",
            ],
            EmotionProfile::new(Trust, Medium),
        )
        .exact(&["team"], EmotionProfile::new(Trust, Low))
        .exact(
            &[
                "faq",
                "faq_expandable",
                "breathing_space",
                "visual_bridge",
                "divider",
                "footer",
            ],
            EmotionProfile::new(Calm, Low),
        )
        .exact(
            &["final_cta", "final_cta_simple", "cta"],
            EmotionProfile::new(Urgency, High),
        )
        .rule(Matcher::prefix("hero"), EmotionProfile::new(Focus, High))
        .rule(Matcher::prefix("final_cta"), EmotionProfile::new(Urgency, High))
        .rule(Matcher::prefix("trust"), EmotionProfile::new(Trust, Medium))
        .rule(Matcher::prefix("testimonial"), EmotionProfile::new(Trust, Medium))
        .rule(Matcher::prefix("faq"), EmotionProfile::new(Calm, Low))
        .rule(Matcher::prefix("breathing"), EmotionProfile::new(Calm, Low))
}
