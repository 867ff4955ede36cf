//! Closed attribute vocabularies for sections.

string_enum! {
    /// Background treatment class of a section
    pub enum VisualContext {
        Light => "LIGHT",
        Dark => "DARK",
        Primary => "PRIMARY",
        Inherit => "INHERIT",
    }
}

string_enum! {
    pub enum VisualIntent {
        Dominant => "DOMINANT",
        Emphasis => "EMPHASIS",
        Neutral => "NEUTRAL",
        Soft => "SOFT",
    }
}

string_enum! {
    pub enum VisualDensity {
        Dense => "DENSE",
        Normal => "NORMAL",
        Sparse => "SPARSE",
    }
}

string_enum! {
    /// Ordered smallest to largest.
    pub enum VisualScale {
        Xs => "XS",
        Sm => "SM",
        Md => "MD",
        Lg => "LG",
        Xl => "XL",
    }
}

string_enum! {
    pub enum TypographyEmphasis {
        Strong => "strong",
        Normal => "normal",
        Soft => "soft",
    }
}

string_enum! {
    /// Position in the persuasion arc, in canonical story order.
    pub enum NarrativeRole {
        Hook => "HOOK",
        Problem => "PROBLEM",
        Promise => "PROMISE",
        Proof => "PROOF",
        Details => "DETAILS",
        Relief => "RELIEF",
        Resolution => "RESOLUTION",
    }
}

string_enum! {
    pub enum EmotionalTone {
        Focus => "focus",
        Trust => "trust",
        Calm => "calm",
        Urgency => "urgency",
    }
}

string_enum! {
    pub enum AttentionLevel {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

string_enum! {
    /// Vertical spacing override, ordered tightest to loosest.
    pub enum Spacing {
        Sm => "sm",
        Md => "md",
        Lg => "lg",
        Xl => "xl",
        Xxl => "2xl",
    }
}

impl Default for VisualContext {
    fn default() -> Self {
        VisualContext::Light
    }
}

impl NarrativeRole {
    /// Short code used in narrative signatures (`H-PR-PF-RS`).
    pub fn letter(&self) -> &'static str {
        match self {
            NarrativeRole::Hook => "H",
            NarrativeRole::Problem => "PB",
            NarrativeRole::Promise => "PR",
            NarrativeRole::Proof => "PF",
            NarrativeRole::Details => "D",
            NarrativeRole::Relief => "RL",
            NarrativeRole::Resolution => "RS",
        }
    }
}

impl Spacing {
    pub fn rank(&self) -> u8 {
        match self {
            Spacing::Sm => 1,
            Spacing::Md => 2,
            Spacing::Lg => 3,
            Spacing::Xl => 4,
            Spacing::Xxl => 5,
        }
    }
}

impl VisualScale {
    /// LG or XL; the minimum for hero and final call-to-action sections.
    pub fn is_climax(&self) -> bool {
        matches!(self, VisualScale::Lg | VisualScale::Xl)
    }
}
