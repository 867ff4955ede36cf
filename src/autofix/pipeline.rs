//! Ordered stage table and the runner that folds it over a layout.

use super::ids::IdSource;
use super::log::FixLog;
use super::stages::{context, narrative, structure, visual};
use super::styler::ContextStyler;
use crate::analysis::{QualityReport, WarningCode};
use crate::catalog::CategoryCatalog;
use crate::config::PolicyConfig;
use crate::layout::Layout;
use tracing::debug;

pub type StageFn = fn(Layout, FixLog, &mut FixContext<'_>) -> (Layout, FixLog);

/// Facts about the pre-fix layout that gate or tune individual stages.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FixSignals {
    /// LONG_PAGE was raised; enables stage 8
    pub long_page: bool,
    /// GRID_DENSITY_LOW was raised; enables stage 9
    pub low_density: bool,
    /// Pre-fix score, used by final-CTA scaling
    pub prior_score: u8,
    pub prior_confidence: f64,
}

impl FixSignals {
    pub fn from_report(report: &QualityReport, policy: &PolicyConfig) -> Self {
        let prior_confidence = if report.has_critical(policy) {
            policy.confidence_critical
        } else {
            policy.confidence_clean
        };
        Self {
            long_page: report.has_warning(WarningCode::LongPage),
            low_density: report.has_warning(WarningCode::GridDensityLow),
            prior_score: report.score,
            prior_confidence,
        }
    }
}

/// Everything a stage may read, plus the injected id source.
pub struct FixContext<'a> {
    pub catalog: &'a CategoryCatalog,
    pub policy: &'a PolicyConfig,
    pub styler: &'a dyn ContextStyler,
    pub ids: &'a mut dyn IdSource,
    pub signals: FixSignals,
}

impl<'a> FixContext<'a> {
    pub fn new(
        catalog: &'a CategoryCatalog,
        policy: &'a PolicyConfig,
        styler: &'a dyn ContextStyler,
        ids: &'a mut dyn IdSource,
    ) -> Self {
        Self {
            catalog,
            policy,
            styler,
            ids,
            signals: FixSignals::default(),
        }
    }

    pub fn with_signals(mut self, signals: FixSignals) -> Self {
        self.signals = signals;
        self
    }
}

/// One named pipeline stage.
#[derive(Clone, Copy)]
pub struct Stage {
    pub id: u8,
    pub name: &'static str,
    /// May reorder, insert or remove sections
    pub structural: bool,
    pub run: StageFn,
    /// Postcondition, for listings
    pub doc: &'static str,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("structural", &self.structural)
            .finish()
    }
}

/// The fixed stage order. Later stages rely on earlier postconditions.
pub static STAGES: [Stage; 18] = [
    Stage {
        id: 1,
        name: "force_light",
        structural: false,
        run: context::force_light,
        doc: "no section is DARK where DARK is not allowed",
    },
    Stage {
        id: 2,
        name: "primary_context",
        structural: false,
        run: context::primary_context,
        doc: "only the canonical final CTA is PRIMARY",
    },
    Stage {
        id: 3,
        name: "synthesize_final_cta",
        structural: true,
        run: context::synthesize_final_cta,
        doc: "a final-cta section exists",
    },
    Stage {
        id: 4,
        name: "final_cta_last",
        structural: true,
        run: context::final_cta_last,
        doc: "the canonical final CTA is the last section",
    },
    Stage {
        id: 5,
        name: "trust_dark",
        structural: false,
        run: context::trust_dark,
        doc: "trust sections are DARK within the DARK budget",
    },
    Stage {
        id: 6,
        name: "dark_budget",
        structural: false,
        run: context::dark_budget,
        doc: "at most max_dark_sections DARK sections",
    },
    Stage {
        id: 7,
        name: "light_alternation",
        structural: false,
        run: context::light_alternation,
        doc: "odd positions of long LIGHT runs carry an alternate tint",
    },
    Stage {
        id: 8,
        name: "merge_long_page",
        structural: true,
        run: structure::merge_long_page,
        doc: "long pages shrink toward merge_target",
    },
    Stage {
        id: 9,
        name: "split_dense_grids",
        structural: false,
        run: structure::split_dense_grids,
        doc: "no crowded single-column grid rows",
    },
    Stage {
        id: 10,
        name: "assign_intent",
        structural: false,
        run: visual::assign_intent,
        doc: "visual intent matches the intent table",
    },
    Stage {
        id: 11,
        name: "assign_density",
        structural: false,
        run: visual::assign_density,
        doc: "every section has a density",
    },
    Stage {
        id: 12,
        name: "rhythm_spacing",
        structural: false,
        run: visual::rhythm_spacing,
        doc: "climax, break and sparse spacing minimums hold",
    },
    Stage {
        id: 13,
        name: "assign_scale",
        structural: false,
        run: visual::assign_scale,
        doc: "every section has a visual scale",
    },
    Stage {
        id: 14,
        name: "assign_typography",
        structural: false,
        run: visual::assign_typography,
        doc: "every section has typography scale and emphasis",
    },
    Stage {
        id: 15,
        name: "assign_emotion",
        structural: false,
        run: visual::assign_emotion,
        doc: "tone and attention set; no three HIGH in a row",
    },
    Stage {
        id: 16,
        name: "assign_role",
        structural: false,
        run: visual::assign_role,
        doc: "narrative role matches the role table",
    },
    Stage {
        id: 17,
        name: "flag_narrative",
        structural: false,
        run: narrative::flag_narrative,
        doc: "missing narrative roles are reported",
    },
    Stage {
        id: 18,
        name: "correct_narrative",
        structural: true,
        run: narrative::correct_narrative,
        doc: "narrative fixed within its band",
    },
];

/// Result of one pipeline invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FixOutcome {
    pub layout: Layout,
    pub log: FixLog,
    /// A structural stage changed section order and stages 1-17 ran again
    pub settled: bool,
}

/// The full eighteen-stage pipeline over a fixed catalog, policy and styler.
pub struct AutoFix<'a> {
    catalog: &'a CategoryCatalog,
    policy: &'a PolicyConfig,
    styler: &'a dyn ContextStyler,
}

impl<'a> AutoFix<'a> {
    pub fn new(
        catalog: &'a CategoryCatalog,
        policy: &'a PolicyConfig,
        styler: &'a dyn ContextStyler,
    ) -> Self {
        Self {
            catalog,
            policy,
            styler,
        }
    }

    /// Run all stages. When a structural stage changes the section order, stages 1-17 run
    /// once more so the output is stable under a second invocation.
    pub fn run(&self, layout: Layout, signals: FixSignals, ids: &mut dyn IdSource) -> FixOutcome {
        let mut ctx = FixContext::new(self.catalog, self.policy, self.styler, ids)
            .with_signals(signals);
        let mut state = (layout, FixLog::new());
        let mut reordered = false;

        for stage in STAGES.iter() {
            let order_before: Vec<String> = if stage.structural {
                state.0.order().into_iter().map(str::to_string).collect()
            } else {
                Vec::new()
            };
            let records_before = state.1.len();

            state = (stage.run)(state.0, state.1, &mut ctx);

            if stage.structural && state.0.order() != order_before {
                reordered = true;
            }
            let added = state.1.len() - records_before;
            if added > 0 {
                debug!(stage = stage.id, name = stage.name, records = added, "fix stage applied");
            }
        }

        if reordered {
            for stage in STAGES.iter().filter(|s| s.id <= 17) {
                state = (stage.run)(state.0, state.1, &mut ctx);
            }
        }

        FixOutcome {
            layout: state.0,
            log: state.1,
            settled: reordered,
        }
    }

    /// Run the stages whose ids fall in `first..=last`, once, in order.
    pub fn run_stages(
        &self,
        layout: Layout,
        signals: FixSignals,
        ids: &mut dyn IdSource,
        first: u8,
        last: u8,
    ) -> (Layout, FixLog) {
        let mut ctx = FixContext::new(self.catalog, self.policy, self.styler, ids)
            .with_signals(signals);
        STAGES
            .iter()
            .filter(|s| (first..=last).contains(&s.id))
            .fold((layout, FixLog::new()), |(layout, log), stage| {
                (stage.run)(layout, log, &mut ctx)
            })
    }
}
