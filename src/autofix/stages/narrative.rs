//! Stages 17-18: narrative flagging and banded correction.

use crate::autofix::pipeline::FixContext;
use crate::autofix::FixLog;
use crate::layout::{Layout, NarrativeRole};
use crate::narrative::{self, corrector};

/// 17. Report what the assigned roles are missing. Never mutates.
pub fn flag_narrative(
    layout: Layout,
    mut log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    let validation = narrative::validate(&narrative::roles_of(&layout.sections, ctx.catalog));

    if validation.is_missing(NarrativeRole::Proof) {
        log.notice(17, "NARRATIVE_MISSING_PROOF", None, "no PROOF section");
    }
    if !validation.has_relief {
        log.notice(17, "NARRATIVE_MISSING_RELIEF", None, "no RELIEF section");
    }
    if validation.score < ctx.policy.narrative_blocked_threshold {
        log.notice(
            17,
            "NARRATIVE_HARD_FAIL",
            None,
            format!("narrative score {} ({})", validation.score, validation.signature),
        );
    }
    (layout, log)
}

/// 18. Banded narrative correction.
pub fn correct_narrative(
    layout: Layout,
    log: FixLog,
    ctx: &mut FixContext<'_>,
) -> (Layout, FixLog) {
    corrector::correct(layout, log, ctx)
}
