//! Narrative validation: signature, missing roles, order issues, and a bounded score.

use crate::catalog::CategoryCatalog;
use crate::layout::{NarrativeRole, Section};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Roles every page needs; each missing one costs 20 points.
pub const ESSENTIAL_ROLES: [NarrativeRole; 4] = [
    NarrativeRole::Hook,
    NarrativeRole::Promise,
    NarrativeRole::Proof,
    NarrativeRole::Resolution,
];

const MISSING_ROLE_PENALTY: i32 = 20;
const ORDER_PENALTY: i32 = 10;
const CTA_BEFORE_PROMISE_PENALTY: i32 = 30;
const MULTIPLE_PROOF_BONUS: i32 = 10;
const RELIEF_BEFORE_RESOLUTION_BONUS: i32 = 5;

string_enum! {
    pub enum OrderIssue {
        ResolutionTooEarly => "RESOLUTION_TOO_EARLY",
        ProofAfterCta => "PROOF_AFTER_CTA",
        ProofBeforePromise => "PROOF_BEFORE_PROMISE",
        HookNotFirst => "HOOK_NOT_FIRST",
        CtaBeforePromise => "CTA_BEFORE_PROMISE",
    }
}

/// Correction aggressiveness allowed for a narrative score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeBand {
    /// Score at or above the preserve threshold: no mutation.
    Preserve,
    /// Adjacent swaps and placeholder insertion only.
    BoundedFix,
    /// Score below the blocked threshold: flag only.
    Blocked,
}

/// Index lists per role, in page order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolePositions {
    positions: BTreeMap<NarrativeRole, Vec<usize>>,
}

impl RolePositions {
    pub fn from_roles(roles: &[NarrativeRole]) -> Self {
        let mut positions: BTreeMap<NarrativeRole, Vec<usize>> = BTreeMap::new();
        for (index, role) in roles.iter().enumerate() {
            positions.entry(*role).or_default().push(index);
        }
        Self { positions }
    }

    pub fn first(&self, role: NarrativeRole) -> Option<usize> {
        self.positions.get(&role).and_then(|p| p.first().copied())
    }

    pub fn last(&self, role: NarrativeRole) -> Option<usize> {
        self.positions.get(&role).and_then(|p| p.last().copied())
    }

    pub fn count(&self, role: NarrativeRole) -> usize {
        self.positions.get(&role).map(Vec::len).unwrap_or(0)
    }

    pub fn has(&self, role: NarrativeRole) -> bool {
        self.count(role) > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NarrativeValidation {
    /// Role letters with consecutive duplicates collapsed, e.g. `H-PR-PF-RS`
    pub signature: String,
    pub score: u8,
    pub missing_roles: Vec<NarrativeRole>,
    pub out_of_order: Vec<OrderIssue>,
    pub proof_count: usize,
    pub has_relief: bool,
    pub has_problem: bool,
}

impl NarrativeValidation {
    pub fn has_issue(&self, issue: OrderIssue) -> bool {
        self.out_of_order.contains(&issue)
    }

    pub fn is_missing(&self, role: NarrativeRole) -> bool {
        self.missing_roles.contains(&role)
    }

    pub fn band(&self, preserve_threshold: u8, blocked_threshold: u8) -> NarrativeBand {
        if self.score >= preserve_threshold {
            NarrativeBand::Preserve
        } else if self.score < blocked_threshold {
            NarrativeBand::Blocked
        } else {
            NarrativeBand::BoundedFix
        }
    }
}

/// Effective role per section: the assigned role, else the catalog lookup.
pub fn roles_of(sections: &[Section], catalog: &CategoryCatalog) -> Vec<NarrativeRole> {
    sections
        .iter()
        .map(|s| {
            s.narrative_role
                .unwrap_or_else(|| catalog.role_for(&s.pattern))
        })
        .collect()
}

pub fn signature(roles: &[NarrativeRole]) -> String {
    let mut letters: Vec<&str> = Vec::with_capacity(roles.len());
    let mut previous = None;
    for role in roles {
        if previous != Some(*role) {
            letters.push(role.letter());
        }
        previous = Some(*role);
    }
    letters.join("-")
}

pub fn validate(roles: &[NarrativeRole]) -> NarrativeValidation {
    use NarrativeRole::{Hook, Problem, Promise, Proof, Relief, Resolution};

    let positions = RolePositions::from_roles(roles);
    let total = roles.len();
    let mut score: i32 = 100;

    let missing_roles: Vec<NarrativeRole> = ESSENTIAL_ROLES
        .iter()
        .copied()
        .filter(|role| !positions.has(*role))
        .collect();
    score -= MISSING_ROLE_PENALTY * missing_roles.len() as i32;

    let mut out_of_order = Vec::new();

    if let Some(resolution) = positions.first(Resolution) {
        if resolution + 2 < total {
            out_of_order.push(OrderIssue::ResolutionTooEarly);
        }
    }
    if let (Some(proof), Some(resolution)) = (positions.last(Proof), positions.first(Resolution)) {
        if proof > resolution {
            out_of_order.push(OrderIssue::ProofAfterCta);
        }
    }
    if let (Some(promise), Some(proof)) = (positions.first(Promise), positions.first(Proof)) {
        if promise > proof {
            out_of_order.push(OrderIssue::ProofBeforePromise);
        }
    }
    if let Some(hook) = positions.first(Hook) {
        if hook != 0 {
            out_of_order.push(OrderIssue::HookNotFirst);
        }
    }
    score -= ORDER_PENALTY * out_of_order.len() as i32;

    if let (Some(resolution), Some(promise)) = (positions.first(Resolution), positions.last(Promise))
    {
        if resolution < promise {
            out_of_order.push(OrderIssue::CtaBeforePromise);
            score -= CTA_BEFORE_PROMISE_PENALTY;
        }
    }

    let proof_count = positions.count(Proof);
    if proof_count >= 2 {
        score += MULTIPLE_PROOF_BONUS;
    }

    if let (Some(relief), Some(resolution)) = (positions.last(Relief), positions.first(Resolution)) {
        if relief < resolution {
            score += RELIEF_BEFORE_RESOLUTION_BONUS;
        }
    }

    NarrativeValidation {
        signature: signature(roles),
        score: score.clamp(0, 100) as u8,
        missing_roles,
        out_of_order,
        proof_count,
        has_relief: positions.has(Relief),
        has_problem: positions.has(Problem),
    }
}
