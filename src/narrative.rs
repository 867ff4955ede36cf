//! Narrative Flow
//!
//! Seven ordered roles describe a page's persuasion arc: HOOK, PROBLEM, PROMISE, PROOF,
//! DETAILS, RELIEF, RESOLUTION. The validator scores a role sequence in [0, 100]; the
//! corrector runs as the last fix stage and applies bounded repairs gated by the score band.

pub mod corrector;
pub mod validator;

pub use corrector::{placeholder_section, PLACEHOLDER_PROOF_PATTERN, PLACEHOLDER_RELIEF_PATTERN};
pub use validator::{
    roles_of, signature, validate, NarrativeBand, NarrativeValidation, OrderIssue, RolePositions,
    ESSENTIAL_ROLES,
};
