//! Per-invocation fix log threaded through every stage.

use serde::{Deserialize, Serialize};

/// Whether a record describes a mutation or only an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixKind {
    Applied,
    Notice,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRecord {
    pub stage: u8,
    /// Rule code, e.g. `FORCE_LIGHT` or `NR_SWAP_CTA_PROMISE`
    pub rule: String,
    pub description: String,
    /// Index of the affected section at the time of the fix
    pub target: Option<usize>,
    pub kind: FixKind,
}

/// Ordered accumulator of fix records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixLog {
    records: Vec<FixRecord>,
}

impl FixLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(
        &mut self,
        stage: u8,
        rule: &str,
        target: Option<usize>,
        description: impl Into<String>,
    ) {
        self.push(stage, rule, target, description.into(), FixKind::Applied);
    }

    pub fn notice(
        &mut self,
        stage: u8,
        rule: &str,
        target: Option<usize>,
        description: impl Into<String>,
    ) {
        self.push(stage, rule, target, description.into(), FixKind::Notice);
    }

    fn push(
        &mut self,
        stage: u8,
        rule: &str,
        target: Option<usize>,
        description: String,
        kind: FixKind,
    ) {
        self.records.push(FixRecord {
            stage,
            rule: rule.to_string(),
            description,
            target,
            kind,
        });
    }

    pub fn records(&self) -> &[FixRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn applied_records(&self) -> impl Iterator<Item = &FixRecord> {
        self.records.iter().filter(|r| r.kind == FixKind::Applied)
    }

    pub fn applied_count(&self) -> usize {
        self.applied_records().count()
    }

    pub fn has_rule(&self, rule: &str) -> bool {
        self.records.iter().any(|r| r.rule == rule)
    }

    /// Distinct applied rule codes in first-seen order.
    pub fn applied_rules(&self) -> Vec<String> {
        let mut rules: Vec<String> = Vec::new();
        for record in self.applied_records() {
            if !rules.contains(&record.rule) {
                rules.push(record.rule.clone());
            }
        }
        rules
    }

    pub fn records_for_stage(&self, stage: u8) -> impl Iterator<Item = &FixRecord> {
        self.records.iter().filter(move |r| r.stage == stage)
    }

    pub fn extend(&mut self, other: FixLog) {
        self.records.extend(other.records);
    }
}
