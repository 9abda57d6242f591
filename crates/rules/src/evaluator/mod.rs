//! Chained rule evaluation.
//!
//! A [`RuleSet`] is an ordered list of [`CompiledRule`]s. Evaluating an item
//! is a left fold of [`EvalState::apply`] over that list: each step may read
//! refs and capture groups written by earlier steps, so declaration order is
//! significant. Nothing survives from one item to the next.

mod compiled;
mod targets;

use std::collections::{BTreeMap, HashMap, HashSet};

use feedhook_core::{Item, MatchOutcome};

use crate::fields::FieldMap;
use crate::loader::RuleError;
use crate::schema::{RuleSpec, TargetSelector};

pub use compiled::CompiledRule;
use targets::resolve_targets;

// ── Rule set ────────────────────────────────────────────────────────

/// An ordered, compiled rule list.
///
/// Construction checks that every `targetRef` names a ref bound by an earlier
/// rule, so a `RuleSet` never needs per-item error handling.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn compile(specs: &[RuleSpec]) -> Result<Self, RuleError> {
        let mut bound: HashSet<&str> = HashSet::new();
        let mut rules = Vec::with_capacity(specs.len());

        for (index, spec) in specs.iter().enumerate() {
            let rule = CompiledRule::compile(index, spec)?;
            if let TargetSelector::Ref(name) = rule.selector() {
                if !bound.contains(name.as_str()) {
                    return Err(RuleError::UndefinedRef {
                        index,
                        name: name.clone(),
                    });
                }
            }
            if let Some(name) = spec.bound_ref() {
                bound.insert(name);
            }
            rules.push(rule);
        }

        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Evaluate every rule, in declaration order, against one item.
    pub fn evaluate(&self, item: &Item) -> MatchOutcome {
        let fields = FieldMap::extract(item);
        self.rules
            .iter()
            .fold(EvalState::default(), |state, rule| state.apply(rule, &fields))
            .finish()
    }
}

/// Evaluate `rules` against `item`. See [`RuleSet::evaluate`].
pub fn evaluate(item: &Item, rules: &RuleSet) -> MatchOutcome {
    rules.evaluate(item)
}

// ── Per-item state ──────────────────────────────────────────────────

/// Accumulator threaded through one item's evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvalState {
    matched: Vec<String>,
    refs: HashMap<String, String>,
    groups: BTreeMap<String, String>,
}

impl EvalState {
    /// Apply one rule and return the updated state.
    ///
    /// Every resolved target is tested. The rule is recorded at most once;
    /// its ref (if any) is bound to the last target that satisfied it.
    pub fn apply(mut self, rule: &CompiledRule, fields: &FieldMap<'_>) -> Self {
        let targets = resolve_targets(rule.selector(), fields, &self.refs, &self.groups);

        let mut satisfied = None;
        for text in targets {
            if let Some(captures) = rule.test(&text) {
                self.groups.extend(captures);
                satisfied = Some(text);
            }
        }

        if let Some(text) = satisfied {
            self.matched.push(rule.descriptor().to_string());
            if let Some(name) = rule.bind_ref() {
                self.refs.insert(name.to_string(), text);
            }
        }
        self
    }

    pub fn matched(&self) -> &[String] {
        &self.matched
    }

    pub fn refs(&self) -> &HashMap<String, String> {
        &self.refs
    }

    pub fn groups(&self) -> &BTreeMap<String, String> {
        &self.groups
    }

    /// Drop the refs and keep the externally visible result.
    pub fn finish(self) -> MatchOutcome {
        MatchOutcome {
            matched: self.matched,
            groups: self.groups,
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────
