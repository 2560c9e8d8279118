//! The simplifier entry point and its settings.

use halfspace_rule::HeadRule;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::acomp::{Acomp, Form};
use crate::error::{AlgebraError, Result};

/// Largest alphabet a truth table is ever built for.
const TABLE_LIMIT: usize = 24;

/// Largest alphabet an exact cover search is allowed for.
const EXHAUSTIVE_CAP: usize = 10;

/// Simplifier parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlgebraConfig {
    /// Rules over more distinct surfaces than this are left unminimized.
    pub max_literals: usize,
    /// Alphabets up to this size get an exact cover; larger ones greedy.
    pub exhaustive_limit: usize,
}

impl Default for AlgebraConfig {
    fn default() -> Self {
        Self {
            max_literals: 16,
            exhaustive_limit: 6,
        }
    }
}

impl AlgebraConfig {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_literals == 0 || self.max_literals > TABLE_LIMIT {
            return Err(AlgebraError::InvalidConfig(format!(
                "max_literals must be between 1 and {TABLE_LIMIT}"
            )));
        }
        if self.exhaustive_limit > EXHAUSTIVE_CAP {
            return Err(AlgebraError::InvalidConfig(format!(
                "exhaustive_limit must be at most {EXHAUSTIVE_CAP}"
            )));
        }
        Ok(())
    }
}

/// What a rule reduced to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simplified {
    /// True for every assignment.
    AlwaysTrue,
    /// False for every assignment; the cell is empty.
    AlwaysFalse,
    /// A non-constant rule.
    Rule(HeadRule),
}

impl Simplified {
    /// Evaluate against a literal truth function.
    pub fn evaluate_with<F: FnMut(i32) -> bool>(&self, literal: F) -> bool {
        match self {
            Simplified::AlwaysTrue => true,
            Simplified::AlwaysFalse => false,
            Simplified::Rule(rule) => rule.evaluate_with(literal),
        }
    }
}

/// Result of [`Algebra::simplify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simplification {
    /// The reduced rule.
    pub outcome: Simplified,
    /// `false` when the rule was returned as given.
    pub minimized: bool,
    /// Literal leaves in the outcome.
    pub literal_count: usize,
}

impl Simplification {
    fn constant(outcome: Simplified) -> Self {
        Self {
            outcome,
            minimized: true,
            literal_count: 0,
        }
    }

    /// The outcome as a rule: `None` for an always-false rule.
    pub fn into_head_rule(self) -> Option<HeadRule> {
        match self.outcome {
            Simplified::AlwaysTrue => Some(HeadRule::new()),
            Simplified::AlwaysFalse => None,
            Simplified::Rule(rule) => Some(rule),
        }
    }
}

/// Two-level minimizer for cell rules.
///
/// Both the sum-of-products and product-of-sums forms are minimized and
/// the one with fewer literals is kept.
#[derive(Debug, Clone, Default)]
pub struct Algebra {
    config: AlgebraConfig,
}

impl Algebra {
    /// Create a simplifier with validated settings.
    pub fn new(config: AlgebraConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The active settings.
    pub fn config(&self) -> &AlgebraConfig {
        &self.config
    }

    /// Minimize a rule.
    pub fn simplify(&self, rule: &HeadRule) -> Simplification {
        if rule.is_empty() {
            return Simplification::constant(Simplified::AlwaysTrue);
        }
        let alphabet = rule.surface_set();
        if alphabet.len() > self.config.max_literals {
            warn!(
                surfaces = alphabet.len(),
                max_literals = self.config.max_literals,
                "rule too large to minimize, returned unchanged"
            );
            return Simplification {
                literal_count: rule.literal_count(),
                outcome: Simplified::Rule(rule.clone()),
                minimized: false,
            };
        }

        let mut sop = Acomp::from_rule(rule, &alphabet, Form::SumOfProducts);
        if sop.is_empty() {
            return Simplification::constant(Simplified::AlwaysFalse);
        }
        if sop.is_full() {
            return Simplification::constant(Simplified::AlwaysTrue);
        }
        let mut pos = Acomp::from_rule(rule, &alphabet, Form::ProductOfSums);

        let limit = self.config.exhaustive_limit;
        let best = match (sop.minimize(limit), pos.minimize(limit)) {
            (Some(s), Some(p)) if p.literal_count() < s.literal_count() => p,
            (Some(s), _) => s,
            (None, Some(p)) => p,
            (None, None) => {
                return Simplification {
                    literal_count: rule.literal_count(),
                    outcome: Simplified::Rule(rule.clone()),
                    minimized: false,
                }
            }
        };

        let literal_count = best.literal_count();
        debug!(
            surfaces = alphabet.len(),
            before = rule.literal_count(),
            after = literal_count,
            "rule minimized"
        );
        Simplification {
            outcome: Simplified::Rule(HeadRule::from_rule(best)),
            minimized: true,
            literal_count,
        }
    }

    /// Parse an expression and minimize it.
    pub fn simplify_str(&self, expression: &str) -> Result<Simplification> {
        Ok(self.simplify(&HeadRule::parse(expression)?))
    }

    /// Minimize many rules in parallel, preserving order.
    pub fn simplify_all(&self, rules: &[HeadRule]) -> Vec<Simplification> {
        rules.par_iter().map(|rule| self.simplify(rule)).collect()
    }

    /// Whether two rules agree on every assignment of their combined
    /// surfaces. `None` if that alphabet exceeds `max_literals`.
    pub fn equivalent(&self, a: &HeadRule, b: &HeadRule) -> Option<bool> {
        let mut alphabet = a.surface_set();
        alphabet.extend(b.surface_set());
        alphabet.sort_unstable();
        alphabet.dedup();
        if alphabet.len() > self.config.max_literals {
            return None;
        }
        Some((0..1usize << alphabet.len()).all(|index| {
            a.evaluate_with(row(&alphabet, index)) == b.evaluate_with(row(&alphabet, index))
        }))
    }
}

/// Literal truth for row `index` of the table over `alphabet`.
fn row(alphabet: &[i32], index: usize) -> impl Fn(i32) -> bool + '_ {
    move |lit| match alphabet.iter().position(|s| *s == lit.abs()) {
        Some(k) => ((index >> k) & 1 == 1) == (lit > 0),
        None => false,
    }
}
