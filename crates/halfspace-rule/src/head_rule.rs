//! The rule owner: containment, edits and boundary tracking.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use halfspace_math::{Dir3, Point3};
use halfspace_surface::{Ray, Side, SurfaceRegistry};
use tracing::debug;

use crate::error::{Result, RuleError};
use crate::parser::parse_rule;
use crate::rule::Rule;

/// The nearest true boundary of a rule along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceCrossing {
    /// Distance from the query point to the crossing.
    pub distance: f64,
    /// Crossed surface, signed by the half-space entered after the crossing.
    pub surface: i32,
}

/// Owner of a cell's rule tree.
///
/// An absent root is the always-true rule of an unbounded cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct HeadRule {
    root: Option<Rule>,
}

impl HeadRule {
    /// The always-true rule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule expression.
    pub fn parse(expression: &str) -> Result<Self> {
        Ok(Self {
            root: parse_rule(expression)?,
        })
    }

    /// Wrap an existing tree.
    pub fn from_rule(rule: Rule) -> Self {
        Self { root: Some(rule) }
    }

    /// The root node, if any.
    pub fn root(&self) -> Option<&Rule> {
        self.root.as_ref()
    }

    /// Consume into the root node.
    pub fn into_root(self) -> Option<Rule> {
        self.root
    }

    /// Whether there is no rule (always true).
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Whether the effective root is a union.
    pub fn is_union(&self) -> bool {
        matches!(self.root.as_ref().map(Rule::effective), Some(Rule::Union(_)))
    }

    /// Number of literal leaves in the tree.
    pub fn literal_count(&self) -> usize {
        self.root.as_ref().map_or(0, Rule::literal_count)
    }

    /// Whether `point` lies in the region described by the rule.
    ///
    /// A point on a surface satisfies both senses of that surface.
    pub fn is_valid(&self, registry: &SurfaceRegistry, point: &Point3) -> Result<bool> {
        let Some(root) = &self.root else {
            return Ok(true);
        };
        root.evaluate(&mut |n| {
            registry
                .side_of(n, point)
                .map(|side| side.satisfies(n))
                .map_err(RuleError::from)
        })
    }

    /// Evaluate against a literal truth function.
    pub fn evaluate_with<F: FnMut(i32) -> bool>(&self, literal: F) -> bool {
        self.root.as_ref().map_or(true, |r| r.evaluate_with(literal))
    }

    /// Replace the root with the intersection of the root and `other`.
    pub fn add_intersection(&mut self, other: HeadRule) {
        let Some(other) = other.root else {
            return;
        };
        self.root = Some(match self.root.take() {
            // Always-true intersected with the other rule is the other rule
            None => other,
            Some(root) => Rule::Intersection(vec![root, other]),
        });
    }

    /// Replace the root with the union of the root and `other`.
    pub fn add_union(&mut self, other: HeadRule) {
        let Some(other) = other.root else {
            return;
        };
        // An always-true root absorbs any union
        if let Some(root) = self.root.take() {
            self.root = Some(Rule::Union(vec![root, other]));
        }
    }

    /// Parse `expression` and intersect it into this rule.
    pub fn add_intersection_str(&mut self, expression: &str) -> Result<()> {
        self.add_intersection(HeadRule::parse(expression)?);
        Ok(())
    }

    /// Parse `expression` and union it into this rule.
    pub fn add_union_str(&mut self, expression: &str) -> Result<()> {
        self.add_union(HeadRule::parse(expression)?);
        Ok(())
    }

    /// Remove the region of `mask` from this rule (`self #(mask)`).
    pub fn exclude(&mut self, mask: &HeadRule) {
        if let Some(m) = &mask.root {
            self.add_intersection(HeadRule::from_rule(m.clone().complement()));
        }
    }

    /// Complement the rule in place.
    ///
    /// The empty rule has no literal complement and is left unchanged.
    pub fn complement(&mut self) {
        match self.root.take() {
            Some(root) => self.root = Some(root.complement()),
            None => debug!("complement of the always-true rule left unchanged"),
        }
    }

    /// Distinct signed literals in first-appearance order.
    pub fn surface_numbers(&self) -> Vec<i32> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_literals(&mut out);
        }
        out
    }

    /// Distinct surface ids (magnitudes), ascending.
    pub fn surface_set(&self) -> Vec<i32> {
        self.surface_numbers()
            .into_iter()
            .map(i32::abs)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rewrite literals of `old` to `new`, preserving relative sense.
    /// Returns the number of replaced literals.
    pub fn substitute_surface(&mut self, old: i32, new: i32) -> usize {
        if old == 0 || new == 0 {
            return 0;
        }
        self.root.as_mut().map_or(0, |r| r.substitute(old, new))
    }

    /// Remove every literal of surface `id`. Returns the number removed.
    ///
    /// Removing the last literal leaves the always-true rule.
    pub fn remove_surface(&mut self, id: i32) -> usize {
        let mut removed = 0;
        if let Some(root) = self.root.take() {
            self.root = root.without_surface(id, &mut removed);
        }
        removed
    }

    /// The expression in the parse grammar.
    pub fn display(&self) -> String {
        self.to_string()
    }

    /// Minimum distance along `direction` to a surface crossing that
    /// changes the truth value of this rule.
    ///
    /// Each candidate crossing is tested with probe points one
    /// [`probe`](halfspace_math::Tolerance::probe) offset before and
    /// after it, so surfaces that are redundant at the crossing point
    /// are skipped.
    pub fn track_surf(
        &self,
        registry: &SurfaceRegistry,
        point: &Point3,
        direction: &Dir3,
        max_distance: f64,
    ) -> Result<SurfaceCrossing> {
        let tol = *registry.tolerance();
        let ray = Ray::from_dir(*point, *direction);

        let mut candidates: Vec<(f64, i32)> = Vec::new();
        for surface in self.surface_set() {
            for t in registry.intersect(surface, &ray)? {
                if t > tol.linear && t <= max_distance + tol.linear {
                    candidates.push((t, surface));
                }
            }
        }
        candidates.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (t, surface) in candidates {
            let before = ray.at(t - tol.probe.min(0.5 * t));
            let after = ray.at(t + tol.probe);
            if self.is_valid(registry, &before)? == self.is_valid(registry, &after)? {
                continue;
            }
            let signed = match registry.side_of(surface, &after)? {
                Side::Negative => -surface,
                Side::Positive | Side::On => surface,
            };
            return Ok(SurfaceCrossing {
                distance: t,
                surface: signed,
            });
        }
        Err(RuleError::NoExit { max_distance })
    }
}

impl fmt::Display for HeadRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => fmt::Display::fmt(root, f),
            None => Ok(()),
        }
    }
}

impl FromStr for HeadRule {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<Rule> for HeadRule {
    fn from(rule: Rule) -> Self {
        Self::from_rule(rule)
    }
}
