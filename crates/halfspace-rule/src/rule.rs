//! The rule tree node type.

use std::convert::Infallible;
use std::fmt;

/// A node of a boolean rule tree over signed surface literals.
///
/// `Intersection` and `Union` normally hold at least one child; a
/// single child is a pass-through. An empty `Intersection` evaluates
/// true and an empty `Union` false.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Signed surface literal; never zero.
    Literal(i32),
    /// Logical AND of the children.
    Intersection(Vec<Rule>),
    /// Logical OR of the children.
    Union(Vec<Rule>),
    /// Logical NOT of the child.
    Complement(Box<Rule>),
}

impl Rule {
    /// Evaluate the tree, resolving each literal through `literal`.
    ///
    /// Evaluation short-circuits left to right, so `literal` is only
    /// called for literals that decide the outcome.
    pub fn evaluate<F, E>(&self, literal: &mut F) -> Result<bool, E>
    where
        F: FnMut(i32) -> Result<bool, E>,
    {
        match self {
            Rule::Literal(n) => literal(*n),
            Rule::Intersection(children) => {
                for child in children {
                    if !child.evaluate(literal)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Rule::Union(children) => {
                for child in children {
                    if child.evaluate(literal)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Rule::Complement(child) => Ok(!child.evaluate(literal)?),
        }
    }

    /// Evaluate with an infallible literal truth function.
    pub fn evaluate_with<F: FnMut(i32) -> bool>(&self, mut literal: F) -> bool {
        let result: Result<bool, Infallible> = self.evaluate(&mut |n| Ok(literal(n)));
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Complement this rule, collapsing a double complement.
    pub fn complement(self) -> Rule {
        match self {
            Rule::Complement(inner) => *inner,
            other => Rule::Complement(Box::new(other)),
        }
    }

    /// Skip single-child intersection and union wrappers.
    pub fn effective(&self) -> &Rule {
        let mut node = self;
        loop {
            match node {
                Rule::Intersection(c) | Rule::Union(c) if c.len() == 1 => node = &c[0],
                _ => return node,
            }
        }
    }

    /// Append each distinct signed literal in first-appearance order.
    pub fn collect_literals(&self, out: &mut Vec<i32>) {
        match self {
            Rule::Literal(n) => {
                if !out.contains(n) {
                    out.push(*n);
                }
            }
            Rule::Intersection(children) | Rule::Union(children) => {
                for child in children {
                    child.collect_literals(out);
                }
            }
            Rule::Complement(child) => child.collect_literals(out),
        }
    }

    /// Total number of literal leaves (with repeats).
    pub fn literal_count(&self) -> usize {
        match self {
            Rule::Literal(_) => 1,
            Rule::Intersection(children) | Rule::Union(children) => {
                children.iter().map(Rule::literal_count).sum()
            }
            Rule::Complement(child) => child.literal_count(),
        }
    }

    /// Rewrite literals of surface `|old|` to surface `|new|`, keeping
    /// the relative sense given by the signs of `old` and `new`.
    pub fn substitute(&mut self, old: i32, new: i32) -> usize {
        match self {
            Rule::Literal(n) => {
                if n.abs() == old.abs() {
                    *n = n.signum() * old.signum() * new;
                    1
                } else {
                    0
                }
            }
            Rule::Intersection(children) | Rule::Union(children) => {
                children.iter_mut().map(|c| c.substitute(old, new)).sum()
            }
            Rule::Complement(child) => child.substitute(old, new),
        }
    }

    /// Remove every literal of surface `|id|`, dropping nodes that
    /// become empty. Returns `None` if nothing remains.
    pub fn without_surface(self, id: i32, removed: &mut usize) -> Option<Rule> {
        match self {
            Rule::Literal(n) if n.abs() == id.abs() => {
                *removed += 1;
                None
            }
            Rule::Literal(n) => Some(Rule::Literal(n)),
            Rule::Intersection(children) => {
                let kept = Self::prune_children(children, id, removed);
                if kept.is_empty() {
                    None
                } else {
                    Some(Rule::Intersection(kept))
                }
            }
            Rule::Union(children) => {
                let kept = Self::prune_children(children, id, removed);
                if kept.is_empty() {
                    None
                } else {
                    Some(Rule::Union(kept))
                }
            }
            Rule::Complement(child) => child
                .without_surface(id, removed)
                .map(|c| Rule::Complement(Box::new(c))),
        }
    }

    fn prune_children(children: Vec<Rule>, id: i32, removed: &mut usize) -> Vec<Rule> {
        children
            .into_iter()
            .filter_map(|c| c.without_surface(id, removed))
            .collect()
    }

    fn fmt_in(&self, f: &mut fmt::Formatter<'_>, inside_intersection: bool) -> fmt::Result {
        match self.effective() {
            Rule::Literal(n) => write!(f, "{n}"),
            Rule::Intersection(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    child.fmt_in(f, true)?;
                }
                Ok(())
            }
            Rule::Union(children) => {
                if inside_intersection {
                    f.write_str("(")?;
                }
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" + ")?;
                    }
                    child.fmt_in(f, false)?;
                }
                if inside_intersection {
                    f.write_str(")")?;
                }
                Ok(())
            }
            Rule::Complement(child) => match child.effective() {
                Rule::Literal(n) => write!(f, "#{n}"),
                inner => {
                    f.write_str("#(")?;
                    inner.fmt_in(f, false)?;
                    f.write_str(")")
                }
            },
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_in(f, false)
    }
}
