//! Cells: a rule and a material under an id.

use halfspace_rule::HeadRule;

use crate::error::Result;

/// A CSG cell.
///
/// The signed surface list is cached from the rule and refreshed on
/// every rule edit made through the cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    id: i32,
    rule: HeadRule,
    material: String,
    surfaces: Vec<i32>,
}

impl Cell {
    /// Create a cell from a parsed rule.
    pub fn new(id: i32, rule: HeadRule, material: impl Into<String>) -> Self {
        let surfaces = rule.surface_numbers();
        Self {
            id,
            rule,
            material: material.into(),
            surfaces,
        }
    }

    /// Parse `expression` into a new cell.
    pub fn parse(id: i32, expression: &str, material: impl Into<String>) -> Result<Self> {
        Ok(Self::new(id, HeadRule::parse(expression)?, material))
    }

    /// Cell id.
    pub fn id(&self) -> i32 {
        self.id
    }

    /// The cell's rule.
    pub fn rule(&self) -> &HeadRule {
        &self.rule
    }

    /// Material tag.
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Replace the material tag.
    pub fn set_material(&mut self, material: impl Into<String>) {
        self.material = material.into();
    }

    /// Distinct signed surface literals of the rule.
    pub fn surfaces(&self) -> &[i32] {
        &self.surfaces
    }

    /// Replace the rule.
    pub fn set_rule(&mut self, rule: HeadRule) {
        self.rule = rule;
        self.refresh();
    }

    /// Edit the rule in place.
    pub fn update_rule<R>(&mut self, edit: impl FnOnce(&mut HeadRule) -> R) -> R {
        let out = edit(&mut self.rule);
        self.refresh();
        out
    }

    fn refresh(&mut self) {
        self.surfaces = self.rule.surface_numbers();
    }
}
