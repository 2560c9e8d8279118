//! Ternary implicant vectors for Quine–McCluskey reduction.

use std::collections::BTreeSet;
use std::fmt;

/// One position of an implicant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tri {
    /// The literal must be false.
    False,
    /// The literal must be true.
    True,
    /// Either value.
    DontCare,
}

/// A candidate implicant: a ternary vector over the literal alphabet,
/// the minterm indices it covers, and whether it survived as prime.
///
/// Position `k` corresponds to bit `k` of a minterm index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BnId {
    bits: Vec<Tri>,
    covers: BTreeSet<usize>,
    prime: bool,
}

impl BnId {
    /// The don't-care-free implicant of a single minterm.
    pub fn from_minterm(width: usize, index: usize) -> Self {
        let bits = (0..width)
            .map(|k| if (index >> k) & 1 == 1 { Tri::True } else { Tri::False })
            .collect();
        Self {
            bits,
            covers: BTreeSet::from([index]),
            prime: false,
        }
    }

    /// Build an implicant from explicit positions and covered minterms.
    pub fn new(bits: Vec<Tri>, covers: BTreeSet<usize>) -> Self {
        Self {
            bits,
            covers,
            prime: false,
        }
    }

    /// The ternary positions.
    pub fn bits(&self) -> &[Tri] {
        &self.bits
    }

    /// Alphabet width.
    pub fn width(&self) -> usize {
        self.bits.len()
    }

    /// Minterm indices covered by this implicant.
    pub fn covers(&self) -> &BTreeSet<usize> {
        &self.covers
    }

    /// Whether this implicant was kept as a prime implicant.
    pub fn is_prime(&self) -> bool {
        self.prime
    }

    pub(crate) fn mark_prime(&mut self) {
        self.prime = true;
    }

    pub(crate) fn absorb(&mut self, other: BnId) {
        self.covers.extend(other.covers);
    }

    /// Number of don't-care positions.
    pub fn dont_care_count(&self) -> usize {
        self.bits.iter().filter(|b| **b == Tri::DontCare).count()
    }

    /// Number of fixed (literal-producing) positions.
    pub fn fixed_count(&self) -> usize {
        self.width() - self.dont_care_count()
    }

    /// Number of positions fixed to true.
    pub fn true_count(&self) -> usize {
        self.bits.iter().filter(|b| **b == Tri::True).count()
    }

    /// Bit mask of don't-care positions.
    pub fn dont_care_mask(&self) -> u64 {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == Tri::DontCare)
            .fold(0, |mask, (k, _)| mask | (1 << k))
    }

    /// Fixed positions with their required value, ascending.
    pub fn literals(&self) -> impl Iterator<Item = (usize, bool)> + '_ {
        self.bits.iter().enumerate().filter_map(|(k, b)| match b {
            Tri::True => Some((k, true)),
            Tri::False => Some((k, false)),
            Tri::DontCare => None,
        })
    }

    /// Whether the assignment with minterm index `index` satisfies this implicant.
    pub fn covers_assignment(&self, index: usize) -> bool {
        self.literals().all(|(k, value)| ((index >> k) & 1 == 1) == value)
    }

    /// Merge two implicants that differ in exactly one fixed position.
    ///
    /// Returns `None` if the widths differ, if the don't-care positions
    /// differ, or if zero or several fixed positions disagree.
    pub fn combine(&self, other: &BnId) -> Option<BnId> {
        if self.width() != other.width() {
            return None;
        }
        let mut diff = None;
        for (k, (a, b)) in self.bits.iter().zip(&other.bits).enumerate() {
            if a == b {
                continue;
            }
            if *a == Tri::DontCare || *b == Tri::DontCare || diff.is_some() {
                return None;
            }
            diff = Some(k);
        }
        let k = diff?;
        let mut bits = self.bits.clone();
        bits[k] = Tri::DontCare;
        let covers = self.covers.union(&other.covers).copied().collect();
        Some(BnId::new(bits, covers))
    }
}

impl fmt::Display for BnId {
    /// Most significant position first, e.g. `1-0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.bits.iter().rev() {
            let c = match b {
                Tri::False => '0',
                Tri::True => '1',
                Tri::DontCare => '-',
            };
            write!(f, "{c}")?;
        }
        Ok(())
    }
}
