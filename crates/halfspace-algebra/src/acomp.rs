//! Canonical boolean components and their reduction to a minimal cover.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use halfspace_rule::{HeadRule, Rule};

use crate::bnid::{BnId, Tri};

/// Which canonical form a component is built in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    /// Union of intersections, built from the true rows of the table.
    SumOfProducts,
    /// Intersection of unions, built from the false rows of the table.
    ProductOfSums,
}

/// A canonical boolean component over a small literal alphabet.
///
/// Surface ids are mapped to positions `0..n` for the lifetime of the
/// component; minterm index bit `k` is the truth of `alphabet[k]`.
#[derive(Debug, Clone)]
pub struct Acomp {
    alphabet: Vec<i32>,
    form: Form,
    minterms: BTreeSet<usize>,
    terms: Vec<BnId>,
}

impl Acomp {
    /// Tabulate `rule` over every assignment of `alphabet`.
    ///
    /// `alphabet` holds positive surface ids; literals of surfaces not in
    /// the alphabet evaluate false.
    pub fn from_rule(rule: &HeadRule, alphabet: &[i32], form: Form) -> Self {
        let position: HashMap<i32, usize> =
            alphabet.iter().enumerate().map(|(k, s)| (*s, k)).collect();
        let rows = 1usize << alphabet.len();
        let keep = form == Form::SumOfProducts;
        let minterms = (0..rows)
            .filter(|&index| {
                let value = rule.evaluate_with(|lit| match position.get(&lit.abs()) {
                    Some(&k) => ((index >> k) & 1 == 1) == (lit > 0),
                    None => false,
                });
                value == keep
            })
            .collect();
        Self {
            alphabet: alphabet.to_vec(),
            form,
            minterms,
            terms: Vec::new(),
        }
    }

    /// The surface ids, by position.
    pub fn alphabet(&self) -> &[i32] {
        &self.alphabet
    }

    /// The canonical form of this component.
    pub fn form(&self) -> Form {
        self.form
    }

    /// Rows of the truth table collected for this form.
    pub fn minterms(&self) -> &BTreeSet<usize> {
        &self.minterms
    }

    /// Current terms (the prime implicants after [`make_prime`](Self::make_prime)).
    pub fn terms(&self) -> &[BnId] {
        &self.terms
    }

    /// Whether no row was collected.
    pub fn is_empty(&self) -> bool {
        self.minterms.is_empty()
    }

    /// Whether every row was collected.
    pub fn is_full(&self) -> bool {
        self.minterms.len() == 1usize << self.alphabet.len()
    }

    /// Merge implicants to a fixpoint and keep the unconsumed ones.
    pub fn make_prime(&mut self) -> &[BnId] {
        let width = self.alphabet.len();
        let mut current: Vec<BnId> = self
            .minterms
            .iter()
            .map(|&m| BnId::from_minterm(width, m))
            .collect();
        let mut primes = Vec::new();

        while !current.is_empty() {
            // Only implicants with equal don't-care masks and adjacent
            // true counts can merge
            let mut groups: BTreeMap<(u64, usize), Vec<usize>> = BTreeMap::new();
            for (i, b) in current.iter().enumerate() {
                groups
                    .entry((b.dont_care_mask(), b.true_count()))
                    .or_default()
                    .push(i);
            }

            let mut used = vec![false; current.len()];
            let mut next: BTreeMap<Vec<Tri>, BnId> = BTreeMap::new();
            for ((mask, ones), members) in &groups {
                let Some(partners) = groups.get(&(*mask, ones + 1)) else {
                    continue;
                };
                for &i in members {
                    for &j in partners {
                        if let Some(merged) = current[i].combine(&current[j]) {
                            used[i] = true;
                            used[j] = true;
                            match next.get_mut(merged.bits()) {
                                Some(existing) => existing.absorb(merged),
                                None => {
                                    next.insert(merged.bits().to_vec(), merged);
                                }
                            }
                        }
                    }
                }
            }

            for (i, mut b) in current.into_iter().enumerate() {
                if !used[i] {
                    b.mark_prime();
                    primes.push(b);
                }
            }
            current = next.into_values().collect();
        }

        primes.sort_by_key(preference);
        self.terms = primes;
        &self.terms
    }

    /// Choose a cover of the minterms from the prime implicants.
    ///
    /// Essential primes are taken first. The rest is covered exactly by
    /// branch-and-bound when the alphabet has at most `exhaustive_limit`
    /// surfaces, greedily otherwise.
    pub fn select_cover(&self, exhaustive_limit: usize) -> Vec<BnId> {
        let primes = &self.terms;
        let mut chosen: Vec<usize> = Vec::new();

        for m in &self.minterms {
            let mut covering = primes.iter().enumerate().filter(|(_, p)| p.covers().contains(m));
            if let (Some((i, _)), None) = (covering.next(), covering.next()) {
                if !chosen.contains(&i) {
                    chosen.push(i);
                }
            }
        }

        let mut uncovered: BTreeSet<usize> = self.minterms.clone();
        for &i in &chosen {
            for m in primes[i].covers() {
                uncovered.remove(m);
            }
        }

        if !uncovered.is_empty() {
            let candidates: Vec<usize> = (0..primes.len())
                .filter(|i| !chosen.contains(i))
                .filter(|&i| primes[i].covers().iter().any(|m| uncovered.contains(m)))
                .collect();
            let extra = if self.alphabet.len() <= exhaustive_limit {
                self.exact_cover(&uncovered, &candidates)
            } else {
                self.greedy_cover(uncovered, &candidates)
            };
            chosen.extend(extra);
        }

        let mut cover: Vec<BnId> = chosen.into_iter().map(|i| primes[i].clone()).collect();
        cover.sort_by_key(preference);
        cover
    }

    fn greedy_cover(&self, mut uncovered: BTreeSet<usize>, candidates: &[usize]) -> Vec<usize> {
        let primes = &self.terms;
        let mut picked = Vec::new();
        while !uncovered.is_empty() {
            // Candidates are in preference order, so the first maximum wins ties
            let mut best: Option<(usize, usize)> = None;
            for &i in candidates {
                let gain = primes[i].covers().intersection(&uncovered).count();
                if gain > 0 && best.map_or(true, |(_, g)| gain > g) {
                    best = Some((i, gain));
                }
            }
            let Some((i, _)) = best else {
                break;
            };
            for m in primes[i].covers() {
                uncovered.remove(m);
            }
            picked.push(i);
        }
        picked
    }

    fn exact_cover(&self, uncovered: &BTreeSet<usize>, candidates: &[usize]) -> Vec<usize> {
        let mut best: Option<(usize, Vec<usize>)> = None;
        let mut picked = Vec::new();
        self.search(uncovered, candidates, &mut picked, 0, &mut best);
        best.map(|(_, set)| set).unwrap_or_default()
    }

    fn search(
        &self,
        uncovered: &BTreeSet<usize>,
        candidates: &[usize],
        picked: &mut Vec<usize>,
        cost: usize,
        best: &mut Option<(usize, Vec<usize>)>,
    ) {
        if let Some((best_cost, _)) = best {
            if cost >= *best_cost {
                return;
            }
        }
        let Some(first) = uncovered.iter().next() else {
            *best = Some((cost, picked.clone()));
            return;
        };
        for &i in candidates {
            let prime = &self.terms[i];
            if !prime.covers().contains(first) || picked.contains(&i) {
                continue;
            }
            let rest: BTreeSet<usize> = uncovered.difference(prime.covers()).copied().collect();
            picked.push(i);
            self.search(&rest, candidates, picked, cost + prime.fixed_count(), best);
            picked.pop();
        }
    }

    /// Reassemble a cover into a rule tree in this component's form.
    ///
    /// An empty cover or an all-don't-care implicant has no literal form
    /// and yields `None`; callers detect those cases first.
    pub fn to_rule(&self, cover: &[BnId]) -> Option<Rule> {
        let mut terms = Vec::with_capacity(cover.len());
        for implicant in cover {
            let literals: Vec<Rule> = implicant
                .literals()
                .map(|(k, value)| {
                    let surface = self.alphabet[k];
                    // Product-of-sums terms are complemented implicants
                    let positive = match self.form {
                        Form::SumOfProducts => value,
                        Form::ProductOfSums => !value,
                    };
                    Rule::Literal(if positive { surface } else { -surface })
                })
                .collect();
            if literals.is_empty() {
                return None;
            }
            terms.push(match self.form {
                Form::SumOfProducts => wrap(literals, Rule::Intersection),
                Form::ProductOfSums => wrap(literals, Rule::Union),
            });
        }
        if terms.is_empty() {
            return None;
        }
        Some(match self.form {
            Form::SumOfProducts => wrap(terms, Rule::Union),
            Form::ProductOfSums => wrap(terms, Rule::Intersection),
        })
    }

    /// Prime, cover and reassemble in one step.
    pub fn minimize(&mut self, exhaustive_limit: usize) -> Option<Rule> {
        self.make_prime();
        let cover = self.select_cover(exhaustive_limit);
        self.to_rule(&cover)
    }
}

/// Most don't-cares first, then lowest fixed positions.
fn preference(b: &BnId) -> (Reverse<usize>, Vec<usize>) {
    (
        Reverse(b.dont_care_count()),
        b.literals().map(|(k, _)| k).collect(),
    )
}

fn wrap(mut items: Vec<Rule>, node: fn(Vec<Rule>) -> Rule) -> Rule {
    if items.len() == 1 {
        items.remove(0)
    } else {
        node(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn acomp(expr: &str, form: Form) -> Acomp {
        let rule = HeadRule::parse(expr).unwrap();
        let alphabet = rule.surface_set();
        Acomp::from_rule(&rule, &alphabet, form)
    }

    #[test]
    fn test_truth_table() {
        let a = acomp("1 -2", Form::SumOfProducts);
        // bit 0 = surface 1 true, bit 1 = surface 2 false
        assert_eq!(a.minterms(), &BTreeSet::from([0b01]));
        let b = acomp("1 -2", Form::ProductOfSums);
        assert_eq!(b.minterms(), &BTreeSet::from([0b00, 0b10, 0b11]));
    }

    #[test]
    fn test_primes_of_tautological_pair() {
        let mut a = acomp("1 2 + 1 -2", Form::SumOfProducts);
        let primes = a.make_prime();
        assert_eq!(primes.len(), 1);
        assert_eq!(primes[0].to_string(), "-1");
        assert!(primes[0].is_prime());
    }

    #[test]
    fn test_essential_and_redundant_primes() {
        // Consensus theorem: 1 2 + -1 3 + 2 3 has a redundant prime 2 3
        let mut a = acomp("1 2 + -1 3 + 2 3", Form::SumOfProducts);
        assert_eq!(a.make_prime().len(), 3);
        let cover = a.select_cover(6);
        assert_eq!(cover.len(), 2);
        let rule = a.to_rule(&cover).unwrap();
        assert_eq!(rule.to_string(), "1 2 + -1 3");
    }

    #[test]
    fn test_cyclic_cover_exact_and_greedy() {
        // Cyclic function with no essential primes
        let expr = "-1 2 + 1 -2 + 2 -3 + -2 3";
        let mut a = acomp(expr, Form::SumOfProducts);
        a.make_prime();
        let exact = a.select_cover(6);
        let greedy = a.select_cover(0);
        assert_eq!(exact.len(), 3);
        for cover in [&exact, &greedy] {
            let covered: BTreeSet<usize> =
                cover.iter().flat_map(|b| b.covers().iter().copied()).collect();
            assert_eq!(&covered, a.minterms());
        }
    }

    #[test]
    fn test_product_of_sums_reassembly() {
        let mut a = acomp("(1 + 2) (1 + 3)", Form::ProductOfSums);
        let rule = a.minimize(6).unwrap();
        assert_eq!(rule.to_string(), "(1 + 2) (1 + 3)");
    }

    #[test]
    fn test_empty_and_full() {
        let a = acomp("1 -1", Form::SumOfProducts);
        assert!(a.is_empty());
        let b = acomp("1 + -1", Form::SumOfProducts);
        assert!(b.is_full());
        let mut b = b;
        assert!(b.minimize(6).is_none());
    }
}
