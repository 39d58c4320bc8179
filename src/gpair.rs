use std::cmp::Ordering;

use crate::{
    error::{ErrorCode, GbError, Result},
    gpoly::{GPoly, GPolyId},
    poly::{coefficient::Coefficient, divmask::PPWithMask, monomial::Monomial},
    sugar::Sugar,
};

/// A pending S-polynomial, or an input polynomial awaiting its first reduction.
#[derive(Debug, Clone)]
pub struct GPair<M: Monomial> {
    first: GPolyId,
    second: Option<GPolyId>,
    first_index: usize,
    second_index: usize,
    lcm: PPWithMask<M>,
    sugar: Option<Sugar>,
    coprime: bool,
    component: usize,
}

impl<M: Monomial> GPair<M> {
    /// The input pair for `g`, the `position`-th input polynomial.
    pub fn input<C: Coefficient>(id: GPolyId, g: &GPoly<C, M>, position: usize) -> Self {
        Self {
            first: id,
            second: None,
            first_index: position,
            second_index: 0,
            lcm: g.lpp_for_div().clone(),
            sugar: Some(g.sugar().clone()),
            coprime: false,
            component: g.component(),
        }
    }

    /// The pair of two basis elements; the older one becomes `first`.
    /// Sugar is filled in by [`GPair::complete`].
    pub fn new<C: Coefficient>(
        i: GPolyId,
        gi: &GPoly<C, M>,
        j: GPolyId,
        gj: &GPoly<C, M>,
    ) -> Self {
        let ((first, f), (second, s)) = if gi.age() <= gj.age() {
            ((i, gi), (j, gj))
        } else {
            ((j, gj), (i, gi))
        };
        let ring = f.ring();
        let lcm = f.lpp_for_div().lcm(s.lpp_for_div(), ring.div_mask_rule());
        Self {
            first,
            second: Some(second),
            first_index: f.age(),
            second_index: s.age(),
            lcm,
            sugar: None,
            coprime: f.lpp().is_coprime(s.lpp()),
            component: f.component(),
        }
    }

    /// Sets the sugar of a regular pair from its two sources.
    pub fn complete<C: Coefficient>(&mut self, basis: &[GPoly<C, M>]) -> Result<()> {
        if self.sugar.is_some() {
            return Ok(());
        }
        let internal = || GbError::new(ErrorCode::Internal, "GPair::complete");
        debug_assert!(self.second.is_some(), "input pairs are born complete");
        let f = &basis[self.first.0];
        let s = &basis[self.second.ok_or_else(internal)?.0];
        let t_f = (self.lcm.pp().clone() / f.lpp()).ok_or_else(internal)?;
        let t_s = (self.lcm.pp().clone() / s.lpp()).ok_or_else(internal)?;
        self.sugar = Some(Sugar::of_pair(f.sugar(), &t_f, s.sugar(), &t_s, f.ring()));
        Ok(())
    }

    pub fn first(&self) -> GPolyId {
        self.first
    }

    pub fn second(&self) -> Option<GPolyId> {
        self.second
    }

    pub fn is_input(&self) -> bool {
        self.second.is_none()
    }

    /// Input position for input pairs.
    pub fn input_position(&self) -> Option<usize> {
        self.is_input().then_some(self.first_index)
    }

    pub fn lcm(&self) -> &PPWithMask<M> {
        &self.lcm
    }

    /// `None` until [`GPair::complete`] ran.
    pub fn sugar(&self) -> Option<&Sugar> {
        self.sugar.as_ref()
    }

    pub fn is_coprime(&self) -> bool {
        self.coprime
    }

    pub fn component(&self) -> usize {
        self.component
    }
}

impl<M: Monomial> PartialEq for GPair<M> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<M: Monomial> Eq for GPair<M> {}

impl<M: Monomial> PartialOrd for GPair<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sugar first, regular pairs before input pairs, then lcm, then positions.
impl<M: Monomial> Ord for GPair<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sugar
            .cmp(&other.sugar)
            .then_with(|| self.is_input().cmp(&other.is_input()))
            .then_with(|| self.lcm.cmp(&other.lcm))
            .then_with(|| self.first_index.cmp(&other.first_index))
            .then_with(|| self.second_index.cmp(&other.second_index))
    }
}

/// Pending pairs, sorted so that the smallest pair is popped first.
#[derive(Debug, Clone)]
pub struct GPairList<M: Monomial> {
    // descending, so the front of the queue is the back of the vector
    pairs: Vec<GPair<M>>,
}

impl<M: Monomial> Default for GPairList<M> {
    fn default() -> Self {
        Self { pairs: Vec::new() }
    }
}

impl<M: Monomial> GPairList<M> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pop_front(&mut self) -> Option<GPair<M>> {
        self.pairs.pop()
    }

    /// Merges complete pairs into the queue.
    pub fn merge(&mut self, mut new_pairs: Vec<GPair<M>>) {
        if new_pairs.is_empty() {
            return;
        }
        new_pairs.sort_by(|a, b| b.cmp(a));
        let old = std::mem::take(&mut self.pairs);
        let mut merged = Vec::with_capacity(old.len() + new_pairs.len());
        let mut old = old.into_iter().peekable();
        for pair in new_pairs {
            while let Some(p) = old.next_if(|p| p > &pair) {
                merged.push(p);
            }
            merged.push(pair);
        }
        merged.extend(old);
        self.pairs = merged;
    }

    /// Keeps the pairs satisfying `keep`, returns how many were dropped.
    pub fn retain(&mut self, keep: impl FnMut(&GPair<M>) -> bool) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(keep);
        before - self.pairs.len()
    }

    /// In processing order.
    pub fn iter(&self) -> impl Iterator<Item = &GPair<M>> {
        self.pairs.iter().rev()
    }
}
