use std::sync::Arc;

use crate::{
    config::CogKind,
    gpoly::{GPoly, GPolyId},
    poly::{coefficient::Coefficient, divmask::PPWithMask, monomial::Monomial, polynomial::Polynomial},
    ring_info::GRingInfo,
};

/// Where a reducer lives: in the basis arena or among the Borel clones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducerRef {
    Basis(GPolyId),
    Borel(usize),
}

#[derive(Debug, Clone)]
struct ReductorData<M: Monomial> {
    target: ReducerRef,
    origin: GPolyId,
    key: PPWithMask<M>,
    // (degree of the leading power-product, age)
    order: (u16, usize),
    count: usize,
    not_to_be_used: bool,
    borel_updated: bool,
}

/// Index of the polynomials used for reduction, kept in ascending
/// `(degree, age)` order so that the oldest low-degree reducer wins.
///
/// With Borel reducers enabled, every inserted polynomial `f` also gets a
/// clone `f * x^k`, where `x` is the last plain indeterminate. Once a clone
/// has served `borel_threshold` lookups it is refreshed to the cofactor seen
/// last and tail-reduced, so later reductions start from a shorter polynomial.
pub struct Reductors<C: Coefficient, M: Monomial> {
    ring: Arc<GRingInfo>,
    entries: Vec<ReductorData<M>>,
    borel_entries: Vec<ReductorData<M>>,
    borel_polys: Vec<GPoly<C, M>>,
    use_borel: bool,
    borel_threshold: usize,
    cog: CogKind,
}

fn pair_mut<T>(v: &mut [T], a: usize, b: usize) -> (&mut T, &T) {
    assert_ne!(a, b);
    if a < b {
        let (lo, hi) = v.split_at_mut(b);
        (&mut lo[a], &hi[0])
    } else {
        let (lo, hi) = v.split_at_mut(a);
        (&mut hi[0], &lo[b])
    }
}

fn tail_divisible_by<C: Coefficient, M: Monomial>(g: &GPoly<C, M>, lpp: &M) -> bool {
    g.poly().trailing_terms().iter().any(|(_, m)| lpp.divides(m))
}

impl<C: Coefficient, M: Monomial> Reductors<C, M> {
    pub fn new(ring: &Arc<GRingInfo>, use_borel: bool, borel_threshold: usize, cog: CogKind) -> Self {
        Self {
            ring: ring.clone(),
            entries: Vec::new(),
            borel_entries: Vec::new(),
            borel_polys: Vec::new(),
            use_borel: use_borel && ring.borel_indet().is_some(),
            borel_threshold,
            cog,
        }
    }

    pub fn ring(&self) -> &Arc<GRingInfo> {
        &self.ring
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: GPolyId) -> bool {
        self.entries.iter().any(|e| e.origin == id)
    }

    /// Registered basis elements in reduction order.
    pub fn ids(&self) -> impl Iterator<Item = GPolyId> + '_ {
        self.entries.iter().map(|e| e.origin)
    }

    pub fn num_borel(&self) -> usize {
        self.borel_polys.len()
    }

    fn entry_for(id: GPolyId, g: &GPoly<C, M>, target: ReducerRef, count: usize) -> ReductorData<M> {
        ReductorData {
            target,
            origin: id,
            key: g.lpp_for_div().clone(),
            order: (g.lpp().degree(), g.age()),
            count,
            not_to_be_used: false,
            borel_updated: true,
        }
    }

    fn insert_sorted(entries: &mut Vec<ReductorData<M>>, entry: ReductorData<M>) {
        entries.push(entry);
        let mut i = entries.len() - 1;
        while i > 0 && entries[i - 1].order > entries[i].order {
            entries.swap(i - 1, i);
            i -= 1;
        }
    }

    pub fn insert(&mut self, id: GPolyId, g: &GPoly<C, M>, count: usize) {
        debug_assert!(!g.is_zero(), "zero polynomial as reductor");
        Self::insert_sorted(&mut self.entries, Self::entry_for(id, g, ReducerRef::Basis(id), count));
        if self.use_borel {
            let slot = self.borel_polys.len();
            self.borel_polys.push(g.clone());
            let mut entry = Self::entry_for(id, g, ReducerRef::Borel(slot), 0);
            entry.borel_updated = false;
            Self::insert_sorted(&mut self.borel_entries, entry);
        }
    }

    /// Refreshes the cached keys of `id` after its polynomial changed.
    pub fn reinsert(&mut self, id: GPolyId, g: &GPoly<C, M>) {
        let count = self
            .entries
            .iter()
            .find(|e| e.origin == id)
            .map_or(0, |e| e.count);
        self.remove(id);
        self.insert(id, g, count);
    }

    pub fn remove(&mut self, id: GPolyId) {
        self.entries.retain(|e| e.origin != id);
        // slots stay allocated so that other Borel references remain valid
        for entry in self.borel_entries.iter_mut().filter(|e| e.origin == id) {
            entry.not_to_be_used = true;
        }
    }

    pub fn set_not_to_be_used(&mut self, id: GPolyId, flag: bool) {
        for entry in self
            .entries
            .iter_mut()
            .chain(self.borel_entries.iter_mut())
            .filter(|e| e.origin == id)
        {
            entry.not_to_be_used = flag;
        }
    }

    /// Invalidates every Borel clone; called when the scheduler moves to a new degree.
    pub fn borel_reductors_update_in_next_degree(&mut self) {
        self.borel_entries.iter_mut().for_each(|e| e.borel_updated = false);
    }

    pub fn get<'a>(&'a self, found: ReducerRef, basis: &'a [GPoly<C, M>]) -> &'a GPoly<C, M> {
        match found {
            ReducerRef::Basis(id) => &basis[id.0],
            ReducerRef::Borel(slot) => &self.borel_polys[slot],
        }
    }

    /// First usable reducer whose leading power-product divides `pp`.
    pub fn find_reducer(&mut self, pp: &PPWithMask<M>, basis: &[GPoly<C, M>]) -> Option<ReducerRef> {
        if self.use_borel {
            if let Some(found) = self.find_borel_reducer(pp, basis) {
                return Some(found);
            }
        }
        let entry = self
            .entries
            .iter_mut()
            .find(|e| !e.not_to_be_used && e.key.divides(pp))?;
        entry.count += 1;
        Some(entry.target)
    }

    fn find_borel_reducer(&mut self, pp: &PPWithMask<M>, basis: &[GPoly<C, M>]) -> Option<ReducerRef> {
        for idx in 0..self.borel_entries.len() {
            let entry = &mut self.borel_entries[idx];
            if entry.not_to_be_used || !basis[entry.origin.0].lpp_for_div().divides(pp) {
                continue;
            }
            entry.count += 1;
            if entry.count < self.borel_threshold {
                continue;
            }
            if !entry.borel_updated || !entry.key.divides(pp) {
                self.refresh_borel(idx, pp, basis);
            }
            let entry = &self.borel_entries[idx];
            if entry.key.divides(pp) {
                return Some(entry.target);
            }
        }
        None
    }

    /// Rebuilds the Borel clone `idx` as `origin * x^k`, with `x^k` the part of
    /// `pp` in the Borel indeterminate beyond the origin, and tail-reduces it
    /// against the primary reductors.
    fn refresh_borel(&mut self, idx: usize, pp: &PPWithMask<M>, basis: &[GPoly<C, M>]) {
        let Some(var) = self.ring.borel_indet() else {
            return;
        };
        let origin = &basis[self.borel_entries[idx].origin.0];
        let k = (pp.pp().clone() / origin.lpp()).map_or(0, |q| q.exponent(var));
        let mut clone = origin.clone();
        if k > 0 {
            clone.mul_by_pp(&M::new(&[(var, k)]));
        }
        let cog = self.cog;
        let saved = std::mem::replace(&mut self.use_borel, false);
        clone.reduce_tail(self, basis, cog);
        self.use_borel = saved;

        let ReducerRef::Borel(slot) = self.borel_entries[idx].target else {
            unreachable!("Borel entry pointing into the basis")
        };
        let entry = &mut self.borel_entries[idx];
        entry.key = clone.lpp_for_div().clone();
        entry.order = (clone.lpp().degree(), clone.age());
        entry.borel_updated = true;
        self.borel_polys[slot] = clone;
    }

    fn others(&self, id: GPolyId, basis: &[GPoly<C, M>]) -> Vec<GPolyId> {
        self.entries
            .iter()
            .map(|e| e.origin)
            .filter(|&other| other != id && basis[other.0].is_active())
            .collect()
    }

    /// Tail-reduces every other reductor by the newly inserted `id` alone.
    /// Returns the number of polynomials that changed.
    pub fn interreduce(&mut self, id: GPolyId, basis: &mut [GPoly<C, M>]) -> usize {
        let mut changed = 0;
        for other in self.others(id, basis) {
            let (g, f) = pair_mut(basis, other.0, id.0);
            if tail_divisible_by(g, f.lpp()) {
                g.reduce_tail_by(f, self.cog);
                changed += 1;
            }
        }
        changed
    }

    /// As [`Reductors::interreduce`], but only scans reductors of the same
    /// degree as `id`, from the newest down.
    pub fn ordered_interreduce(&mut self, id: GPolyId, basis: &mut [GPoly<C, M>]) -> usize {
        let degree = basis[id.0].lpp().degree();
        let same_degree: Vec<GPolyId> = self
            .entries
            .iter()
            .rev()
            .skip_while(|e| e.order.0 > degree)
            .take_while(|e| e.order.0 >= degree)
            .map(|e| e.origin)
            .filter(|&other| other != id && basis[other.0].is_active())
            .collect();
        let mut changed = 0;
        for other in same_degree {
            let (g, f) = pair_mut(basis, other.0, id.0);
            if tail_divisible_by(g, f.lpp()) {
                g.reduce_tail_by(f, self.cog);
                changed += 1;
            }
        }
        changed
    }

    /// Fully tail-reduces, against all reductors, every other reductor whose
    /// tail `id` can reduce.
    pub fn super_interreduce(&mut self, id: GPolyId, basis: &mut [GPoly<C, M>]) -> usize {
        let cog = self.cog;
        let mut changed = 0;
        for other in self.others(id, basis) {
            if !tail_divisible_by(&basis[other.0], basis[id.0].lpp()) {
                continue;
            }
            let fresh = GPoly::zero(&self.ring);
            let mut g = std::mem::replace(&mut basis[other.0], fresh);
            self.set_not_to_be_used(other, true);
            g.reduce_tail(self, basis, cog);
            self.set_not_to_be_used(other, false);
            basis[other.0] = g;
            changed += 1;
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        poly::{
            monomial::{DegRevLexOrder, FastMonomial},
            polynomial::FastPolynomial,
        },
        ring_info::GRingInfoBuilder,
        GF,
    };

    type M = FastMonomial<1, DegRevLexOrder>;
    type P = FastPolynomial<GF, M>;

    fn p(terms: &[(i64, &[(usize, u16)])]) -> P {
        let terms: Vec<(GF, M)> = terms
            .iter()
            .map(|&(c, m)| {
                let v = GF::from(c.unsigned_abs());
                (if c < 0 { -v } else { v }, M::new(m))
            })
            .collect();
        P::new(3, &terms)
    }

    fn basis_of(polys: &[P]) -> (Arc<GRingInfo>, Vec<GPoly<GF, M>>) {
        let ring = GRingInfoBuilder::new(3).build(polys).unwrap();
        let basis = polys
            .iter()
            .enumerate()
            .map(|(age, f)| {
                let mut g = GPoly::new(f.clone(), &ring);
                g.initialize_sugar();
                g.set_age(age);
                g
            })
            .collect();
        (ring, basis)
    }

    #[test]
    fn lookup_prefers_low_degree_and_skips_unusable() {
        let (ring, basis) = basis_of(&[
            p(&[(1, &[(0, 2)])]),
            p(&[(1, &[(0, 1)]), (1, &[(1, 1)])]),
        ]);
        let mut reductors = Reductors::new(&ring, false, 100, CogKind::Poly);
        reductors.insert(GPolyId(0), &basis[0], 0);
        reductors.insert(GPolyId(1), &basis[1], 0);
        assert_eq!(reductors.ids().collect::<Vec<_>>(), vec![GPolyId(1), GPolyId(0)]);

        let x3 = ring.with_mask(M::new(&[(0, 3)]));
        assert_eq!(reductors.find_reducer(&x3, &basis), Some(ReducerRef::Basis(GPolyId(1))));
        reductors.set_not_to_be_used(GPolyId(1), true);
        assert_eq!(reductors.find_reducer(&x3, &basis), Some(ReducerRef::Basis(GPolyId(0))));
        reductors.remove(GPolyId(0));
        assert_eq!(reductors.find_reducer(&x3, &basis), None);
        assert_eq!(reductors.find_reducer(&ring.with_mask(M::one()), &basis), None);
    }

    #[test]
    fn borel_clone_after_threshold() {
        let (ring, basis) = basis_of(&[p(&[(1, &[(0, 1)]), (1, &[(1, 1)])])]);
        let mut reductors = Reductors::new(&ring, true, 2, CogKind::Geobucket);
        reductors.insert(GPolyId(0), &basis[0], 0);
        let target = ring.with_mask(M::new(&[(0, 1), (2, 2)]));
        // first lookup only counts
        assert_eq!(reductors.find_reducer(&target, &basis), Some(ReducerRef::Basis(GPolyId(0))));
        let found = reductors.find_reducer(&target, &basis);
        assert_eq!(found, Some(ReducerRef::Borel(0)));
        let clone = reductors.get(found.unwrap(), &basis);
        assert_eq!(clone.lpp(), &M::new(&[(0, 1), (2, 2)]));
        assert_eq!(clone.sugar().value().first(), 3);
    }

    #[test]
    fn interreduction_by_a_new_element() {
        let (ring, mut basis) = basis_of(&[
            p(&[(1, &[(0, 2)]), (1, &[(1, 2)])]),
            p(&[(1, &[(1, 2)]), (-1, &[(2, 2)])]),
        ]);
        let mut reductors = Reductors::new(&ring, false, 100, CogKind::Poly);
        reductors.insert(GPolyId(0), &basis[0], 0);
        reductors.insert(GPolyId(1), &basis[1], 0);
        assert_eq!(reductors.ordered_interreduce(GPolyId(1), &mut basis), 1);
        assert_eq!(basis[0].poly(), &p(&[(1, &[(0, 2)]), (1, &[(2, 2)])]));
        assert_eq!(reductors.interreduce(GPolyId(1), &mut basis), 0);
    }

    #[test]
    fn super_interreduction_uses_every_reductor() {
        let (ring, mut basis) = basis_of(&[
            p(&[(1, &[(0, 2)]), (1, &[(1, 2)])]),
            p(&[(1, &[(1, 2)]), (-1, &[(2, 1)])]),
            p(&[(1, &[(2, 1)]), (-1, &[])]),
        ]);
        let mut reductors = Reductors::new(&ring, false, 100, CogKind::Geobucket);
        for i in 0..3 {
            reductors.insert(GPolyId(i), &basis[i], 0);
        }
        // y^2 in the tail of x^2 + y^2 goes to z, and z goes on to 1
        assert_eq!(reductors.super_interreduce(GPolyId(1), &mut basis), 1);
        assert_eq!(basis[0].poly(), &p(&[(1, &[(0, 2)]), (1, &[])]));
        assert_eq!(basis[2].poly(), &p(&[(1, &[(2, 1)]), (-1, &[])]));
        let x2 = ring.with_mask(M::new(&[(0, 2)]));
        assert_eq!(reductors.find_reducer(&x2, &basis), Some(ReducerRef::Basis(GPolyId(0))));
    }
}
