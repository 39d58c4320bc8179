use num_traits::Zero;
use std::{fmt, sync::Arc};

use crate::{
    config::CogKind,
    degree::Degree,
    gpair::GPair,
    poly::{
        coefficient::Coefficient,
        divmask::PPWithMask,
        monomial::Monomial,
        polynomial::{FastPolynomial, Polynomial},
    },
    reduce::{reduce, reduce_sugar, reduce_tail, reduce_tail_by_poly, AnyCog, ReductionCog},
    reductors::Reductors,
    ring_info::GRingInfo,
    sugar::Sugar,
};

/// Stable handle of a polynomial in the basis arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GPolyId(pub usize);

/// A Gröbner candidate: the polynomial plus everything the scheduler reads
/// without recomputing. Cached fields are placeholders while the polynomial is zero.
#[derive(Clone)]
pub struct GPoly<C: Coefficient, M: Monomial> {
    poly: FastPolynomial<C, M>,
    lpp: PPWithMask<M>,
    lc: C,
    wdeg: Degree,
    component: usize,
    sugar: Option<Sugar>,
    age: usize,
    is_active: bool,
    minimal_gen_level: Option<usize>,
    ring: Arc<GRingInfo>,
}

impl<C: Coefficient, M: Monomial> GPoly<C, M> {
    pub fn new(poly: FastPolynomial<C, M>, ring: &Arc<GRingInfo>) -> Self {
        let mut gpoly = Self::zero(ring);
        gpoly.poly = poly;
        gpoly.update_cached();
        gpoly
    }

    pub fn zero(ring: &Arc<GRingInfo>) -> Self {
        Self {
            poly: FastPolynomial::new(ring.num_indets(), &[]),
            lpp: ring.with_mask(M::one()),
            lc: C::zero(),
            wdeg: Degree::zero(ring.grading_dim()),
            component: 0,
            sugar: None,
            age: 0,
            is_active: true,
            minimal_gen_level: None,
            ring: ring.clone(),
        }
    }

    fn update_cached(&mut self) {
        match self.poly.leading_term_ref() {
            Some((lc, lpp)) => {
                self.lc = lc.clone();
                self.wdeg = self.ring.wdeg(lpp);
                self.component = self.ring.component(lpp);
                self.lpp = self.ring.with_mask(lpp.clone());
            },
            None => {
                self.lc = C::zero();
                self.wdeg = Degree::zero(self.ring.grading_dim());
                self.component = 0;
                self.lpp = self.ring.with_mask(M::one());
            },
        }
    }

    pub fn initialize_sugar(&mut self) {
        assert!(self.sugar.is_none(), "sugar initialized twice");
        self.sugar = Some(Sugar::new(&self.poly, &self.ring));
    }

    pub fn sugar(&self) -> &Sugar {
        self.sugar.as_ref().expect("sugar read before initialization")
    }

    pub fn poly(&self) -> &FastPolynomial<C, M> {
        &self.poly
    }

    pub fn into_poly(self) -> FastPolynomial<C, M> {
        self.poly
    }

    pub fn lpp(&self) -> &M {
        self.lpp.pp()
    }

    pub fn lpp_for_div(&self) -> &PPWithMask<M> {
        &self.lpp
    }

    pub fn lc(&self) -> &C {
        &self.lc
    }

    pub fn wdeg(&self) -> &Degree {
        &self.wdeg
    }

    pub fn component(&self) -> usize {
        self.component
    }

    pub fn age(&self) -> usize {
        self.age
    }

    pub fn set_age(&mut self, age: usize) {
        self.age = age;
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    pub fn minimal_gen_level(&self) -> Option<usize> {
        self.minimal_gen_level
    }

    pub fn set_minimal_gen_level(&mut self, level: usize) {
        self.minimal_gen_level = Some(level);
    }

    pub fn is_zero(&self) -> bool {
        self.poly.is_zero()
    }

    pub fn num_terms(&self) -> usize {
        self.poly.len()
    }

    pub fn ring(&self) -> &Arc<GRingInfo> {
        &self.ring
    }

    /// Becomes the S-polynomial of `pair`, or its input polynomial for an
    /// input pair, adopting the pair's sugar.
    pub fn assign_spoly(&mut self, pair: &GPair<M>, basis: &[GPoly<C, M>], age: usize) {
        let first = &basis[pair.first().0];
        self.poly = match pair.second() {
            None => first.poly.clone(),
            Some(second) => first.poly.s_polynomial(&basis[second.0].poly),
        };
        self.update_cached();
        self.age = age;
        self.is_active = true;
        self.minimal_gen_level = None;
        self.sugar = pair.sugar().cloned();
    }

    pub fn mul_by_pp(&mut self, pp: &M) {
        self.poly *= pp;
        if let Some(sugar) = self.sugar.as_mut() {
            sugar.mul_pp(pp, &self.ring);
        }
        self.update_cached();
    }

    fn run_cog(&mut self, cog_kind: CogKind, f: impl FnOnce(&mut AnyCog<C, M>, &mut Option<Sugar>)) -> usize {
        if self.poly.is_zero() {
            return 0;
        }
        let poly = std::mem::take(&mut self.poly);
        let mut cog = AnyCog::new(cog_kind, poly);
        f(&mut cog, &mut self.sugar);
        let steps = cog.num_reductions();
        self.poly = cog.release();
        self.poly.normalize();
        self.update_cached();
        steps
    }

    /// Full reduction against `reductors`, tracking sugar when it is set.
    /// The result is monic over a field and content-free over a gcd domain or
    /// its fractions.
    pub fn reduce(
        &mut self,
        reductors: &mut Reductors<C, M>,
        basis: &[GPoly<C, M>],
        cog_kind: CogKind,
    ) -> usize {
        self.run_cog(cog_kind, |cog, sugar| match sugar {
            Some(sugar) => reduce_sugar(cog, sugar, reductors, basis),
            None => reduce(cog, reductors, basis),
        })
    }

    pub fn reduce_tail(
        &mut self,
        reductors: &mut Reductors<C, M>,
        basis: &[GPoly<C, M>],
        cog_kind: CogKind,
    ) -> usize {
        self.run_cog(cog_kind, |cog, _| reduce_tail(cog, reductors, basis))
    }

    pub fn reduce_tail_by(&mut self, g: &GPoly<C, M>, cog_kind: CogKind) -> usize {
        self.run_cog(cog_kind, |cog, _| reduce_tail_by_poly(cog, &g.lpp, &g.poly))
    }

    /// Moves `other` into `self`, leaving `other` a fresh zero polynomial.
    pub fn assign_clear(&mut self, other: &mut GPoly<C, M>) {
        let fresh = GPoly::zero(&other.ring);
        *self = std::mem::replace(other, fresh);
    }

    /// Strips the largest power of the saturating indeterminate dividing
    /// every term and returns the exponent removed.
    pub fn smart_dehomog(&mut self) -> u16 {
        let Some(h) = self.ring.sat_indet() else {
            return 0;
        };
        let power = self
            .poly
            .terms
            .iter()
            .map(|(_, m)| m.exponent(h))
            .min()
            .unwrap_or(0);
        if power > 0 {
            self.poly.divide_by_indet_power(h, power);
            if let Some(sugar) = self.sugar.as_mut() {
                sugar.dehomogenize::<M>(power, &self.ring);
            }
            self.update_cached();
        }
        power
    }
}

impl<C: Coefficient, M: Monomial> fmt::Debug for GPoly<C, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GPoly")
            .field("lpp", self.lpp())
            .field("terms", &self.num_terms())
            .field("sugar", &self.sugar.as_ref().map(|s| s.value()))
            .field("age", &self.age)
            .field("active", &self.is_active)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        poly::monomial::{DegRevLexOrder, FastMonomial},
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

    #[test]
    fn caches_follow_the_polynomial() {
        let f = p(&[(3, &[(0, 2)]), (1, &[(1, 1)])]);
        let ring = GRingInfoBuilder::new(3).build(&[f.clone()]).unwrap();
        let mut g = GPoly::new(f, &ring);
        assert_eq!(g.lpp(), &M::new(&[(0, 2)]));
        assert_eq!(g.lc(), &GF::from(3u64));
        assert_eq!(g.wdeg(), &Degree::from_slice(&[2]));
        g.initialize_sugar();
        g.mul_by_pp(&M::new(&[(2, 1)]));
        assert_eq!(g.lpp(), &M::new(&[(0, 2), (2, 1)]));
        assert_eq!(g.sugar().value(), &Degree::from_slice(&[3]));

        let mut h = GPoly::zero(&ring);
        h.assign_clear(&mut g);
        assert!(g.is_zero());
        assert_eq!(h.num_terms(), 2);
    }

    #[test]
    #[should_panic(expected = "sugar initialized twice")]
    fn sugar_is_set_once() {
        let f = p(&[(1, &[(0, 1)])]);
        let ring = GRingInfoBuilder::new(3).build(&[f.clone()]).unwrap();
        let mut g = GPoly::new(f, &ring);
        g.initialize_sugar();
        g.initialize_sugar();
    }

    #[test]
    fn tail_reduction_by_one_polynomial() {
        // x^2 + x*y reduced in the tail by x*y - z^2 gives x^2 + z^2
        let f = p(&[(1, &[(0, 2)]), (1, &[(0, 1), (1, 1)])]);
        let g = p(&[(1, &[(0, 1), (1, 1)]), (-1, &[(2, 2)])]);
        let ring = GRingInfoBuilder::new(3).build(&[f.clone(), g.clone()]).unwrap();
        let mut f = GPoly::new(f, &ring);
        let g = GPoly::new(g, &ring);
        f.reduce_tail_by(&g, CogKind::Poly);
        assert_eq!(f.poly(), &p(&[(1, &[(0, 2)]), (1, &[(2, 2)])]));
    }

    #[test]
    fn smart_dehomog_strips_common_power() {
        let f = p(&[(1, &[(0, 1), (2, 3)]), (1, &[(1, 2), (2, 2)])]);
        let ring = GRingInfoBuilder::new(3).saturating(2).build(&[f.clone()]).unwrap();
        let mut g = GPoly::new(f, &ring);
        g.initialize_sugar();
        assert_eq!(g.smart_dehomog(), 2);
        assert_eq!(g.poly(), &p(&[(1, &[(0, 1), (2, 1)]), (1, &[(1, 2)])]));
        assert_eq!(g.sugar().value(), &Degree::from_slice(&[2]));
        assert_eq!(g.smart_dehomog(), 0);
    }
}
