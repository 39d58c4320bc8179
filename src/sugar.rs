//! Sugar degree: the degree a polynomial would have if the whole computation
//! had been homogenized. It orders the pair queue for non-homogeneous input.

use std::cmp::Ordering;

use crate::{
    degree::Degree,
    poly::{coefficient::Coefficient, monomial::Monomial, polynomial::FastPolynomial},
    ring_info::GRingInfo,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SugarKind {
    /// Homogeneous input: weighted degree of the leading power-product, fixed.
    Const,
    /// Maximum standard degree over the terms, ignoring component and saturating indets.
    StdDeg,
    /// Maximum weighted degree over the terms.
    WDeg,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sugar {
    kind: SugarKind,
    value: Degree,
}

impl Sugar {
    pub fn new<C: Coefficient, M: Monomial>(poly: &FastPolynomial<C, M>, ring: &GRingInfo) -> Self {
        let kind = ring.sugar_kind();
        let value = match kind {
            SugarKind::Const => poly
                .lpp()
                .map(|lpp| ring.wdeg(lpp))
                .unwrap_or_else(|| Degree::zero(ring.grading_dim())),
            SugarKind::StdDeg | SugarKind::WDeg => poly
                .terms
                .iter()
                .map(|(_, m)| ring.sugar_deg(kind, m))
                .max()
                .unwrap_or_else(|| ring.sugar_deg(kind, &M::one())),
        };
        Self { kind, value }
    }

    pub fn kind(&self) -> SugarKind {
        self.kind
    }

    pub fn value(&self) -> &Degree {
        &self.value
    }

    pub fn mul_pp<M: Monomial>(&mut self, pp: &M, ring: &GRingInfo) {
        self.value += &ring.sugar_deg(self.kind, pp);
    }

    /// Sugar of `self` after subtracting `cofactor * reductor`.
    pub fn update<M: Monomial>(&mut self, cofactor: &M, reductor: &Sugar, ring: &GRingInfo) {
        if self.kind == SugarKind::Const {
            return;
        }
        let candidate = &reductor.value + &ring.sugar_deg(self.kind, cofactor);
        self.value.max_assign(&candidate);
    }

    /// Sugar of the pair `(t_a * a, t_b * b)`.
    pub fn of_pair<M: Monomial>(a: &Sugar, t_a: &M, b: &Sugar, t_b: &M, ring: &GRingInfo) -> Self {
        let mut left = a.clone();
        left.mul_pp(t_a, ring);
        let mut right = b.clone();
        right.mul_pp(t_b, ring);
        if right.value > left.value {
            right
        } else {
            left
        }
    }

    /// Accounts for dividing the polynomial by `h^power`, `h` the saturating indet.
    pub fn dehomogenize<M: Monomial>(&mut self, power: u16, ring: &GRingInfo) {
        if let Some(h) = ring.sat_indet() {
            let drop = ring.sugar_deg(self.kind, &M::new(&[(h, power)]));
            self.value = &self.value - &drop;
        }
    }
}

impl PartialOrd for Sugar {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Sugar {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}
