//! Enumeration of the standard monomials of a zero-dimensional ideal.

use std::collections::BTreeSet;

use hashbrown::HashSet;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    error::{ErrorCode, GbError, Result},
    poly::monomial::Monomial,
};

/// Grows a quotient basis one corner at a time.
///
/// Corners are the power-products all of whose indeterminate divisors are
/// already in the quotient basis. Each corner is decided by the caller: it
/// either joins the basis or the avoid set, whose multiples never become
/// corners again.
#[derive(Debug, Clone)]
pub struct QBGenerator<M: Monomial> {
    num_indets: usize,
    qb: Vec<M>,
    qb_set: HashSet<M>,
    corners: BTreeSet<M>,
    avoid: Vec<M>,
}

impl<M: Monomial> QBGenerator<M> {
    pub fn new(num_indets: usize) -> Self {
        Self {
            num_indets,
            qb: Vec::new(),
            qb_set: HashSet::new(),
            corners: BTreeSet::from([M::one()]),
            avoid: Vec::new(),
        }
    }

    pub fn qb(&self) -> &[M] {
        &self.qb
    }

    pub fn avoid_set(&self) -> &[M] {
        &self.avoid
    }

    /// Smallest corner first.
    pub fn corners(&self) -> impl Iterator<Item = &M> {
        self.corners.iter()
    }

    pub fn next_corner(&self) -> Option<&M> {
        self.corners.first()
    }

    pub fn corner_into_qb(&mut self, pp: M) {
        assert!(self.corners.remove(&pp), "not a corner: {:?}", pp);
        self.qb_set.insert(pp.clone());
        for var in 0..self.num_indets {
            let next = pp.clone() * &M::new(&[(var, 1)]);
            if self.qb_set.contains(&next) || self.avoid.iter().any(|a| a.divides(&next)) {
                continue;
            }
            let all_divisors_in_qb = next.exponents().into_iter().all(|(v, _)| {
                let mut divisor = next.clone();
                divisor.divide_by_indet_power(v, 1);
                self.qb_set.contains(&divisor)
            });
            if all_divisors_in_qb {
                self.corners.insert(next);
            }
        }
        self.qb.push(pp);
    }

    pub fn corner_into_avoid_set(&mut self, pp: M) {
        assert!(self.corners.remove(&pp), "not a corner: {:?}", pp);
        self.corners.retain(|c| !pp.divides(c));
        self.avoid.push(pp);
    }
}

/// The power-products not divisible by any of `lpps`, ascending.
pub fn quotient_basis<M: Monomial>(lpps: &[M], num_indets: usize) -> Result<Vec<M>> {
    if lpps.iter().any(|m| m.is_constant()) {
        return Ok(Vec::new());
    }
    let zero_dim = (0..num_indets).into_par_iter().all(|var| {
        lpps
            .iter()
            .any(|m| m.exponent(var) > 0 && m.exponent(var) == m.degree())
    });
    if !zero_dim {
        return Err(GbError::new(ErrorCode::NotZeroDim, "quotient_basis"));
    }

    let mut generator = QBGenerator::new(num_indets);
    while let Some(corner) = generator.next_corner().cloned() {
        if lpps.par_iter().any(|m| m.divides(&corner)) {
            generator.corner_into_avoid_set(corner);
        } else {
            generator.corner_into_qb(corner);
        }
    }
    let mut qb = generator.qb;
    qb.sort();
    debug!(len = qb.len(), "quotient basis");
    Ok(qb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::monomial::{DegRevLexOrder, FastMonomial};

    type M = FastMonomial<1, DegRevLexOrder>;

    #[test]
    fn standard_monomials_of_squares() {
        let lpps = vec![M::new(&[(0, 2)]), M::new(&[(1, 2)])];
        let qb = quotient_basis(&lpps, 2).unwrap();
        assert_eq!(
            qb,
            vec![
                M::one(),
                M::new(&[(1, 1)]),
                M::new(&[(0, 1)]),
                M::new(&[(0, 1), (1, 1)]),
            ]
        );
    }

    #[test]
    fn staircase_with_a_mixed_corner() {
        // x^2, xy, y^3: 1, y, y^2, x
        let lpps = vec![M::new(&[(0, 2)]), M::new(&[(0, 1), (1, 1)]), M::new(&[(1, 3)])];
        let qb = quotient_basis(&lpps, 2).unwrap();
        assert_eq!(qb.len(), 4);
        assert!(qb.iter().all(|m| !lpps.iter().any(|l| l.divides(m))));
    }

    #[test]
    fn positive_dimension_and_unit_ideal() {
        let err = quotient_basis(&[M::new(&[(0, 2)])], 2).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotZeroDim);
        assert!(quotient_basis(&[M::one()], 2).unwrap().is_empty());
        assert_eq!(quotient_basis::<M>(&[], 0).unwrap(), vec![M::one()]);
    }

    #[test]
    fn corners_move_between_sets() {
        let mut generator: QBGenerator<M> = QBGenerator::new(2);
        generator.corner_into_qb(M::one());
        let corners: Vec<M> = generator.corners().cloned().collect();
        assert_eq!(corners, vec![M::new(&[(1, 1)]), M::new(&[(0, 1)])]);

        generator.corner_into_avoid_set(M::new(&[(1, 1)]));
        generator.corner_into_qb(M::new(&[(0, 1)]));
        // x*y is a multiple of the avoided y
        let corners: Vec<M> = generator.corners().cloned().collect();
        assert_eq!(corners, vec![M::new(&[(0, 2)])]);
        assert_eq!(generator.qb(), &[M::one(), M::new(&[(0, 1)])]);
        assert_eq!(generator.avoid_set(), &[M::new(&[(1, 1)])]);
    }
}
