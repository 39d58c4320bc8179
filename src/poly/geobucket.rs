//! Geobucket accumulator for long reductions.
//!
//! Bucket `i` holds at most `4^(i+1)` terms. Adding a polynomial merges it
//! into the first bucket large enough and carries overflow upwards, so each
//! term is merged O(log n) times instead of once per reduction step.

use num_traits::Zero;

use crate::poly::{
    coefficient::{gcd_of, Coefficient},
    monomial::Monomial,
    polynomial::{FastPolynomial, Polynomial},
};

#[derive(Clone, Debug)]
pub struct Geobucket<C: Coefficient, M: Monomial> {
    num_of_vars: usize,
    buckets: Vec<FastPolynomial<C, M>>,
}

impl<C: Coefficient, M: Monomial> Geobucket<C, M> {
    pub fn new(num_of_vars: usize) -> Self {
        Self {
            num_of_vars,
            buckets: Vec::new(),
        }
    }

    pub fn from_poly(poly: FastPolynomial<C, M>) -> Self {
        let mut bucket = Self::new(poly.num_of_vars());
        bucket.add_poly(poly);
        bucket
    }

    #[inline]
    fn bucket_capacity(i: usize) -> usize {
        4 << (2 * i)
    }

    pub fn add_poly(&mut self, poly: FastPolynomial<C, M>) {
        if poly.is_zero() {
            return;
        }
        let mut i = 0;
        while Self::bucket_capacity(i) < poly.len() {
            i += 1;
        }
        let mut chunk = poly;
        loop {
            while self.buckets.len() <= i {
                self.buckets.push(FastPolynomial::new(self.num_of_vars, &[]));
            }
            if self.buckets[i].is_zero() {
                self.buckets[i] = chunk;
                break;
            }
            chunk += &std::mem::take(&mut self.buckets[i]);
            if chunk.len() <= Self::bucket_capacity(i) {
                self.buckets[i] = chunk;
                break;
            }
            i += 1;
        }
    }

    /// `self += c * t * poly`
    pub fn add_mul(&mut self, c: &C, t: &M, poly: &FastPolynomial<C, M>) {
        if c.is_zero() {
            return;
        }
        self.add_poly(poly * &(c.clone(), t.clone()));
    }

    pub fn scale(&mut self, c: &C) {
        self.buckets.iter_mut().for_each(|b| b.scale(c));
    }

    /// Gcd of `start` and every coefficient held.
    pub fn content_with(&self, start: C) -> C {
        self.buckets
            .iter()
            .fold(start, |g, b| gcd_of(b.terms.iter().rev().map(|(c, _)| c), g))
    }

    pub fn divide_exact(&mut self, c: &C) {
        self.buckets.iter_mut().for_each(|b| b.divide_exact(c));
    }

    /// Collects the leading term into a single bucket and returns its index,
    /// cancelling equal leading monomials across buckets on the way.
    fn settle_leading_term(&mut self) -> Option<usize> {
        loop {
            let top = self
                .buckets
                .iter()
                .enumerate()
                .filter_map(|(i, b)| b.lpp().map(|m| (i, m)))
                .max_by(|(_, a), (_, b)| a.cmp(b))
                .map(|(i, m)| (i, m.clone()))?;
            let (first, lpp) = top;

            let mut sum = C::zero();
            let mut holders = Vec::new();
            for (i, bucket) in self.buckets.iter().enumerate() {
                if bucket.lpp() == Some(&lpp) {
                    holders.push(i);
                }
            }
            if holders.len() == 1 {
                return Some(first);
            }
            for &i in holders.iter() {
                if let Some((c, _)) = self.buckets[i].delete_lm() {
                    sum += &c;
                }
            }
            if !sum.is_zero() {
                self.buckets[holders[0]].terms.push((sum, lpp));
                return Some(holders[0]);
            }
        }
    }

    pub fn leading_term(&mut self) -> Option<(&C, &M)> {
        let i = self.settle_leading_term()?;
        self.buckets[i].leading_term_ref()
    }

    pub fn pop_leading_term(&mut self) -> Option<(C, M)> {
        let i = self.settle_leading_term()?;
        self.buckets[i].delete_lm()
    }

    pub fn is_zero(&mut self) -> bool {
        self.settle_leading_term().is_none()
    }

    pub fn into_poly(self) -> FastPolynomial<C, M> {
        let mut result = FastPolynomial::new(self.num_of_vars, &[]);
        for bucket in self.buckets.iter().filter(|b| !b.is_zero()) {
            result += bucket;
        }
        result
    }
}
