use derivative::Derivative;
use num_traits::{One, Zero};
use std::{
    fmt,
    fmt::Debug,
    hash::Hash,
    ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign},
    vec::Vec,
};

use crate::poly::{
    coefficient::{gcd_of, Coefficient},
    monomial::Monomial,
};

/// Exact division of every coefficient by `c`; a unit `c` leaves the terms alone.
pub(crate) fn divide_terms<C: Coefficient, M>(terms: &mut [(C, M)], c: &C) {
    if c.is_one() {
        return;
    }
    for (coeff, _) in terms.iter_mut() {
        if let Some(q) = coeff.try_div(c) {
            *coeff = q;
        }
    }
}

pub trait Polynomial<C: Coefficient, M: Monomial>:
    Sized
    + Clone
    + Debug
    + Hash
    + PartialEq
    + Eq
    + Add
    + Neg
    + Zero
    + Send
    + Sync
    + for<'a> AddAssign<&'a Self>
    + for<'a> Add<&'a Self, Output = Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> Sub<&'a Self, Output = Self>
    + for<'a> AddAssign<&'a (C, M)>
    + for<'a> Add<&'a (C, M), Output = Self>
    + for<'a> SubAssign<&'a (C, M)>
    + for<'a> Sub<&'a (C, M), Output = Self>
    + for<'a> MulAssign<&'a (C, M)>
    + for<'a> Mul<&'a (C, M), Output = Self>
    + for<'a> MulAssign<&'a M>
    + for<'a> Mul<&'a M, Output = Self>
{
    fn new(num_of_vars: usize, terms: &[(C, M)]) -> Self;

    fn terms(&self) -> &[(C, M)];

    fn degree(&self) -> u16;

    fn num_of_vars(&self) -> usize;

    fn leading_term(&self) -> Option<(C, M)>;

    fn trailing_terms(&self) -> &[(C, M)];

    fn leading_monomial(&self) -> Option<M> {
        self.leading_term().map(|(_, term)| term)
    }

    fn leading_coefficient(&self) -> Option<C> {
        self.leading_term().map(|(coeff, _)| coeff)
    }

    /// `a * t_self * self - b * t_other * other`, with `a / b` the reduced
    /// ratio of the leading coefficients.
    fn s_polynomial(&self, other: &Self) -> Self;

    /// Full division with remainder; no term of the remainder is divisible
    /// by a leading term of `gs` with an exact coefficient quotient.
    fn div_mod_polys(&self, gs: &[Self]) -> (Vec<Self>, Self);
}

/// Stores a sparse multivariate polynomial in coefficient form.
///
/// Terms are kept sorted ascending by the monomial ordering, so the leading
/// term is the last one. Zero coefficients are never stored.
#[derive(Derivative)]
#[derivative(Clone, PartialEq, Eq, Hash, Default(bound = ""))]
pub struct FastPolynomial<C: Coefficient, M: Monomial> {
    #[derivative(PartialEq = "ignore")]
    #[derivative(Hash = "ignore")]
    pub(crate) num_of_vars: usize,
    pub(crate) terms: Vec<(C, M)>,
}

impl<C: Coefficient, M: Monomial> Add for FastPolynomial<C, M> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        self.add(&rhs)
    }
}

impl<C: Coefficient, M: Monomial> Polynomial<C, M> for FastPolynomial<C, M> {
    /// Repeated monomials are merged and cancelling terms dropped.
    fn new(num: usize, terms: &[(C, M)]) -> Self {
        let mut terms = terms.to_vec();
        terms.sort_by(|(_, m1), (_, m2)| m1.cmp(m2));
        let mut terms_dedup: Vec<(C, M)> = Vec::with_capacity(terms.len());
        for term in terms {
            if term.0.is_zero() {
                continue;
            }
            if let Some(prev) = terms_dedup.last_mut() {
                if prev.1 == term.1 {
                    prev.0 += &term.0;
                    if prev.0.is_zero() {
                        terms_dedup.pop();
                    }
                    continue;
                }
            };
            terms_dedup.push(term);
        }

        Self {
            num_of_vars: num,
            terms: terms_dedup,
        }
    }

    fn terms(&self) -> &[(C, M)] {
        self.terms.as_slice()
    }

    fn degree(&self) -> u16 {
        self.terms.last().map(|(_, t)| t.degree()).unwrap_or(0)
    }

    fn num_of_vars(&self) -> usize {
        self.num_of_vars
    }

    fn leading_term(&self) -> Option<(C, M)> {
        self.terms.last().cloned()
    }

    fn trailing_terms(&self) -> &[(C, M)] {
        if self.terms.len() > 1 {
            &self.terms[..self.terms.len() - 1]
        } else {
            &[]
        }
    }

    fn s_polynomial(&self, other: &Self) -> Self {
        let (coeff_self, lm_self) = self
            .leading_term_ref()
            .expect("s-polynomial of the zero polynomial");
        let (coeff_other, lm_other) = other
            .leading_term_ref()
            .expect("s-polynomial of the zero polynomial");

        let lcm = lm_self.lcm(lm_other);
        let t_self = (lcm.clone() / lm_self).expect("lcm is a multiple");
        let t_other = (lcm / lm_other).expect("lcm is a multiple");

        let g = Coefficient::gcd(coeff_self, coeff_other);
        let a = coeff_other.try_div(&g).unwrap_or_else(|| coeff_other.clone());
        let b = coeff_self.try_div(&g).unwrap_or_else(|| coeff_self.clone());

        let mut result = self * &(a, t_self);
        result.sub_mul(&b, &t_other, other);
        result
    }

    fn div_mod_polys(&self, gs: &[Self]) -> (Vec<Self>, Self) {
        let mut qs: Vec<Self> = (0..gs.len())
            .map(|_| Self::new(self.num_of_vars, &[]))
            .collect();
        let mut rest = self.clone();
        let mut remainder = Vec::new();

        while let Some((r_coefficient, r_monomial)) = rest.terms.last() {
            let hit = gs.iter().enumerate().find_map(|(i, divisor)| {
                let (g_coefficient, g_monomial) = divisor.leading_term_ref()?;
                let t_monomial = (r_monomial.clone() / g_monomial)?;
                let t_coefficient = r_coefficient.try_div(g_coefficient)?;
                Some((i, t_coefficient, t_monomial))
            });

            match hit {
                Some((i, t_coefficient, t_monomial)) => {
                    rest.sub_mul(&t_coefficient, &t_monomial, &gs[i]);
                    qs[i] += &(t_coefficient, t_monomial);
                },
                None => remainder.extend(rest.terms.pop()),
            }
        }

        remainder.reverse();
        (
            qs,
            Self {
                num_of_vars: self.num_of_vars,
                terms: remainder,
            },
        )
    }
}

impl<C: Coefficient, M: Monomial> FastPolynomial<C, M> {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn leading_term_ref(&self) -> Option<(&C, &M)> {
        self.terms.last().map(|(c, m)| (c, m))
    }

    pub fn lpp(&self) -> Option<&M> {
        self.terms.last().map(|(_, m)| m)
    }

    pub fn lc(&self) -> Option<&C> {
        self.terms.last().map(|(c, _)| c)
    }

    /// Removes and returns the leading term.
    pub fn delete_lm(&mut self) -> Option<(C, M)> {
        self.terms.pop()
    }

    /// Highest indeterminate index occurring in any term.
    pub fn max_indet(&self) -> Option<usize> {
        self.terms
            .iter()
            .filter_map(|(_, m)| m.exponents().last().map(|&(var, _)| var))
            .max()
    }

    /// Merges an ascending stream of terms into `self`.
    fn merge_terms(&mut self, other: impl Iterator<Item = (C, M)>) {
        let lhs = std::mem::take(&mut self.terms);
        let (lower, _) = other.size_hint();
        let mut merged = Vec::with_capacity(lhs.len() + lower);
        let mut lhs = lhs.into_iter().peekable();
        for (coeff, monomial) in other {
            while let Some(term) = lhs.next_if(|(_, m)| m < &monomial) {
                merged.push(term);
            }
            match lhs.next_if(|(_, m)| m == &monomial) {
                Some((mut c, m)) => {
                    c += &coeff;
                    if !c.is_zero() {
                        merged.push((c, m));
                    }
                },
                None => merged.push((coeff, monomial)),
            }
        }
        merged.extend(lhs);
        self.terms = merged;
    }

    /// `self += c * t * other`
    pub fn add_mul(&mut self, c: &C, t: &M, other: &Self) {
        if c.is_zero() || other.is_zero() {
            return;
        }
        self.num_of_vars = self.num_of_vars.max(other.num_of_vars);
        self.merge_terms(
            other
                .terms
                .iter()
                .map(|(oc, om)| (oc.times(c), om.clone() * t)),
        );
    }

    /// `self -= c * t * other`
    pub fn sub_mul(&mut self, c: &C, t: &M, other: &Self) {
        self.add_mul(&-c.clone(), t, other);
    }

    pub fn scale(&mut self, c: &C) {
        if c.is_zero() {
            self.terms.clear();
        } else if !c.is_one() {
            self.terms.iter_mut().for_each(|(coeff, _)| *coeff *= c);
        }
    }

    /// Gcd of the coefficients, carrying the sign of the leading coefficient.
    pub fn content(&self) -> C {
        let g = gcd_of(self.terms.iter().rev().map(|(c, _)| c), C::zero());
        match self.lc() {
            Some(lc) if lc.is_negative() => -g,
            _ => g,
        }
    }

    /// Divides every coefficient by `c`, which must divide them all.
    pub fn divide_exact(&mut self, c: &C) {
        divide_terms(&mut self.terms, c);
    }

    pub fn make_monic(&mut self) {
        if let Some(inv) = self.lc().and_then(|lc| lc.try_inverse()) {
            self.scale(&inv);
        }
    }

    /// Divides out the content, leaving a positive leading coefficient.
    pub fn remove_content(&mut self) {
        let content = self.content();
        if !content.is_zero() {
            self.divide_exact(&content);
        }
    }

    /// Working form during a computation: monic over a field, content-free
    /// otherwise.
    pub fn normalize(&mut self) {
        if C::ENCODING.pseudo_reduces() {
            self.remove_content();
        } else {
            self.make_monic();
        }
    }

    /// Form of a finished result: monic when the coefficients are fractions
    /// or field elements, content-free over a gcd domain.
    pub fn normalize_result(&mut self) {
        if C::ENCODING.monic_results() {
            self.make_monic();
        } else {
            self.remove_content();
        }
    }

    /// True iff `deg` agrees on every term.
    pub fn is_homogeneous_by<D: PartialEq>(&self, deg: impl Fn(&M) -> D) -> bool {
        let mut degrees = self.terms.iter().map(|(_, m)| deg(m));
        match degrees.next() {
            Some(first) => degrees.all(|d| d == first),
            None => true,
        }
    }

    /// Divides every term by `var^power`; each term must contain it.
    pub fn divide_by_indet_power(&mut self, var: usize, power: u16) {
        if power == 0 {
            return;
        }
        self.terms
            .iter_mut()
            .for_each(|(_, m)| m.divide_by_indet_power(var, power));
    }

    pub fn map_monomials<M2: Monomial>(
        &self,
        num_of_vars: usize,
        f: impl Fn(&M) -> M2,
    ) -> FastPolynomial<C, M2> {
        let terms: Vec<(C, M2)> = self.terms.iter().map(|(c, m)| (c.clone(), f(m))).collect();
        FastPolynomial::new(num_of_vars, &terms)
    }

    pub fn map_coefficients<C2: Coefficient>(&self, f: impl Fn(&C) -> C2) -> FastPolynomial<C2, M> {
        let terms: Vec<(C2, M)> = self.terms.iter().map(|(c, m)| (f(c), m.clone())).collect();
        FastPolynomial::new(self.num_of_vars, &terms)
    }
}

impl<C: Coefficient, M: Monomial> Neg for FastPolynomial<C, M> {
    type Output = Self;

    #[inline]
    fn neg(mut self) -> Self::Output {
        for (coeff, _) in &mut self.terms {
            let c = std::mem::replace(coeff, C::zero());
            *coeff = -c;
        }
        self
    }
}

impl<C: Coefficient, M: Monomial> Zero for FastPolynomial<C, M> {
    /// Returns the zero polynomial.
    fn zero() -> Self {
        Self {
            num_of_vars: 0,
            terms: Vec::new(),
        }
    }

    /// Checks if the given polynomial is zero.
    fn is_zero(&self) -> bool {
        self.terms.is_empty()
    }
}

impl<C: Coefficient, M: Monomial> Debug for FastPolynomial<C, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        for (coeff, term) in self.terms.iter().rev() {
            if term.is_constant() {
                write!(f, "\n{:?}", coeff)?;
            } else {
                write!(f, "\n{:?} {:?}", coeff, term)?;
            }
        }
        Ok(())
    }
}

impl<'a, C: Coefficient, M: Monomial> AddAssign<&'a Self> for FastPolynomial<C, M> {
    fn add_assign(&mut self, other: &'a Self) {
        self.num_of_vars = self.num_of_vars.max(other.num_of_vars);
        self.merge_terms(other.terms.iter().cloned());
    }
}

impl<'a, C: Coefficient, M: Monomial> Add<&'a Self> for FastPolynomial<C, M> {
    type Output = Self;

    fn add(self, rhs: &'a Self) -> Self::Output {
        let mut result = self;
        result.add_assign(rhs);
        result
    }
}

impl<'a, 'b, C: Coefficient, M: Monomial> Add<&'a FastPolynomial<C, M>>
    for &'b FastPolynomial<C, M>
{
    type Output = FastPolynomial<C, M>;

    fn add(self, rhs: &'a FastPolynomial<C, M>) -> Self::Output {
        let mut result = self.clone();
        result.add_assign(rhs);
        result
    }
}

impl<'a, C: Coefficient, M: Monomial> SubAssign<&'a Self> for FastPolynomial<C, M> {
    fn sub_assign(&mut self, other: &'a Self) {
        self.num_of_vars = self.num_of_vars.max(other.num_of_vars);
        self.merge_terms(other.terms.iter().map(|(c, m)| (-c.clone(), m.clone())));
    }
}

impl<'a, C: Coefficient, M: Monomial> Sub<&'a Self> for FastPolynomial<C, M> {
    type Output = Self;

    fn sub(self, rhs: &'a Self) -> Self::Output {
        let mut result = self;
        result.sub_assign(rhs);
        result
    }
}

impl<'a, 'b, C: Coefficient, M: Monomial> Sub<&'a FastPolynomial<C, M>>
    for &'b FastPolynomial<C, M>
{
    type Output = FastPolynomial<C, M>;

    fn sub(self, rhs: &'a FastPolynomial<C, M>) -> Self::Output {
        let mut result = self.clone();
        result.sub_assign(rhs);
        result
    }
}

impl<'a, C: Coefficient, M: Monomial> AddAssign<&'a (C, M)> for FastPolynomial<C, M> {
    fn add_assign(&mut self, rhs: &'a (C, M)) {
        if !rhs.0.is_zero() {
            match self.terms.binary_search_by(|(_, m)| m.cmp(&rhs.1)) {
                Ok(i) => {
                    self.terms[i].0 += &rhs.0;
                    if self.terms[i].0.is_zero() {
                        self.terms.remove(i);
                    }
                },
                Err(i) => self.terms.insert(i, rhs.clone()),
            }
        }
    }
}

impl<'a, C: Coefficient, M: Monomial> Add<&'a (C, M)> for FastPolynomial<C, M> {
    type Output = Self;

    fn add(self, rhs: &'a (C, M)) -> Self::Output {
        let mut result = self;
        result.add_assign(rhs);
        result
    }
}

impl<'a, 'b, C: Coefficient, M: Monomial> Add<&'a (C, M)> for &'b FastPolynomial<C, M> {
    type Output = FastPolynomial<C, M>;

    fn add(self, rhs: &'a (C, M)) -> Self::Output {
        let mut result = self.clone();
        result.add_assign(rhs);
        result
    }
}

impl<'a, C: Coefficient, M: Monomial> SubAssign<&'a (C, M)> for FastPolynomial<C, M> {
    fn sub_assign(&mut self, rhs: &'a (C, M)) {
        self.add_assign(&(-rhs.0.clone(), rhs.1.clone()));
    }
}

impl<'a, C: Coefficient, M: Monomial> Sub<&'a (C, M)> for FastPolynomial<C, M> {
    type Output = Self;

    fn sub(self, rhs: &'a (C, M)) -> Self::Output {
        let mut result = self;
        result.sub_assign(rhs);
        result
    }
}

impl<'a, 'b, C: Coefficient, M: Monomial> Sub<&'a (C, M)> for &'b FastPolynomial<C, M> {
    type Output = FastPolynomial<C, M>;

    fn sub(self, rhs: &'a (C, M)) -> Self::Output {
        let mut result = self.clone();
        result.sub_assign(rhs);
        result
    }
}

impl<'a, C: Coefficient, M: Monomial> MulAssign<&'a (C, M)> for FastPolynomial<C, M> {
    fn mul_assign(&mut self, rhs: &'a (C, M)) {
        if rhs.0.is_zero() {
            self.terms = Vec::new();
        } else {
            self.terms.iter_mut().for_each(|(c, m)| {
                *c *= &rhs.0;
                *m *= &rhs.1;
            });
        }
    }
}

impl<'a, C: Coefficient, M: Monomial> Mul<&'a (C, M)> for FastPolynomial<C, M> {
    type Output = Self;

    fn mul(self, rhs: &'a (C, M)) -> Self::Output {
        let mut result = self;
        result.mul_assign(rhs);
        result
    }
}

impl<'a, 'b, C: Coefficient, M: Monomial> Mul<&'a (C, M)> for &'b FastPolynomial<C, M> {
    type Output = FastPolynomial<C, M>;

    fn mul(self, rhs: &'a (C, M)) -> Self::Output {
        let mut result = self.clone();
        result.mul_assign(rhs);
        result
    }
}

impl<'a, C: Coefficient, M: Monomial> MulAssign<&'a M> for FastPolynomial<C, M> {
    fn mul_assign(&mut self, rhs: &'a M) {
        self.terms.iter_mut().for_each(|(_, m)| {
            *m *= rhs;
        });
    }
}

impl<'a, C: Coefficient, M: Monomial> Mul<&'a M> for FastPolynomial<C, M> {
    type Output = Self;

    fn mul(self, rhs: &'a M) -> Self::Output {
        let mut result = self;
        result.mul_assign(rhs);
        result
    }
}

impl<'a, 'b, C: Coefficient, M: Monomial> Mul<&'a M> for &'b FastPolynomial<C, M> {
    type Output = FastPolynomial<C, M>;

    fn mul(self, rhs: &'a M) -> Self::Output {
        let mut result = self.clone();
        result.mul_assign(rhs);
        result
    }
}

#[cfg(test)]
#[allow(clippy::all)]
mod tests {
    use ark_ff::UniformRand;
    use ark_std::test_rng;
    use ark_test_curves::bls12_381::Fr;
    use num_bigint::BigInt;
    use rand::Rng;

    use crate::poly::monomial::{DegRevLexOrder, FastMonomial, LexOrder, MonomialOrd};

    use super::*;

    /// Generate random `l`-variate polynomial of maximum individual degree `d`
    fn rand_poly<R: Rng, O: MonomialOrd>(
        l: usize,
        d: u16,
        rng: &mut R,
    ) -> FastPolynomial<Fr, FastMonomial<3, O>> {
        let mut random_terms = Vec::new();
        let num_terms = rng.gen_range(1..200);
        random_terms.push((Fr::rand(rng), FastMonomial::new(&vec![])));
        for _ in 1..num_terms {
            random_terms.push((Fr::rand(rng), rand_monomial(l, d, rng)));
        }
        FastPolynomial::new(l, &random_terms)
    }

    fn rand_monomial<R: Rng, O: MonomialOrd>(l: usize, d: u16, rng: &mut R) -> FastMonomial<3, O> {
        let term: Vec<(usize, u16)> = (0..l)
            .filter_map(|i| rng.gen_bool(0.5).then(|| (i, rng.gen_range(1..(d + 1)))))
            .collect();
        FastMonomial::new(&term)
    }

    fn is_sorted<C: Coefficient, M: Monomial>(p: &FastPolynomial<C, M>) -> bool {
        p.terms.windows(2).all(|w| w[0].1 < w[1].1) && p.terms.iter().all(|(c, _)| !c.is_zero())
    }

    #[test]
    fn add_polynomials() {
        let rng = &mut test_rng();
        let max_degree = 10;
        for a_var_count in 1..12 {
            for b_var_count in 1..12 {
                let p1 = rand_poly::<_, LexOrder>(a_var_count, max_degree, rng);
                let p2 = rand_poly::<_, LexOrder>(b_var_count, max_degree, rng);
                let res1 = p1.to_owned() + &p2;
                let res2 = p2.to_owned() + &p1;
                assert!(is_sorted(&res1));
                assert_eq!(res1, res2);
                assert!((res2 - &res1).is_zero());
            }
        }
    }

    #[test]
    fn sub_polynomials() {
        let rng = &mut test_rng();
        let max_degree = 10;
        for a_var_count in 1..12 {
            for b_var_count in 1..12 {
                let p1 = rand_poly::<_, DegRevLexOrder>(a_var_count, max_degree, rng);
                let p2 = rand_poly::<_, DegRevLexOrder>(b_var_count, max_degree, rng);
                let res1 = p1.to_owned() - &p2;
                let res2 = p2.to_owned() - &p1;
                assert!(is_sorted(&res1));
                assert_eq!(res1, -res2);
                assert_eq!(res1.to_owned() + &p2, p1);
            }
        }
    }

    #[test]
    fn add_and_sub_tuple() {
        let rng = &mut test_rng();
        let max_degree = 10;
        for a_var_count in 1..12 {
            for _ in 1..12 {
                let p = rand_poly::<_, DegRevLexOrder>(a_var_count, max_degree, rng);
                let t = (Fr::rand(rng), rand_monomial(a_var_count, max_degree, rng));
                let res1 = &p + &t;
                let res2 = FastPolynomial::new(p.num_of_vars, &[t.to_owned()]) + &p;
                assert_eq!(res1, res2);
                assert_eq!(res1 - &t, p);
                let res3 = &p - &t;
                assert_eq!(&res3 + &t, p);
            }
        }
    }

    #[test]
    fn mul_tuple() {
        let rng = &mut test_rng();
        let max_degree = 10;
        for a_var_count in 1..12 {
            for _ in 1..12 {
                let p = rand_poly::<_, DegRevLexOrder>(a_var_count, max_degree, rng);
                let t = (Fr::rand(rng), rand_monomial(a_var_count, max_degree, rng));
                let res1 = &p * &t;
                let res2 = p
                    .terms
                    .iter()
                    .map(|tt| FastPolynomial::new(p.num_of_vars, &[tt.to_owned()]) * &t)
                    .reduce(|a, b| a + &b)
                    .unwrap();
                assert_eq!(res1, res2);
            }
        }
    }

    #[test]
    fn add_mul_matches_product_then_add() {
        let rng = &mut test_rng();
        for _ in 0..50 {
            let mut p = rand_poly::<_, LexOrder>(5, 6, rng);
            let g = rand_poly::<_, LexOrder>(5, 6, rng);
            let (c, t) = (Fr::rand(rng), rand_monomial(5, 3, rng));
            let expected = p.clone() + &(&g * &(c, t.clone()));
            p.add_mul(&c, &t, &g);
            assert!(is_sorted(&p));
            assert_eq!(p, expected);
            p.sub_mul(&c, &t, &g);
            p.add_mul(&c, &t, &g);
            assert_eq!(p, expected);
        }
    }

    type Q = FastPolynomial<Fr, FastMonomial<1, LexOrder>>;

    fn x(i: usize, e: u16) -> FastMonomial<1, LexOrder> {
        FastMonomial::new(&[(i, e)])
    }

    #[test]
    fn s_polynomial_cancels_leading_terms() {
        // x^2 - y and xy - 1: y*(x^2 - y) - x*(xy - 1) = x - y^2
        let f = Q::new(2, &[(Fr::one(), x(0, 2)), (-Fr::one(), x(1, 1))]);
        let g = Q::new(
            2,
            &[
                (Fr::one(), FastMonomial::new(&[(0, 1), (1, 1)])),
                (-Fr::one(), FastMonomial::one()),
            ],
        );
        let s = f.s_polynomial(&g);
        let expected = Q::new(2, &[(Fr::one(), x(0, 1)), (-Fr::one(), x(1, 2))]);
        assert_eq!(s, expected);
    }

    #[test]
    fn division_leaves_irreducible_remainder() {
        // x^2 y + 1 divided by [xy - 1]: quotient x, remainder x + 1
        let f = Q::new(
            2,
            &[
                (Fr::one(), FastMonomial::new(&[(0, 2), (1, 1)])),
                (Fr::one(), FastMonomial::one()),
            ],
        );
        let g = Q::new(
            2,
            &[
                (Fr::one(), FastMonomial::new(&[(0, 1), (1, 1)])),
                (-Fr::one(), FastMonomial::one()),
            ],
        );
        let (qs, r) = f.div_mod_polys(&[g.clone()]);
        assert_eq!(qs[0], Q::new(2, &[(Fr::one(), x(0, 1))]));
        assert_eq!(qs[0].num_of_vars(), 2);
        let (qs, _) = f.div_mod_polys(&[f.clone(), g.clone()]);
        assert!(qs.iter().all(|q| q.num_of_vars() == 2));
        assert_eq!(r, Q::new(2, &[(Fr::one(), x(0, 1)), (Fr::one(), FastMonomial::one())]));
        assert_eq!(&g * &x(0, 1), f - &r);
    }

    #[test]
    fn content_and_normalisation() {
        type Z = FastPolynomial<BigInt, FastMonomial<1, DegRevLexOrder>>;
        let p = Z::new(
            2,
            &[
                (BigInt::from(-6), FastMonomial::new(&[(0, 2)])),
                (BigInt::from(4), FastMonomial::new(&[(1, 1)])),
                (BigInt::from(10), FastMonomial::one()),
            ],
        );
        assert_eq!(p.content(), BigInt::from(-2));
        let mut q = p.clone();
        q.normalize();
        assert_eq!(q.lc(), Some(&BigInt::from(3)));
        assert_eq!(q.terms[0].0, BigInt::from(-5));

        let mut r = Q::new(1, &[(Fr::from(4u64), x(0, 1)), (Fr::from(2u64), FastMonomial::one())]);
        r.normalize();
        assert_eq!(r.lc(), Some(&Fr::one()));
        assert!(r.is_homogeneous_by(|_| 0));
        assert!(!r.is_homogeneous_by(|m| m.degree()));
    }

    #[test]
    fn max_indet_and_dehomogenise() {
        let mut p = Q::new(3, &[(Fr::one(), FastMonomial::new(&[(0, 1), (2, 2)])), (Fr::one(), x(2, 3))]);
        assert_eq!(p.max_indet(), Some(2));
        p.divide_by_indet_power(2, 2);
        assert_eq!(p, Q::new(3, &[(Fr::one(), x(0, 1)), (Fr::one(), x(2, 1))]));
        assert_eq!(Q::zero().max_indet(), None);
    }
}
