//! Normal-form reduction driven over an interchangeable accumulator.
//!
//! A cog splits the polynomial being reduced into a finished upper part,
//! whose terms are irreducible, and an active lower part whose leading term
//! is the next candidate for a reduction step.

use num_traits::Zero;

use crate::{
    config::CogKind,
    gpoly::GPoly,
    poly::{
        coefficient::{gcd_of, Coefficient},
        divmask::{DivMaskRule, PPWithMask},
        geobucket::Geobucket,
        monomial::Monomial,
        polynomial::{divide_terms, FastPolynomial, Polynomial},
    },
    reductors::Reductors,
    sugar::Sugar,
};

pub trait ReductionCog<C: Coefficient, M: Monomial> {
    fn active_lpp(&mut self) -> Option<M>;

    fn is_active_zero(&mut self) -> bool {
        self.active_lpp().is_none()
    }

    /// Declares the active leading term final.
    fn move_to_next_lm(&mut self);

    /// Cancels the active leading term against `reductor`, whose leading
    /// power-product divides it, and returns the cofactor used.
    fn reduce_active_lm(&mut self, reductor: &FastPolynomial<C, M>) -> M;

    fn num_reductions(&self) -> usize;

    fn release(self) -> FastPolynomial<C, M>
    where
        Self: Sized;
}

/// Coefficients for one step: `(scale, multiplier)` such that
/// `scale * active - multiplier * cofactor * reductor` cancels the leading term.
/// An exact step divides the leading coefficients whenever the quotient exists.
fn step_coefficients<C: Coefficient>(active_lc: &C, reductor_lc: &C, exact: bool) -> (C, C) {
    if exact {
        if let Some(multiplier) = active_lc.try_div(reductor_lc) {
            return (C::one(), multiplier);
        }
    }
    let g = Coefficient::gcd(active_lc, reductor_lc);
    match (reductor_lc.try_div(&g), active_lc.try_div(&g)) {
        (Some(scale), Some(multiplier)) => (scale, multiplier),
        _ => (reductor_lc.clone(), active_lc.clone()),
    }
}

fn cofactor<M: Monomial>(active: &M, reductor: &FastPolynomial<impl Coefficient, M>) -> M {
    let lpp = reductor.lpp().expect("reduction by the zero polynomial");
    (active.clone() / lpp).expect("reductor must divide the active leading term")
}

fn assemble<C: Coefficient, M: Monomial>(
    mut lower: FastPolynomial<C, M>,
    finished: Vec<(C, M)>,
    num_of_vars: usize,
) -> FastPolynomial<C, M> {
    lower.terms.extend(finished.into_iter().rev());
    lower.num_of_vars = num_of_vars;
    lower
}

fn scale_terms<C: Coefficient, M: Monomial>(terms: &mut [(C, M)], c: &C) {
    if !c.is_one() {
        terms.iter_mut().for_each(|(coeff, _)| *coeff *= c);
    }
}

pub struct PolyCog<C: Coefficient, M: Monomial> {
    active: FastPolynomial<C, M>,
    finished: Vec<(C, M)>,
    num_of_vars: usize,
    steps: usize,
    exact: bool,
}

impl<C: Coefficient, M: Monomial> PolyCog<C, M> {
    /// Pseudo-reduces unless the coefficients form a field. Pseudo-reduction
    /// keeps the accumulated content divided out.
    pub fn new(poly: FastPolynomial<C, M>) -> Self {
        Self {
            num_of_vars: poly.num_of_vars(),
            active: poly,
            finished: Vec::new(),
            steps: 0,
            exact: !C::ENCODING.pseudo_reduces(),
        }
    }

    /// Divides leading coefficients whenever possible, so the released
    /// polynomial is the true remainder over a field of fractions.
    pub fn with_exact_quotients(poly: FastPolynomial<C, M>) -> Self {
        Self {
            exact: true,
            ..Self::new(poly)
        }
    }

    fn strip_content(&mut self) {
        let g = gcd_of(self.finished.iter().map(|(c, _)| c), C::zero());
        let g = gcd_of(self.active.terms.iter().rev().map(|(c, _)| c), g);
        if !g.is_zero() {
            divide_terms(&mut self.finished, &g);
            self.active.divide_exact(&g);
        }
    }
}

impl<C: Coefficient, M: Monomial> ReductionCog<C, M> for PolyCog<C, M> {
    fn active_lpp(&mut self) -> Option<M> {
        self.active.lpp().cloned()
    }

    fn move_to_next_lm(&mut self) {
        self.finished.extend(self.active.delete_lm());
    }

    fn reduce_active_lm(&mut self, reductor: &FastPolynomial<C, M>) -> M {
        let (lc, lpp) = self
            .active
            .leading_term_ref()
            .expect("reduction step on a zero accumulator");
        let q = cofactor(lpp, reductor);
        let (scale, multiplier) = step_coefficients(lc, reductor.lc().expect("nonzero reductor"), self.exact);
        if !scale.is_one() {
            self.active.scale(&scale);
            scale_terms(&mut self.finished, &scale);
        }
        self.active.sub_mul(&multiplier, &q, reductor);
        if !self.exact {
            self.strip_content();
        }
        self.steps += 1;
        q
    }

    fn num_reductions(&self) -> usize {
        self.steps
    }

    fn release(self) -> FastPolynomial<C, M> {
        assemble(self.active, self.finished, self.num_of_vars)
    }
}

pub struct GeobucketCog<C: Coefficient, M: Monomial> {
    active: Geobucket<C, M>,
    finished: Vec<(C, M)>,
    num_of_vars: usize,
    steps: usize,
    exact: bool,
}

impl<C: Coefficient, M: Monomial> GeobucketCog<C, M> {
    pub fn new(poly: FastPolynomial<C, M>) -> Self {
        Self {
            num_of_vars: poly.num_of_vars(),
            active: Geobucket::from_poly(poly),
            finished: Vec::new(),
            steps: 0,
            exact: !C::ENCODING.pseudo_reduces(),
        }
    }

    fn strip_content(&mut self) {
        let g = gcd_of(self.finished.iter().map(|(c, _)| c), C::zero());
        let g = self.active.content_with(g);
        if !g.is_zero() {
            divide_terms(&mut self.finished, &g);
            self.active.divide_exact(&g);
        }
    }
}

impl<C: Coefficient, M: Monomial> ReductionCog<C, M> for GeobucketCog<C, M> {
    fn active_lpp(&mut self) -> Option<M> {
        self.active.leading_term().map(|(_, m)| m.clone())
    }

    fn move_to_next_lm(&mut self) {
        self.finished.extend(self.active.pop_leading_term());
    }

    fn reduce_active_lm(&mut self, reductor: &FastPolynomial<C, M>) -> M {
        let (lc, lpp) = self
            .active
            .leading_term()
            .map(|(c, m)| (c.clone(), m.clone()))
            .expect("reduction step on a zero accumulator");
        let q = cofactor(&lpp, reductor);
        let (scale, multiplier) = step_coefficients(&lc, reductor.lc().expect("nonzero reductor"), self.exact);
        if !scale.is_one() {
            self.active.scale(&scale);
            scale_terms(&mut self.finished, &scale);
        }
        self.active.add_mul(&-multiplier, &q, reductor);
        if !self.exact {
            self.strip_content();
        }
        self.steps += 1;
        q
    }

    fn num_reductions(&self) -> usize {
        self.steps
    }

    fn release(self) -> FastPolynomial<C, M> {
        let lower = self.active.into_poly();
        assemble(lower, self.finished, self.num_of_vars)
    }
}

/// Cog chosen once per call site.
pub enum AnyCog<C: Coefficient, M: Monomial> {
    Poly(PolyCog<C, M>),
    Geobucket(GeobucketCog<C, M>),
}

impl<C: Coefficient, M: Monomial> AnyCog<C, M> {
    pub fn new(kind: CogKind, poly: FastPolynomial<C, M>) -> Self {
        match kind {
            CogKind::Poly => AnyCog::Poly(PolyCog::new(poly)),
            CogKind::Geobucket => AnyCog::Geobucket(GeobucketCog::new(poly)),
        }
    }
}

impl<C: Coefficient, M: Monomial> ReductionCog<C, M> for AnyCog<C, M> {
    fn active_lpp(&mut self) -> Option<M> {
        match self {
            AnyCog::Poly(cog) => cog.active_lpp(),
            AnyCog::Geobucket(cog) => cog.active_lpp(),
        }
    }

    fn move_to_next_lm(&mut self) {
        match self {
            AnyCog::Poly(cog) => cog.move_to_next_lm(),
            AnyCog::Geobucket(cog) => cog.move_to_next_lm(),
        }
    }

    fn reduce_active_lm(&mut self, reductor: &FastPolynomial<C, M>) -> M {
        match self {
            AnyCog::Poly(cog) => cog.reduce_active_lm(reductor),
            AnyCog::Geobucket(cog) => cog.reduce_active_lm(reductor),
        }
    }

    fn num_reductions(&self) -> usize {
        match self {
            AnyCog::Poly(cog) => cog.num_reductions(),
            AnyCog::Geobucket(cog) => cog.num_reductions(),
        }
    }

    fn release(self) -> FastPolynomial<C, M> {
        match self {
            AnyCog::Poly(cog) => cog.release(),
            AnyCog::Geobucket(cog) => cog.release(),
        }
    }
}

pub fn reduce<C, M, R>(cog: &mut R, reductors: &mut Reductors<C, M>, basis: &[GPoly<C, M>])
where
    C: Coefficient,
    M: Monomial,
    R: ReductionCog<C, M>,
{
    let rule = reductors.ring().div_mask_rule();
    while let Some(lpp) = cog.active_lpp() {
        let pp = PPWithMask::new(lpp, rule);
        match reductors.find_reducer(&pp, basis) {
            Some(found) => {
                cog.reduce_active_lm(reductors.get(found, basis).poly());
            },
            None => cog.move_to_next_lm(),
        }
    }
}

/// As [`reduce`], raising `sugar` with every cofactor used.
pub fn reduce_sugar<C, M, R>(
    cog: &mut R,
    sugar: &mut Sugar,
    reductors: &mut Reductors<C, M>,
    basis: &[GPoly<C, M>],
) where
    C: Coefficient,
    M: Monomial,
    R: ReductionCog<C, M>,
{
    let ring = reductors.ring().clone();
    let rule = ring.div_mask_rule();
    while let Some(lpp) = cog.active_lpp() {
        let pp = PPWithMask::new(lpp, rule);
        match reductors.find_reducer(&pp, basis) {
            Some(found) => {
                let reductor = reductors.get(found, basis);
                let q = cog.reduce_active_lm(reductor.poly());
                sugar.update(&q, reductor.sugar(), &ring);
            },
            None => cog.move_to_next_lm(),
        }
    }
}

pub fn reduce_tail<C, M, R>(cog: &mut R, reductors: &mut Reductors<C, M>, basis: &[GPoly<C, M>])
where
    C: Coefficient,
    M: Monomial,
    R: ReductionCog<C, M>,
{
    cog.move_to_next_lm();
    reduce(cog, reductors, basis);
}

/// Reduces everything below the leading term by the single polynomial `g`.
pub fn reduce_tail_by_poly<C, M, R>(cog: &mut R, g_lpp: &PPWithMask<M>, g: &FastPolynomial<C, M>)
where
    C: Coefficient,
    M: Monomial,
    R: ReductionCog<C, M>,
{
    cog.move_to_next_lm();
    while let Some(lpp) = cog.active_lpp() {
        if g_lpp.pp().divides(&lpp) {
            cog.reduce_active_lm(g);
        } else {
            cog.move_to_next_lm();
        }
    }
}

fn reduce_by_polys<C: Coefficient, M: Monomial>(
    mut cog: PolyCog<C, M>,
    gs: &[FastPolynomial<C, M>],
    rule: DivMaskRule,
) -> FastPolynomial<C, M> {
    let divisors: Vec<(PPWithMask<M>, &FastPolynomial<C, M>)> = gs
        .iter()
        .filter(|g| !g.is_zero())
        .filter_map(|g| g.lpp().map(|lpp| (PPWithMask::new(lpp.clone(), rule), g)))
        .collect();
    while let Some(lpp) = cog.active_lpp() {
        let pp = PPWithMask::new(lpp, rule);
        match divisors.iter().find(|(key, _)| key.divides(&pp)) {
            Some((_, g)) => {
                cog.reduce_active_lm(g);
            },
            None => cog.move_to_next_lm(),
        }
    }
    cog.release()
}

/// Normal form of `f` modulo the polynomials `gs`, without the basis machinery.
/// Over a gcd domain the result is only defined up to a multiple.
pub fn normal_form_by_polys<C: Coefficient, M: Monomial>(
    f: &FastPolynomial<C, M>,
    gs: &[FastPolynomial<C, M>],
    rule: DivMaskRule,
) -> FastPolynomial<C, M> {
    reduce_by_polys(PolyCog::with_exact_quotients(f.clone()), gs, rule)
}

/// Like [`normal_form_by_polys`], leaving the leading term alone. The tail
/// is only defined up to a multiple unless the coefficients form a field.
pub fn tail_normal_form_by_polys<C: Coefficient, M: Monomial>(
    f: &FastPolynomial<C, M>,
    gs: &[FastPolynomial<C, M>],
    rule: DivMaskRule,
) -> FastPolynomial<C, M> {
    let mut cog = PolyCog::new(f.clone());
    cog.move_to_next_lm();
    reduce_by_polys(cog, gs, rule)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::monomial::{FastMonomial, LexOrder};
    use ark_ff::UniformRand;
    use ark_std::test_rng;
    use ark_test_curves::bls12_381::Fr;
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use num_traits::One;
    use rand::Rng;

    type M = FastMonomial<1, LexOrder>;

    fn rand_poly<R: Rng>(rng: &mut R, n: usize) -> FastPolynomial<Fr, M> {
        let terms: Vec<(Fr, M)> = (0..rng.gen_range(1..12))
            .map(|_| {
                let exps: Vec<(usize, u16)> = (0..n).map(|v| (v, rng.gen_range(0..3))).collect();
                (Fr::rand(rng), M::new(&exps))
            })
            .collect();
        FastPolynomial::new(n, &terms)
    }

    fn irreducible_by(r: &FastPolynomial<Fr, M>, gs: &[FastPolynomial<Fr, M>]) -> bool {
        r.terms()
            .iter()
            .all(|(_, m)| gs.iter().all(|g| !g.lpp().unwrap().divides(m)))
    }

    #[test]
    fn both_cogs_agree_with_division() {
        let rng = &mut test_rng();
        for _ in 0..40 {
            let f = rand_poly(rng, 3);
            let gs: Vec<_> = (0..3).map(|_| rand_poly(rng, 3)).collect();
            let (_, expected) = f.div_mod_polys(&gs);

            let r = normal_form_by_polys(&f, &gs, DivMaskRule::SingleBits);
            assert!(irreducible_by(&r, &gs));
            assert_eq!(r, expected);

            let mut bucket = GeobucketCog::new(f.clone());
            while let Some(lpp) = bucket.active_lpp() {
                match gs.iter().find(|g| g.lpp().unwrap().divides(&lpp)) {
                    Some(g) => {
                        bucket.reduce_active_lm(g);
                    },
                    None => bucket.move_to_next_lm(),
                }
            }
            assert_eq!(bucket.release(), expected);
        }
    }

    #[test]
    fn pseudo_reduction_over_the_integers() {
        type Z = FastPolynomial<BigInt, M>;
        let z = |terms: &[(i64, u16)]| {
            let terms: Vec<(BigInt, M)> = terms
                .iter()
                .map(|&(c, e)| (BigInt::from(c), M::new(&[(0, e)])))
                .collect();
            Z::new(1, &terms)
        };
        // 3x + 1 reduced by 2x + 1: 2*(3x + 1) - 3*(2x + 1) = -1
        let mut cog = PolyCog::new(z(&[(3, 1), (1, 0)]));
        assert_eq!(cog.reduce_active_lm(&z(&[(2, 1), (1, 0)])), M::one());
        assert_eq!(cog.num_reductions(), 1);
        assert_eq!(cog.release(), z(&[(-1, 0)]));

        // 2x + 4 by 2x - 2 leaves 6, whose content is divided out at once
        let mut cog = PolyCog::new(z(&[(2, 1), (4, 0)]));
        cog.reduce_active_lm(&z(&[(2, 1), (-2, 0)]));
        assert_eq!(cog.release(), z(&[(1, 0)]));
        let mut bucket = GeobucketCog::new(z(&[(2, 1), (4, 0)]));
        bucket.reduce_active_lm(&z(&[(2, 1), (-2, 0)]));
        assert_eq!(bucket.release(), z(&[(1, 0)]));
    }

    #[test]
    fn content_stays_small_along_a_long_reduction() {
        type Z = FastPolynomial<BigInt, M>;
        let x = |e: u16| M::new(&[(0, e)]);
        let g = Z::new(1, &[(BigInt::from(3), x(1)), (BigInt::from(-3), M::one())]);

        // 5x^40 - 5 by 3x - 3: each step scales by 3, then the content 3 goes again
        let f = Z::new(1, &[(BigInt::from(5), x(40)), (BigInt::from(-5), M::one())]);
        for kind in [CogKind::Poly, CogKind::Geobucket] {
            let mut cog = AnyCog::new(kind, f.clone());
            while cog.active_lpp().is_some() {
                cog.reduce_active_lm(&g);
            }
            assert_eq!(cog.num_reductions(), 40);
            assert!(cog.release().is_zero());
        }

        // 7x^30 + 5x down to degree one: 36x before the content is removed
        let f = Z::new(1, &[(BigInt::from(7), x(30)), (BigInt::from(5), x(1))]);
        let mut cog = PolyCog::new(f);
        while let Some(lpp) = cog.active_lpp() {
            if lpp.degree() > 1 {
                cog.reduce_active_lm(&g);
            } else {
                cog.move_to_next_lm();
            }
        }
        assert_eq!(cog.release(), Z::new(1, &[(BigInt::one(), x(1))]));
    }

    #[test]
    fn exact_quotients_give_the_true_remainder_over_the_rationals() {
        type Q = FastPolynomial<BigRational, M>;
        let q = |n: i64, d: i64| BigRational::new(n.into(), d.into());
        let x = |e: u16| M::new(&[(0, e)]);
        // x^2 + 1/2 by 2x - 1: x^2 = (x/2 + 1/4)(2x - 1) + 1/4, remainder 3/4
        let f = Q::new(1, &[(q(1, 1), x(2)), (q(1, 2), M::one())]);
        let g = Q::new(1, &[(q(2, 1), x(1)), (q(-1, 1), M::one())]);
        let r = normal_form_by_polys(&f, &[g.clone()], DivMaskRule::default());
        assert_eq!(r, Q::new(1, &[(q(3, 4), M::one())]));

        // pseudo-reduction only keeps the remainder up to a multiple
        let mut cog = PolyCog::new(f);
        while cog.active_lpp().map_or(false, |m| !m.is_constant()) {
            cog.reduce_active_lm(&g);
        }
        let mut pseudo = cog.release();
        pseudo.make_monic();
        assert_eq!(pseudo, Q::new(1, &[(q(1, 1), M::one())]));
    }

    #[test]
    fn tail_reduction_keeps_the_leading_term() {
        let x = |e: u16| M::new(&[(0, e)]);
        let one = Fr::from(1u64);
        // x^3 + x^2 by x^2 - 1, tail only: x^3 + 1
        let f = FastPolynomial::new(1, &[(one, x(3)), (one, x(2))]);
        let g = FastPolynomial::new(1, &[(one, x(2)), (-one, M::one())]);
        let g_lpp = PPWithMask::new(x(2), DivMaskRule::SingleBits);
        let mut cog = AnyCog::new(CogKind::Geobucket, f);
        reduce_tail_by_poly(&mut cog, &g_lpp, &g);
        assert_eq!(
            cog.release(),
            FastPolynomial::new(1, &[(one, x(3)), (one, M::one())])
        );
    }
}
