use crate::{
    config::GbConfig,
    embedding::ideal_gbasis,
    error::Result,
    poly::{
        coefficient::{CoeffEncoding, Coefficient},
        divmask::DivMaskRule,
        monomial::Monomial,
        polynomial::{FastPolynomial, Polynomial},
    },
    reduce::{normal_form_by_polys, tail_normal_form_by_polys},
};
use chrono::Local;
use num_traits::{One, Zero};
use rayon::prelude::*;
use tracing::info;

/// Reduced Gröbner basis of the ideal generated by `polys`, sorted by leading term.
pub fn gbasis<C: Coefficient, M: Monomial>(
    polys: &[FastPolynomial<C, M>],
    config: &GbConfig,
) -> Result<Vec<FastPolynomial<C, M>>> {
    ideal_gbasis(polys, config)
}

/// Check whether given ideal is groebner basis
pub fn is_groebner_basis<C: Coefficient, M: Monomial>(ideal: &[FastPolynomial<C, M>]) -> bool {
    ideal.par_iter().enumerate().all(|(i, f)| {
        ideal.par_iter().enumerate().all(|(j, g)| {
            if i >= j || f.is_zero() || g.is_zero() {
                true
            } else {
                normal_form_by_polys(&f.s_polynomial(g), ideal, DivMaskRule::default()).is_zero()
            }
        })
    })
}

/// Turns a Gröbner basis into the reduced one: minimal leading terms,
/// irreducible tails, monic (field or fractions) or content-free (gcd domain).
pub fn reduce_groebner_basis<C: Coefficient, M: Monomial>(
    ideal: &mut Vec<FastPolynomial<C, M>>,
    rule: DivMaskRule,
) {
    info!(
        time = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        len = ideal.len(),
        "interreduce start"
    );
    ideal.retain(|f| !f.is_zero());

    // a constant generator means the unit ideal
    if ideal.iter().any(|f| f.lpp().map_or(false, |m| m.is_constant())) {
        let n = ideal.iter().map(|f| f.num_of_vars()).max().unwrap_or(0);
        *ideal = vec![FastPolynomial::new(n, &[(C::one(), M::one())])];
        return;
    }

    ideal.par_sort_unstable_by(|f, g| f.lpp().cmp(&g.lpp()));
    ideal.dedup_by(|f, g| f.lpp() == g.lpp());

    // ascending, so a proper divisor always comes earlier
    let lpps: Vec<&M> = ideal.iter().filter_map(|f| f.lpp()).collect();
    let minimal: Vec<bool> = (0..lpps.len())
        .map(|i| !lpps[..i].iter().any(|d| d.divides(lpps[i])))
        .collect();
    *ideal = std::mem::take(ideal)
        .into_iter()
        .zip(minimal)
        .filter_map(|(f, keep)| keep.then_some(f))
        .collect();

    let reduced: Vec<FastPolynomial<C, M>> = ideal
        .par_iter()
        .map(|f| {
            let mut r = tail_normal_form_by_polys(f, ideal, rule);
            r.normalize_result();
            r
        })
        .collect();
    *ideal = reduced;

    info!(
        time = %Local::now().format("%Y-%m-%d %H:%M:%S"),
        len = ideal.len(),
        "interreduce end"
    );
}

/// Remainder of `f` modulo a Gröbner basis. Content-free over a gcd domain.
pub fn normal_form<C: Coefficient, M: Monomial>(
    f: &FastPolynomial<C, M>,
    gb: &[FastPolynomial<C, M>],
    rule: DivMaskRule,
) -> FastPolynomial<C, M> {
    let mut r = normal_form_by_polys(f, gb, rule);
    if C::ENCODING == CoeffEncoding::GcdDomain {
        r.remove_content();
    }
    r
}

pub fn ideal_membership<C: Coefficient, M: Monomial>(
    f: &FastPolynomial<C, M>,
    generators: &[FastPolynomial<C, M>],
    config: &GbConfig,
) -> Result<bool> {
    if f.is_zero() {
        return Ok(true);
    }
    let gb = ideal_gbasis(generators, config)?;
    Ok(normal_form(f, &gb, config.div_mask_rule).is_zero())
}

pub fn leading_monomials<C: Coefficient, M: Monomial>(gb: &[FastPolynomial<C, M>]) -> Vec<M> {
    gb.iter().filter_map(|f| f.lpp().cloned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        poly::monomial::{DegRevLexOrder, FastMonomial, LexOrder},
        GF,
    };
    use ark_ff::UniformRand;
    use ark_std::test_rng;
    use ark_test_curves::bls12_381::Fr;
    use num_bigint::BigInt;
    use rand::Rng;

    type L = FastMonomial<1, LexOrder>;

    fn lex(terms: &[(i64, &[(usize, u16)])]) -> FastPolynomial<GF, L> {
        let terms: Vec<(GF, L)> = terms
            .iter()
            .map(|&(c, m)| {
                let v = GF::from(c.unsigned_abs());
                (if c < 0 { -v } else { v }, L::new(m))
            })
            .collect();
        FastPolynomial::new(2, &terms)
    }

    fn x_minus_y2() -> FastPolynomial<GF, L> {
        lex(&[(1, &[(0, 1)]), (-1, &[(1, 2)])])
    }

    fn y3_minus_1() -> FastPolynomial<GF, L> {
        lex(&[(1, &[(1, 3)]), (-1, &[])])
    }

    #[test]
    fn test_reduce_groebner_basis() {
        let mut ideal = vec![
            lex(&[(1, &[(0, 2)]), (-1, &[(1, 1)])]),
            lex(&[(1, &[(0, 1), (1, 1)]), (-1, &[])]),
            lex(&[(2, &[(0, 1)]), (-2, &[(1, 2)])]),
            lex(&[(1, &[(1, 4)]), (-1, &[(1, 1)])]),
            FastPolynomial::zero(),
            lex(&[(3, &[(1, 3)]), (-3, &[])]),
        ];
        reduce_groebner_basis(&mut ideal, DivMaskRule::default());
        assert_eq!(ideal, vec![y3_minus_1(), x_minus_y2()]);
        assert!(is_groebner_basis(&ideal));
        assert_eq!(
            leading_monomials(&ideal),
            vec![L::new(&[(1, 3)]), L::new(&[(0, 1)])]
        );

        let mut unit = vec![lex(&[(1, &[(0, 1)])]), lex(&[(1, &[(0, 1)]), (1, &[])]), lex(&[(3, &[])])];
        reduce_groebner_basis(&mut unit, DivMaskRule::default());
        assert_eq!(unit, vec![lex(&[(1, &[])])]);
    }

    #[test]
    fn test_is_groebner_basis() {
        let inputs = vec![
            lex(&[(1, &[(0, 2)]), (-1, &[(1, 1)])]),
            lex(&[(1, &[(0, 1), (1, 1)]), (-1, &[])]),
        ];
        assert!(!is_groebner_basis(&inputs));
        let gb = gbasis(&inputs, &GbConfig::default()).unwrap();
        assert!(is_groebner_basis(&gb));
        assert_eq!(gb, vec![y3_minus_1(), x_minus_y2()]);
    }

    #[test]
    fn test_ideal_membership() {
        let inputs = vec![
            lex(&[(1, &[(0, 2)]), (-1, &[(1, 1)])]),
            lex(&[(1, &[(0, 1), (1, 1)]), (-1, &[])]),
        ];
        let config = GbConfig::default();
        let x3_minus_1 = lex(&[(1, &[(0, 3)]), (-1, &[])]);
        assert!(ideal_membership(&x3_minus_1, &inputs, &config).unwrap());
        let x_minus_1 = lex(&[(1, &[(0, 1)]), (-1, &[])]);
        assert!(!ideal_membership(&x_minus_1, &inputs, &config).unwrap());
        assert!(ideal_membership(&FastPolynomial::zero(), &inputs, &config).unwrap());

        let gb = gbasis(&inputs, &config).unwrap();
        assert_eq!(
            normal_form(&x_minus_1, &gb, DivMaskRule::default()),
            lex(&[(1, &[(1, 2)]), (-1, &[])])
        );
    }

    #[test]
    fn test_normal_form_over_the_integers() {
        fn z(terms: &[(i64, &[(usize, u16)])]) -> FastPolynomial<BigInt, L> {
            let terms: Vec<(BigInt, L)> = terms.iter().map(|&(c, m)| (BigInt::from(c), L::new(m))).collect();
            FastPolynomial::new(2, &terms)
        }
        let gb = vec![z(&[(2, &[(0, 1)]), (-1, &[])])];
        // 4x + 6y reduces to 2 + 6y, content 2
        let r = normal_form(&z(&[(4, &[(0, 1)]), (6, &[(1, 1)])]), &gb, DivMaskRule::default());
        assert_eq!(r, z(&[(3, &[(1, 1)]), (1, &[])]));
    }

    #[test]
    fn test_random_system_gives_groebner_basis() {
        type D = FastMonomial<1, DegRevLexOrder>;
        let mut rng = test_rng();
        let polys: Vec<FastPolynomial<Fr, D>> = (0..3)
            .map(|_| {
                let terms: Vec<(Fr, D)> = (0..4)
                    .map(|_| {
                        let exps: Vec<(usize, u16)> = (0..3).map(|v| (v, rng.gen_range(0..3))).collect();
                        (Fr::rand(&mut rng), D::new(&exps))
                    })
                    .collect();
                FastPolynomial::new(3, &terms)
            })
            .collect();
        let gb = gbasis(&polys, &GbConfig::default()).unwrap();
        assert!(is_groebner_basis(&gb));
        let rule = DivMaskRule::default();
        assert!(polys.iter().all(|f| normal_form(f, &gb, rule).is_zero()));
        assert!(gb.iter().all(|g| g.lc().map_or(false, |c| c.is_one())));
    }
}
