//! Property-based tests for the Gröbner basis engine.

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use num_rational::BigRational;
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::{
        config::{CogKind, Criteria, GbConfig},
        embedding::integer_to_rational_monic,
        greductor::GReductor,
        groebner::{gbasis, ideal_membership, is_groebner_basis, normal_form},
        poly::{
            divmask::DivMaskRule,
            monomial::{DegRevLexOrder, FastMonomial, LexOrder, Monomial},
            polynomial::{FastPolynomial, Polynomial},
        },
        ring_info::GRingInfoBuilder,
        GF,
    };

    type M = FastMonomial<1, DegRevLexOrder>;
    type P = FastPolynomial<GF, M>;
    type L = FastMonomial<1, LexOrder>;
    type Z = FastPolynomial<BigInt, L>;
    type Q = FastPolynomial<BigRational, L>;

    // Strategy for one term in three indeterminates, exponents below 3
    fn small_term() -> impl Strategy<Value = (GF, M)> {
        (-5i64..=5, proptest::collection::vec(0u16..3, 3)).prop_map(|(c, exps)| {
            let v = GF::from(c.unsigned_abs());
            let exps: Vec<(usize, u16)> = exps.into_iter().enumerate().collect();
            (if c < 0 { -v } else { v }, M::new(&exps))
        })
    }

    fn small_poly() -> impl Strategy<Value = P> {
        proptest::collection::vec(small_term(), 1..=4).prop_map(|terms| P::new(3, &terms))
    }

    fn small_system() -> impl Strategy<Value = Vec<P>> {
        proptest::collection::vec(small_poly(), 1..=3)
    }

    fn small_integer_system() -> impl Strategy<Value = Vec<Z>> {
        let term = (-5i64..=5, proptest::collection::vec(0u16..3, 3)).prop_map(|(c, exps)| {
            let exps: Vec<(usize, u16)> = exps.into_iter().enumerate().collect();
            (BigInt::from(c), L::new(&exps))
        });
        let poly = proptest::collection::vec(term, 1..=4).prop_map(|terms| Z::new(3, &terms));
        proptest::collection::vec(poly, 1..=3)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn gbasis_terminates_and_generates_the_inputs(system in small_system()) {
            let gb = gbasis(&system, &GbConfig::default()).unwrap();
            prop_assert!(is_groebner_basis(&gb));
            for f in system.iter() {
                prop_assert!(normal_form(f, &gb, DivMaskRule::default()).is_zero());
            }
        }

        #[test]
        fn reduced_basis_is_independent_of_the_strategy(system in small_system()) {
            let reference = gbasis(&system, &GbConfig::default()).unwrap();
            let plain = GbConfig::default()
                .with_cog(CogKind::Poly)
                .with_criteria(Criteria::none());
            prop_assert_eq!(gbasis(&system, &plain).unwrap(), reference.clone());
            let borel = GbConfig::default().with_borel(true).with_borel_threshold(1);
            prop_assert_eq!(gbasis(&system, &borel).unwrap(), reference);
        }

        #[test]
        fn products_are_members(system in small_system(), f in small_poly()) {
            let config = GbConfig::default();
            let mut product = P::new(3, &[]);
            for (c, m) in f.terms() {
                product.add_mul(c, m, &system[0]);
            }
            prop_assert!(ideal_membership(&product, &system, &config).unwrap());
        }

        #[test]
        fn normal_form_is_idempotent(system in small_system(), f in small_poly()) {
            let gb = gbasis(&system, &GbConfig::default()).unwrap();
            let rule = DivMaskRule::default();
            let r = normal_form(&f, &gb, rule);
            prop_assert_eq!(normal_form(&r, &gb, rule), r.clone());
            let lpps: Vec<M> = gb.iter().filter_map(|g| g.lpp().cloned()).collect();
            for (_, m) in r.terms() {
                prop_assert!(!lpps.iter().any(|l| l.divides(m)));
            }
        }

        #[test]
        fn gbasis_of_a_reduced_basis_is_itself(system in small_system()) {
            let config = GbConfig::default();
            let gb = gbasis(&system, &config).unwrap();
            prop_assume!(!gb.is_empty());
            prop_assert_eq!(gbasis(&gb, &config).unwrap(), gb);
        }

        #[test]
        fn sugar_bounds_the_leading_degree_after_every_update(system in small_system()) {
            let ring = GRingInfoBuilder::new(3).build(&system).unwrap();
            let mut reductor = GReductor::new(&ring, system, GbConfig::default()).unwrap();
            reductor.prepare_gbasis();
            while reductor.num_pending_pairs() > 0 {
                if let Some(id) = reductor.step().unwrap() {
                    let g = reductor.poly(id);
                    let sugar = g.sugar();
                    prop_assert!(sugar.value() >= &ring.sugar_deg(sugar.kind(), g.lpp()));
                }
            }
        }

        #[test]
        fn integer_and_rational_lex_runs_agree(system in small_integer_system()) {
            let config = GbConfig::default();
            let rule = DivMaskRule::default();
            let gb_z = gbasis(&system, &config).unwrap();
            prop_assert!(is_groebner_basis(&gb_z));
            for f in system.iter() {
                prop_assert!(normal_form(f, &gb_z, rule).is_zero());
            }
            prop_assert!(gb_z.iter().all(|g| g.content() == BigInt::one()));

            let rationals: Vec<Q> = system
                .iter()
                .map(|f| f.map_coefficients(|c| BigRational::from_integer(c.clone())))
                .collect();
            let gb_q = gbasis(&rationals, &config).unwrap();
            let expected: Vec<Q> = gb_z.iter().map(integer_to_rational_monic).collect();
            prop_assert_eq!(gb_q, expected);
        }
    }
}
