#![allow(clippy::new_ret_no_self)]
#![allow(clippy::type_complexity)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::upper_case_acronyms)]

pub mod config;
pub mod degree;
pub mod embedding;
pub mod error;
pub mod gpair;
pub mod gpoly;
pub mod greductor;
pub mod groebner;
pub mod poly;
pub mod qbgenerator;
pub mod reduce;
pub mod reductors;
pub mod ring_info;
pub mod sugar;

mod proptests;

use crate::poly::{monomial::*, polynomial::*};
use ark_ff::fields::{Fp64, MontBackend, MontConfig};

pub use config::{CogKind, Criteria, GbConfig, Verbosity};
pub use embedding::{
    colon_by_poly, homogenized_gbasis, ideal_gbasis, intersect, module_gbasis, saturate,
    saturation_by_last_indet, syzygies,
};
pub use error::{ErrorCode, GbError, Result};
pub use greductor::{GReductor, GbStats};
pub use groebner::{gbasis, ideal_membership, is_groebner_basis, normal_form, reduce_groebner_basis};
pub use qbgenerator::quotient_basis;

#[derive(MontConfig)]
#[modulus = "18446744073709551557"]
#[generator = "2"]
pub struct FqConfig18446744073709551557;

pub type GF = Fp64<MontBackend<FqConfig18446744073709551557, 1>>;

pub type LexPolynomial<const N: usize> = FastPolynomial<GF, FastMonomial<N, LexOrder>>;
pub type DegRevLexPolynomial<const N: usize> = FastPolynomial<GF, FastMonomial<N, DegRevLexOrder>>;

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::Zero;

    #[test]
    fn test_div_mod_polys() {
        let f: LexPolynomial<1> = FastPolynomial::new(
            2,
            &[
                (1.into(), FastMonomial::new(&[(0, 5)])),
                (1.into(), FastMonomial::new(&[(0, 1)])),
            ],
        );
        let polys: Vec<LexPolynomial<1>> = vec![
            FastPolynomial::new(
                2,
                &[
                    (1.into(), FastMonomial::new(&[(0, 2)])),
                    ((-1).into(), FastMonomial::new(&[(1, 3)])),
                ],
            ),
            FastPolynomial::new(
                2,
                &[
                    (1.into(), FastMonomial::new(&[(0, 1), (1, 2)])),
                    (1.into(), FastMonomial::new(&[(0, 1)])),
                ],
            ),
        ];

        let (_, r) = f.div_mod_polys(&polys);
        assert!(r.is_zero());
        // the same remainder through the reduction engine
        let nf = reduce::normal_form_by_polys(&f, &polys, Default::default());
        assert!(nf.is_zero());
    }

    #[test]
    fn test_gbasis_of_the_sample_system() {
        let polys: Vec<DegRevLexPolynomial<1>> = vec![
            FastPolynomial::new(
                2,
                &[
                    (1.into(), FastMonomial::new(&[(0, 2)])),
                    ((-1).into(), FastMonomial::new(&[(1, 3)])),
                ],
            ),
            FastPolynomial::new(
                2,
                &[
                    (1.into(), FastMonomial::new(&[(0, 1), (1, 2)])),
                    (1.into(), FastMonomial::new(&[(0, 1)])),
                ],
            ),
        ];
        let gb = gbasis(&polys, &GbConfig::default()).unwrap();
        assert!(is_groebner_basis(&gb));
        assert!(polys
            .iter()
            .all(|f| normal_form(f, &gb, Default::default()).is_zero()));
    }
}
