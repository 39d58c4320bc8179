use ark_ff::{Field, Fp, FpConfig};
use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};
use std::{
    fmt::Debug,
    hash::Hash,
    ops::{AddAssign, MulAssign, Neg, SubAssign},
};

/// How reduction may treat the coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoeffEncoding {
    /// Every nonzero coefficient is invertible: reduce with exact quotients, results are monic.
    Field,
    /// Only gcds and exact quotients exist: pseudo-reduce, results are content-free.
    GcdDomain,
    /// Fractions of a gcd domain: pseudo-reduce on content-free representatives,
    /// results are monic.
    FractionField,
}

impl CoeffEncoding {
    /// Whether a reduction step cross-multiplies instead of dividing leading coefficients.
    pub fn pseudo_reduces(self) -> bool {
        self != CoeffEncoding::Field
    }

    /// Whether finished polynomials are made monic rather than content-free.
    pub fn monic_results(self) -> bool {
        self != CoeffEncoding::GcdDomain
    }
}

/// Gcd of `start` and every coefficient in `coeffs`, stopping early at one.
pub fn gcd_of<'a, C: Coefficient + 'a>(coeffs: impl IntoIterator<Item = &'a C>, start: C) -> C {
    let mut g = start;
    for c in coeffs {
        if g.is_one() {
            break;
        }
        g = Coefficient::gcd(&g, c);
    }
    g
}

/// Exact coefficient arithmetic used by polynomials.
pub trait Coefficient:
    Clone
    + Debug
    + PartialEq
    + Eq
    + Hash
    + Send
    + Sync
    + Zero
    + One
    + Neg<Output = Self>
    + for<'a> AddAssign<&'a Self>
    + for<'a> SubAssign<&'a Self>
    + for<'a> MulAssign<&'a Self>
{
    const ENCODING: CoeffEncoding;

    /// `self / other` when the quotient exists in the coefficient ring.
    fn try_div(&self, other: &Self) -> Option<Self>;

    fn try_inverse(&self) -> Option<Self>;

    /// A gcd, nonnegative where a sign exists; fields answer one for any nonzero pair.
    fn gcd(&self, other: &Self) -> Self;

    fn is_negative(&self) -> bool {
        false
    }

    fn times(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result *= other;
        result
    }

    fn plus(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result += other;
        result
    }

    fn minus(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result -= other;
        result
    }
}

impl<P: FpConfig<N>, const N: usize> Coefficient for Fp<P, N> {
    const ENCODING: CoeffEncoding = CoeffEncoding::Field;

    fn try_div(&self, other: &Self) -> Option<Self> {
        Field::inverse(other).map(|inv| *self * inv)
    }

    fn try_inverse(&self) -> Option<Self> {
        Field::inverse(self)
    }

    fn gcd(&self, other: &Self) -> Self {
        if self.is_zero() && other.is_zero() {
            Self::zero()
        } else {
            Self::one()
        }
    }
}

impl Coefficient for BigRational {
    const ENCODING: CoeffEncoding = CoeffEncoding::FractionField;

    fn try_div(&self, other: &Self) -> Option<Self> {
        (!other.is_zero()).then(|| self / other)
    }

    fn try_inverse(&self) -> Option<Self> {
        (!self.is_zero()).then(|| self.recip())
    }

    /// `gcd(numerators) / lcm(denominators)`: both arguments are integer multiples of it.
    fn gcd(&self, other: &Self) -> Self {
        BigRational::new(
            Integer::gcd(self.numer(), other.numer()),
            Integer::lcm(self.denom(), other.denom()),
        )
    }

    fn is_negative(&self) -> bool {
        Signed::is_negative(self)
    }
}

impl Coefficient for BigInt {
    const ENCODING: CoeffEncoding = CoeffEncoding::GcdDomain;

    fn try_div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        let (quotient, remainder) = self.div_rem(other);
        remainder.is_zero().then_some(quotient)
    }

    fn try_inverse(&self) -> Option<Self> {
        (self.is_one() || (-self).is_one()).then(|| self.clone())
    }

    fn gcd(&self, other: &Self) -> Self {
        Integer::gcd(self, other)
    }

    fn is_negative(&self) -> bool {
        Signed::is_negative(self)
    }
}
