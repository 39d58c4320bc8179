use std::{
    cmp::Ordering,
    fmt::{Debug, Error, Formatter},
    hash::Hash,
    marker::PhantomData,
    ops::{Div, Mul, MulAssign},
    vec::Vec,
};

/// Number of exponents stored in one page of a [`FastMonomial`].
pub const PAGE: usize = 8;

pub trait Monomial:
    Clone
    + PartialOrd
    + Ord
    + PartialEq
    + Eq
    + Hash
    + Default
    + Debug
    + Send
    + Sync
    + for<'a> MulAssign<&'a Self>
    + for<'a> Mul<&'a Self, Output = Self>
    + for<'a> Div<&'a Self, Output = Option<Self>>
    + for<'a> MulAssign<usize>
    + for<'a> Mul<usize, Output = Self>
    + for<'a> Div<usize, Output = Option<Self>>
{
    /// Largest number of indeterminates this representation can hold.
    const CAPACITY: usize;

    /// Whether the ordering of this monomial type refines the standard degree.
    const IS_DEG_COMPATIBLE: bool;

    /// Whether the ordering is degree-reverse-lexicographic, so that among
    /// monomials of equal degree those divisible by the last indeterminate come last.
    const IS_DEG_REV_LEX: bool;

    fn new(monomial: &[(usize, u16)]) -> Self;

    fn degree(&self) -> u16;

    fn is_constant(&self) -> bool;

    fn lcm(&self, other: &Self) -> Self;

    fn gcd(&self, other: &Self) -> Self;

    fn one() -> Self;

    fn iter(&self) -> Box<dyn DoubleEndedIterator<Item = &'_ u16> + '_ + Sync + Send>;

    fn exponent(&self, var: usize) -> u16;

    /// Divides out `var^power`; the caller guarantees the power is present.
    fn divide_by_indet_power(&mut self, var: usize, power: u16);

    /// `self | other`
    fn divides(&self, other: &Self) -> bool;

    /// True iff no indeterminate occurs in both.
    fn is_coprime(&self, other: &Self) -> bool;

    fn compare_lex_order(lhs: &Self, rhs: &Self) -> Ordering;

    fn compare_deg_lex_order(lhs: &Self, rhs: &Self) -> Ordering;

    fn compare_deg_rev_lex_order(lhs: &Self, rhs: &Self) -> Ordering;

    fn exponents(&self) -> Vec<(usize, u16)> {
        self.iter()
            .enumerate()
            .filter(|(_, &e)| e > 0)
            .map(|(v, &e)| (v, e))
            .collect()
    }
}

pub trait MonomialOrd: Clone + PartialEq + Eq + Hash + Default + Send + Sync {
    const IS_DEG_COMPATIBLE: bool;

    const IS_DEG_REV_LEX: bool = false;

    fn compare<T: Monomial>(lhs: &T, rhs: &T) -> Ordering;
}

#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct LexOrder {}
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct DegLexOrder {}
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct DegRevLexOrder {}

/// Elimination ordering for indeterminate 0: its exponent decides first, `O` breaks ties.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct EliminateFirst<O: MonomialOrd>(PhantomData<O>);

impl MonomialOrd for LexOrder {
    const IS_DEG_COMPATIBLE: bool = false;

    fn compare<T: Monomial>(lhs: &T, rhs: &T) -> Ordering {
        T::compare_lex_order(lhs, rhs)
    }
}

impl MonomialOrd for DegLexOrder {
    const IS_DEG_COMPATIBLE: bool = true;

    fn compare<T: Monomial>(lhs: &T, rhs: &T) -> Ordering {
        T::compare_deg_lex_order(lhs, rhs)
    }
}

impl MonomialOrd for DegRevLexOrder {
    const IS_DEG_COMPATIBLE: bool = true;
    const IS_DEG_REV_LEX: bool = true;

    fn compare<T: Monomial>(lhs: &T, rhs: &T) -> Ordering {
        T::compare_deg_rev_lex_order(lhs, rhs)
    }
}

impl<O: MonomialOrd> MonomialOrd for EliminateFirst<O> {
    const IS_DEG_COMPATIBLE: bool = false;

    fn compare<T: Monomial>(lhs: &T, rhs: &T) -> Ordering {
        lhs.exponent(0)
            .cmp(&rhs.exponent(0))
            .then_with(|| O::compare(lhs, rhs))
    }
}

/// Dense exponent vector split in pages of [`PAGE`] exponents.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct FastMonomial<const N: usize, O: MonomialOrd>([[u16; PAGE]; N], PhantomData<O>);

impl<const N: usize, O: MonomialOrd> FastMonomial<N, O> {
    pub fn transform_order<OT: MonomialOrd>(self) -> FastMonomial<N, OT> {
        FastMonomial(self.0, PhantomData)
    }

    #[inline]
    fn zip_pages(&self, other: &Self, f: impl Fn(u16, u16) -> u16) -> Self {
        let mut pages = [[0u16; PAGE]; N];
        for (page, (lhs, rhs)) in pages.iter_mut().zip(self.0.iter().zip(other.0.iter())) {
            for k in 0..PAGE {
                page[k] = f(lhs[k], rhs[k]);
            }
        }
        Self(pages, PhantomData)
    }
}

impl<const N: usize, O: MonomialOrd> Default for FastMonomial<N, O> {
    fn default() -> Self {
        FastMonomial([[0u16; PAGE]; N], PhantomData)
    }
}

impl<const N: usize, O: MonomialOrd> PartialOrd for FastMonomial<N, O> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(O::compare(self, other))
    }
}

impl<const N: usize, O: MonomialOrd> Ord for FastMonomial<N, O> {
    fn cmp(&self, other: &Self) -> Ordering {
        O::compare(self, other)
    }
}

impl<const N: usize, O: MonomialOrd> Monomial for FastMonomial<N, O> {
    const CAPACITY: usize = N * PAGE;
    const IS_DEG_COMPATIBLE: bool = O::IS_DEG_COMPATIBLE;
    const IS_DEG_REV_LEX: bool = O::IS_DEG_REV_LEX;

    fn new(term: &[(usize, u16)]) -> Self {
        let mut pages = [[0u16; PAGE]; N];
        for &(var, pow) in term.iter().filter(|(_, pow)| *pow != 0) {
            assert!(var < N * PAGE, "indeterminate x_{} exceeds capacity", var);
            pages[var / PAGE][var % PAGE] += pow;
        }
        Self(pages, PhantomData)
    }

    fn degree(&self) -> u16 {
        self.0.iter().flat_map(|page| page.iter()).sum()
    }

    fn is_constant(&self) -> bool {
        self.0.iter().all(|page| page.iter().all(|&e| e == 0))
    }

    fn one() -> Self {
        Self::default()
    }

    fn iter(&self) -> Box<dyn DoubleEndedIterator<Item = &'_ u16> + '_ + Sync + Send> {
        Box::new(self.0.iter().flat_map(|page| page.iter()))
    }

    #[inline]
    fn exponent(&self, var: usize) -> u16 {
        self.0[var / PAGE][var % PAGE]
    }

    fn divide_by_indet_power(&mut self, var: usize, power: u16) {
        debug_assert!(self.exponent(var) >= power);
        self.0[var / PAGE][var % PAGE] -= power;
    }

    #[inline]
    fn divides(&self, other: &Self) -> bool {
        self.0
            .iter()
            .zip(other.0.iter())
            .all(|(lhs, rhs)| lhs.iter().zip(rhs.iter()).all(|(a, b)| a <= b))
    }

    fn is_coprime(&self, other: &Self) -> bool {
        self.0.iter().zip(other.0.iter()).all(|(lhs, rhs)| {
            lhs.iter()
                .zip(rhs.iter())
                .all(|(&a, &b)| a == 0 || b == 0)
        })
    }

    fn compare_lex_order(lhs: &Self, rhs: &Self) -> Ordering {
        lhs.iter()
            .zip(rhs.iter())
            .find_map(|(a, b)| {
                let ord = a.cmp(b);
                ord.is_ne().then_some(ord)
            })
            .unwrap_or(Ordering::Equal)
    }

    fn compare_deg_lex_order(lhs: &Self, rhs: &Self) -> Ordering {
        lhs.degree()
            .cmp(&rhs.degree())
            .then_with(|| Self::compare_lex_order(lhs, rhs))
    }

    fn compare_deg_rev_lex_order(lhs: &Self, rhs: &Self) -> Ordering {
        lhs.degree().cmp(&rhs.degree()).then_with(|| {
            lhs.iter()
                .rev()
                .zip(rhs.iter().rev())
                .find_map(|(a, b)| {
                    let ord = b.cmp(a);
                    ord.is_ne().then_some(ord)
                })
                .unwrap_or(Ordering::Equal)
        })
    }

    fn lcm(&self, other: &Self) -> Self {
        self.zip_pages(other, u16::max)
    }

    fn gcd(&self, other: &Self) -> Self {
        self.zip_pages(other, u16::min)
    }
}

impl<const N: usize, O: MonomialOrd> Debug for FastMonomial<N, O> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        for variable in self.iter().enumerate() {
            match variable.1.cmp(&1) {
                Ordering::Less => {},
                Ordering::Equal => write!(f, " * x_{}", variable.0)?,
                Ordering::Greater => write!(f, " * x_{}^{}", variable.0, variable.1)?,
            }
        }
        Ok(())
    }
}

impl<'a, const N: usize, O: MonomialOrd> MulAssign<&'a FastMonomial<N, O>> for FastMonomial<N, O> {
    fn mul_assign(&mut self, other: &'a FastMonomial<N, O>) {
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(lhs, rhs)| lhs.iter_mut().zip(rhs.iter()).for_each(|(a, b)| *a += b));
    }
}

impl<'a, const N: usize, O: MonomialOrd> Mul<&'a FastMonomial<N, O>> for FastMonomial<N, O> {
    type Output = Self;

    fn mul(self, other: &'a FastMonomial<N, O>) -> Self::Output {
        let mut result = self;
        result.mul_assign(other);
        result
    }
}

impl<'a, 'b, const N: usize, O: MonomialOrd> Mul<&'a FastMonomial<N, O>>
    for &'b FastMonomial<N, O>
{
    type Output = FastMonomial<N, O>;

    fn mul(self, other: &'a FastMonomial<N, O>) -> Self::Output {
        let mut result = self.clone();
        result.mul_assign(other);
        result
    }
}

impl<'a, const N: usize, O: MonomialOrd> Div<&'a FastMonomial<N, O>> for FastMonomial<N, O> {
    type Output = Option<Self>;

    fn div(self, other: &'a FastMonomial<N, O>) -> Self::Output {
        (&self).div(other)
    }
}

impl<'a, 'b, const N: usize, O: MonomialOrd> Div<&'a FastMonomial<N, O>>
    for &'b FastMonomial<N, O>
{
    type Output = Option<FastMonomial<N, O>>;

    fn div(self, other: &'a FastMonomial<N, O>) -> Self::Output {
        other
            .divides(self)
            .then(|| self.zip_pages(other, |a, b| a - b))
    }
}

impl<const N: usize, O: MonomialOrd> MulAssign<usize> for FastMonomial<N, O> {
    fn mul_assign(&mut self, other: usize) {
        self.0[other / PAGE][other % PAGE] += 1;
    }
}

impl<const N: usize, O: MonomialOrd> Mul<usize> for FastMonomial<N, O> {
    type Output = Self;

    fn mul(self, other: usize) -> Self::Output {
        let mut result = self;
        result.mul_assign(other);
        result
    }
}

impl<'b, const N: usize, O: MonomialOrd> Mul<usize> for &'b FastMonomial<N, O> {
    type Output = FastMonomial<N, O>;

    fn mul(self, other: usize) -> Self::Output {
        let mut result = self.clone();
        result.mul_assign(other);
        result
    }
}

impl<const N: usize, O: MonomialOrd> Div<usize> for FastMonomial<N, O> {
    type Output = Option<Self>;

    fn div(self, other: usize) -> Self::Output {
        (&self).div(other)
    }
}

impl<'b, const N: usize, O: MonomialOrd> Div<usize> for &'b FastMonomial<N, O> {
    type Output = Option<FastMonomial<N, O>>;

    fn div(self, other: usize) -> Self::Output {
        let page: usize = other / PAGE;
        let position: usize = other % PAGE;
        if self.0[page][position] > 0 {
            let mut div_term = self.0;
            div_term[page][position] -= 1;
            Some(FastMonomial(div_term, PhantomData))
        } else {
            None
        }
    }
}
