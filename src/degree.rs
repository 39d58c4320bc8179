use smallvec::SmallVec;
use std::{
    fmt,
    ops::{Add, AddAssign, Sub},
};

/// Multi-degree, compared lexicographically.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Degree(SmallVec<[i64; 2]>);

impl Degree {
    pub fn zero(dim: usize) -> Self {
        Degree(SmallVec::from_elem(0, dim))
    }

    pub fn from_slice(values: &[i64]) -> Self {
        Degree(SmallVec::from_slice(values))
    }

    pub fn dim(&self) -> usize {
        self.0.len()
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&d| d == 0)
    }

    /// First component, zero when the grading is trivial.
    pub fn first(&self) -> i64 {
        self.0.first().copied().unwrap_or(0)
    }

    pub fn values(&self) -> &[i64] {
        &self.0
    }

    pub fn max_assign(&mut self, other: &Degree) {
        if *other > *self {
            self.clone_from(other);
        }
    }
}

impl<'a> AddAssign<&'a Degree> for Degree {
    fn add_assign(&mut self, other: &'a Degree) {
        debug_assert_eq!(self.dim(), other.dim());
        self.0.iter_mut().zip(other.0.iter()).for_each(|(a, b)| *a += b);
    }
}

impl<'a> Add<&'a Degree> for &Degree {
    type Output = Degree;

    fn add(self, other: &'a Degree) -> Degree {
        let mut result = self.clone();
        result += other;
        result
    }
}

impl<'a> Sub<&'a Degree> for &Degree {
    type Output = Degree;

    fn sub(self, other: &'a Degree) -> Degree {
        debug_assert_eq!(self.dim(), other.dim());
        Degree(self.0.iter().zip(other.0.iter()).map(|(a, b)| a - b).collect())
    }
}

impl fmt::Debug for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [d] => write!(f, "{}", d),
            values => write!(f, "{:?}", values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexicographic_order_and_arithmetic() {
        let a = Degree::from_slice(&[2, 5]);
        let b = Degree::from_slice(&[3, 0]);
        assert!(a < b);
        let mut c = &a + &b;
        assert_eq!(c, Degree::from_slice(&[5, 5]));
        c.max_assign(&Degree::from_slice(&[5, 7]));
        assert_eq!(c.values(), &[5, 7]);
        assert_eq!(&c - &a, Degree::from_slice(&[3, 2]));
        assert!(Degree::zero(2).is_zero());
        assert_eq!(Degree::zero(0).first(), 0);
    }
}
