//! Division masks: a 64-bit summary of a power-product that gives an O(1)
//! necessary condition for divisibility.
//!
//! Every rule is monotone: if `t | s` then `mask(t) ⊆ mask(s)`, so a bit of
//! `mask(t)` missing from `mask(s)` proves that `t` does not divide `s`.

use crate::poly::monomial::Monomial;
use std::{cmp::Ordering, fmt::Debug};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DivMask(pub u64);

impl DivMask {
    #[inline]
    pub fn is_subset_of(self, other: DivMask) -> bool {
        self.0 & !other.0 == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DivMaskRule {
    /// Always the empty mask; every test falls through to the exact check.
    Null,
    /// Bit `i` is set iff `x_i` occurs, indeterminates past 63 are ignored.
    #[default]
    SingleBits,
    /// Bit `i mod 64` is set iff `x_i` occurs.
    SingleBitWrap,
    /// `bits_per_indet` consecutive bits per indeterminate; bit `j` of `x_i` is
    /// set iff the exponent of `x_i` exceeds `2j`.
    EvenPowers { bits_per_indet: u8 },
    /// Scatters `(indet, power)` for the first few powers over the 64 bits.
    Hashing,
}

impl DivMaskRule {
    pub fn even_powers(num_indets: usize) -> Self {
        let bits = (64 / num_indets.max(1)).clamp(1, 16);
        Self::EvenPowers {
            bits_per_indet: bits as u8,
        }
    }

    pub fn mask<M: Monomial>(&self, pp: &M) -> DivMask {
        let mut bits = 0u64;
        match *self {
            DivMaskRule::Null => {},
            DivMaskRule::SingleBits => {
                pp.iter()
                    .take(64)
                    .enumerate()
                    .filter(|(_, &e)| e > 0)
                    .for_each(|(i, _)| bits |= 1u64 << i);
            },
            DivMaskRule::SingleBitWrap => {
                pp.iter()
                    .enumerate()
                    .filter(|(_, &e)| e > 0)
                    .for_each(|(i, _)| bits |= 1u64 << (i % 64));
            },
            DivMaskRule::EvenPowers { bits_per_indet } => {
                let width = bits_per_indet as usize;
                for (i, &e) in pp.iter().enumerate() {
                    let base = i * width;
                    if e == 0 || base >= 64 {
                        continue;
                    }
                    for j in 0..width.min(64 - base) {
                        if e as usize > 2 * j {
                            bits |= 1u64 << (base + j);
                        }
                    }
                }
            },
            DivMaskRule::Hashing => {
                for (i, &e) in pp.iter().enumerate() {
                    for k in 1..=e.min(4) as usize {
                        bits |= 1u64 << ((i * 7 + k * 13) % 64);
                    }
                }
            },
        }
        DivMask(bits)
    }
}

/// Power-product together with its division mask.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct PPWithMask<M: Monomial> {
    pp: M,
    mask: DivMask,
}

impl<M: Monomial> PPWithMask<M> {
    pub fn new(pp: M, rule: DivMaskRule) -> Self {
        let mask = rule.mask(&pp);
        Self { pp, mask }
    }

    #[inline]
    pub fn pp(&self) -> &M {
        &self.pp
    }

    #[inline]
    pub fn mask(&self) -> DivMask {
        self.mask
    }

    /// `self | other`, mask first.
    #[inline]
    pub fn divides(&self, other: &Self) -> bool {
        self.mask.is_subset_of(other.mask) && self.pp.divides(&other.pp)
    }

    pub fn is_coprime(&self, other: &Self) -> bool {
        self.pp.is_coprime(&other.pp)
    }

    pub fn lcm(&self, other: &Self, rule: DivMaskRule) -> Self {
        Self::new(self.pp.lcm(&other.pp), rule)
    }

    pub fn mul_pp(&mut self, t: &M, rule: DivMaskRule) {
        self.pp *= t;
        self.mask = rule.mask(&self.pp);
    }
}

impl<M: Monomial> PartialOrd for PPWithMask<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M: Monomial> Ord for PPWithMask<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.pp.cmp(&other.pp)
    }
}

impl<M: Monomial> Debug for PPWithMask<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} [{:016x}]", self.pp, self.mask.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::poly::monomial::{DegRevLexOrder, FastMonomial};
    use rand::Rng;

    type M = FastMonomial<2, DegRevLexOrder>;

    fn rand_monomial<R: Rng>(l: usize, d: u16, rng: &mut R) -> M {
        let term: Vec<(usize, u16)> = (0..l)
            .filter_map(|i| rng.gen_bool(0.5).then(|| (i, rng.gen_range(1..(d + 1)))))
            .collect();
        M::new(&term)
    }

    #[test]
    fn masks_never_reject_a_true_divisor() {
        let rng = &mut ark_std::test_rng();
        let rules = [
            DivMaskRule::Null,
            DivMaskRule::SingleBits,
            DivMaskRule::SingleBitWrap,
            DivMaskRule::even_powers(12),
            DivMaskRule::Hashing,
        ];
        for _ in 0..500 {
            let t = rand_monomial(12, 5, rng);
            let s = &t * &rand_monomial(12, 3, rng);
            for rule in rules {
                let (t, s) = (PPWithMask::new(t.clone(), rule), PPWithMask::new(s.clone(), rule));
                assert!(t.mask().is_subset_of(s.mask()), "{:?} {:?}", rule, t);
                assert!(t.divides(&s));
            }
        }
    }

    #[test]
    fn single_bits_rejects_missing_indet() {
        let rule = DivMaskRule::SingleBits;
        let xy = PPWithMask::new(M::new(&[(0, 1), (1, 1)]), rule);
        let x5 = PPWithMask::new(M::new(&[(0, 5)]), rule);
        assert!(!xy.mask().is_subset_of(x5.mask()));
        assert!(!xy.divides(&x5));
    }

    #[test]
    fn even_powers_rejects_small_exponent() {
        let rule = DivMaskRule::even_powers(4);
        let x3 = PPWithMask::new(M::new(&[(0, 3)]), rule);
        let x1 = PPWithMask::new(M::new(&[(0, 1)]), rule);
        assert!(!x3.mask().is_subset_of(x1.mask()));
        assert!(x1.divides(&x3));
    }
}
