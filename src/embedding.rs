//! Embedding of ideals and modules into one polynomial ring, and the
//! user-level operations built on top of it.
//!
//! A working ring has the indeterminate layout
//! `[prefix | ring | components]`: an optional elimination indeterminate,
//! the indeterminates of the user's ring, then one indeterminate per module
//! component. Module elements become polynomials in which every term carries
//! exactly one component indeterminate to the first power.

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Zero};

use crate::{
    config::GbConfig,
    error::{ErrorCode, GbError, Result},
    greductor::GReductor,
    groebner::reduce_groebner_basis,
    poly::{
        coefficient::{CoeffEncoding, Coefficient},
        monomial::{EliminateFirst, FastMonomial, Monomial, MonomialOrd},
        polynomial::{FastPolynomial, Polynomial},
    },
    ring_info::GRingInfoBuilder,
};

type Elim<const N: usize, O> = FastMonomial<N, EliminateFirst<O>>;

/// Variable layout of a working ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedding {
    prefix: usize,
    num_ring_indets: usize,
    components: Vec<usize>,
    num_indets: usize,
}

impl Embedding {
    pub fn ideal(num_ring_indets: usize) -> Self {
        Self {
            prefix: 0,
            num_ring_indets,
            components: Vec::new(),
            num_indets: num_ring_indets,
        }
    }

    /// Submodules of `R^rank`.
    pub fn module(num_ring_indets: usize, rank: usize) -> Self {
        Self {
            prefix: 0,
            num_ring_indets,
            components: (num_ring_indets..num_ring_indets + rank).collect(),
            num_indets: num_ring_indets + rank,
        }
    }

    /// One extra indeterminate in front, to be eliminated.
    pub fn eliminating(num_ring_indets: usize) -> Self {
        Self {
            prefix: 1,
            num_ring_indets,
            components: Vec::new(),
            num_indets: num_ring_indets + 1,
        }
    }

    /// Syzygies of `count` polynomials: the prefix indeterminate is the
    /// component `e_0` carrying the generators, followed by `e_1..e_count`.
    pub fn syzygy(num_ring_indets: usize, count: usize) -> Self {
        let first = 1 + num_ring_indets;
        let components = std::iter::once(0).chain(first..first + count).collect();
        Self {
            prefix: 1,
            num_ring_indets,
            components,
            num_indets: first + count,
        }
    }

    pub fn num_indets(&self) -> usize {
        self.num_indets
    }

    pub fn component_indets(&self) -> &[usize] {
        &self.components
    }

    pub fn ring_info_builder(&self) -> GRingInfoBuilder {
        GRingInfoBuilder::new(self.num_indets).components(self.components.clone())
    }

    fn check_capacity<M: Monomial>(&self, op: &'static str) -> Result<()> {
        if self.num_indets > M::CAPACITY {
            return Err(GbError::new(ErrorCode::TooManyIndets, op));
        }
        Ok(())
    }

    fn embed_pp<MI: Monomial, MO: Monomial>(&self, m: &MI, extra: Option<usize>) -> MO {
        let mut exps: Vec<(usize, u16)> = m
            .exponents()
            .into_iter()
            .map(|(var, e)| (var + self.prefix, e))
            .collect();
        exps.extend(extra.map(|var| (var, 1)));
        MO::new(&exps)
    }

    /// `f` with its indeterminates moved behind the prefix.
    pub fn embed<C: Coefficient, MI: Monomial, MO: Monomial>(
        &self,
        f: &FastPolynomial<C, MI>,
    ) -> FastPolynomial<C, MO> {
        f.map_monomials(self.num_indets, |m| self.embed_pp(m, None))
    }

    /// `f * e_component`.
    pub fn embed_in_component<C: Coefficient, MI: Monomial, MO: Monomial>(
        &self,
        f: &FastPolynomial<C, MI>,
        component: usize,
    ) -> FastPolynomial<C, MO> {
        let var = self.components[component];
        f.map_monomials(self.num_indets, |m| self.embed_pp(m, Some(var)))
    }

    pub fn embed_vector<C: Coefficient, MI: Monomial, MO: Monomial>(
        &self,
        v: &[FastPolynomial<C, MI>],
    ) -> FastPolynomial<C, MO> {
        let mut result = FastPolynomial::new(self.num_indets, &[]);
        for (component, f) in v.iter().enumerate() {
            result += &self.embed_in_component(f, component);
        }
        result
    }

    fn deembed_pp<MI: Monomial, MO: Monomial>(&self, m: &MI) -> MO {
        let exps: Vec<(usize, u16)> = m
            .exponents()
            .into_iter()
            .filter(|(var, _)| *var >= self.prefix && *var < self.prefix + self.num_ring_indets)
            .map(|(var, e)| (var - self.prefix, e))
            .collect();
        MO::new(&exps)
    }

    pub fn is_free_of_prefix<M: Monomial>(&self, m: &M) -> bool {
        (0..self.prefix).all(|var| m.exponent(var) == 0)
    }

    /// Back to the user's ring, dropping prefix and component indeterminates.
    pub fn deembed<C: Coefficient, MI: Monomial, MO: Monomial>(
        &self,
        f: &FastPolynomial<C, MI>,
    ) -> FastPolynomial<C, MO> {
        f.map_monomials(self.num_ring_indets, |m| self.deembed_pp(m))
    }

    /// Splits a module element by component.
    pub fn deembed_vector<C: Coefficient, MI: Monomial, MO: Monomial>(
        &self,
        f: &FastPolynomial<C, MI>,
    ) -> Vec<FastPolynomial<C, MO>> {
        let mut parts: Vec<Vec<(C, MO)>> = vec![Vec::new(); self.components.len()];
        for (c, m) in f.terms() {
            let component = self
                .components
                .iter()
                .position(|&var| m.exponent(var) > 0)
                .expect("module term without component");
            parts[component].push((c.clone(), self.deembed_pp(m)));
        }
        parts
            .into_iter()
            .map(|terms| FastPolynomial::new(self.num_ring_indets, &terms))
            .collect()
    }
}

/// Common number of indeterminates of nonzero inputs.
fn num_indets_of<C: Coefficient, M: Monomial>(
    polys: &[FastPolynomial<C, M>],
    op: &'static str,
) -> Result<usize> {
    if polys.is_empty() {
        return Err(GbError::new(ErrorCode::EmptyInput, op));
    }
    let n = polys.iter().map(|f| f.num_of_vars()).max().unwrap_or(0);
    if polys.iter().any(|f| !f.is_zero() && f.num_of_vars() != n) {
        return Err(GbError::new(ErrorCode::MixedRings, op));
    }
    Ok(n)
}

fn compute<C: Coefficient, M: Monomial>(
    builder: GRingInfoBuilder,
    inputs: Vec<FastPolynomial<C, M>>,
    config: &GbConfig,
) -> Result<Vec<FastPolynomial<C, M>>> {
    let ring = builder.div_mask_rule(config.div_mask_rule).build(&inputs)?;
    let mut reductor = GReductor::new(&ring, inputs, config.clone())?;
    reductor.run()?;
    Ok(reductor.gbasis())
}

/// Reduced Gröbner basis of the ideal generated by `polys`.
pub fn ideal_gbasis<C: Coefficient, M: Monomial>(
    polys: &[FastPolynomial<C, M>],
    config: &GbConfig,
) -> Result<Vec<FastPolynomial<C, M>>> {
    let n = num_indets_of(polys, "ideal_gbasis")?;
    compute(GRingInfoBuilder::new(n), polys.to_vec(), config)
}

/// Gröbner basis of the submodule of `R^r` generated by `vectors`.
pub fn module_gbasis<C: Coefficient, M: Monomial>(
    vectors: &[Vec<FastPolynomial<C, M>>],
    config: &GbConfig,
) -> Result<Vec<Vec<FastPolynomial<C, M>>>> {
    const OP: &str = "module_gbasis";
    let rank = vectors
        .first()
        .map(|v| v.len())
        .ok_or(GbError::new(ErrorCode::EmptyInput, OP))?;
    if rank == 0 || vectors.iter().any(|v| v.len() != rank) {
        return Err(GbError::new(ErrorCode::BadComponent, OP));
    }
    let entries: Vec<FastPolynomial<C, M>> = vectors.iter().flatten().cloned().collect();
    let n = num_indets_of(&entries, OP)?;

    let embedding = Embedding::module(n, rank);
    embedding.check_capacity::<M>(OP)?;
    let inputs: Vec<FastPolynomial<C, M>> = vectors.iter().map(|v| embedding.embed_vector(v)).collect();
    let gb = compute(embedding.ring_info_builder(), inputs, config)?;
    Ok(gb.iter().map(|f| embedding.deembed_vector(f)).collect())
}

/// Generators of the syzygy module of `polys`: vectors `s` with
/// `sum s_i * polys[i] = 0`.
pub fn syzygies<C: Coefficient, const N: usize, O: MonomialOrd>(
    polys: &[FastPolynomial<C, FastMonomial<N, O>>],
    config: &GbConfig,
) -> Result<Vec<Vec<FastPolynomial<C, FastMonomial<N, O>>>>> {
    const OP: &str = "syzygies";
    let n = num_indets_of(polys, OP)?;
    let k = polys.len();
    let embedding = Embedding::syzygy(n, k);
    embedding.check_capacity::<Elim<N, O>>(OP)?;

    let inputs: Vec<FastPolynomial<C, Elim<N, O>>> = polys
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let unit = FastPolynomial::new(n, &[(C::one(), FastMonomial::<N, O>::one())]);
            let e_i: FastPolynomial<C, Elim<N, O>> = embedding.embed_in_component(&unit, i + 1);
            embedding.embed_in_component::<C, _, Elim<N, O>>(g, 0) + &e_i
        })
        .collect();
    let gb = compute(embedding.ring_info_builder(), inputs, config)?;
    Ok(gb
        .iter()
        .filter(|f| f.lpp().map_or(false, |m| m.exponent(0) == 0))
        .map(|f| {
            let mut parts = embedding.deembed_vector(f);
            parts.remove(0);
            parts
        })
        .collect())
}

/// Reduced Gröbner basis of `ideal ∩ k[ring indeterminates]`, where `ideal`
/// lives in the ring with the elimination indeterminate in front.
fn eliminate_prefix<C: Coefficient, const N: usize, O: MonomialOrd>(
    embedding: &Embedding,
    inputs: Vec<FastPolynomial<C, Elim<N, O>>>,
    config: &GbConfig,
) -> Result<Vec<FastPolynomial<C, FastMonomial<N, O>>>> {
    let gb = compute(embedding.ring_info_builder(), inputs, config)?;
    Ok(gb
        .iter()
        .filter(|f| f.terms().iter().all(|(_, m)| embedding.is_free_of_prefix(m)))
        .map(|f| embedding.deembed(f))
        .collect())
}

/// `ideal : f^∞` through the Rabinowitsch embedding `ideal + (t f - 1)`.
pub fn saturate<C: Coefficient, const N: usize, O: MonomialOrd>(
    ideal: &[FastPolynomial<C, FastMonomial<N, O>>],
    f: &FastPolynomial<C, FastMonomial<N, O>>,
    config: &GbConfig,
) -> Result<Vec<FastPolynomial<C, FastMonomial<N, O>>>> {
    const OP: &str = "saturate";
    if f.is_zero() {
        return Err(GbError::new(ErrorCode::ZeroGenerator, OP));
    }
    let mut all = ideal.to_vec();
    all.push(f.clone());
    let n = num_indets_of(&all, OP)?;
    let embedding = Embedding::eliminating(n);
    embedding.check_capacity::<FastMonomial<N, O>>(OP)?;

    let t = Elim::<N, O>::new(&[(0, 1)]);
    let mut inputs: Vec<FastPolynomial<C, Elim<N, O>>> = ideal.iter().map(|g| embedding.embed(g)).collect();
    let mut rabinowitsch = embedding.embed::<C, _, Elim<N, O>>(f) * &t;
    rabinowitsch -= &(C::one(), Elim::<N, O>::one());
    inputs.push(rabinowitsch);
    eliminate_prefix(&embedding, inputs, config)
}

/// `I ∩ J` as the elimination of `t` from `t I + (1 - t) J`.
pub fn intersect<C: Coefficient, const N: usize, O: MonomialOrd>(
    i: &[FastPolynomial<C, FastMonomial<N, O>>],
    j: &[FastPolynomial<C, FastMonomial<N, O>>],
    config: &GbConfig,
) -> Result<Vec<FastPolynomial<C, FastMonomial<N, O>>>> {
    const OP: &str = "intersect";
    let all: Vec<_> = i.iter().chain(j.iter()).cloned().collect();
    let n = num_indets_of(&all, OP)?;
    if i.is_empty() || j.is_empty() {
        return Err(GbError::new(ErrorCode::EmptyInput, OP));
    }
    let embedding = Embedding::eliminating(n);
    embedding.check_capacity::<FastMonomial<N, O>>(OP)?;

    let t = Elim::<N, O>::new(&[(0, 1)]);
    let mut inputs: Vec<FastPolynomial<C, Elim<N, O>>> =
        i.iter().map(|g| embedding.embed::<C, _, Elim<N, O>>(g) * &t).collect();
    for g in j.iter() {
        let g: FastPolynomial<C, Elim<N, O>> = embedding.embed(g);
        inputs.push(g.clone() - &(g * &t));
    }
    eliminate_prefix(&embedding, inputs, config)
}

/// `I : f`, computed as `(I ∩ <f>) / f`. Needs exact division by `f`, so
/// gcd domains are not supported.
pub fn colon_by_poly<C: Coefficient, const N: usize, O: MonomialOrd>(
    ideal: &[FastPolynomial<C, FastMonomial<N, O>>],
    f: &FastPolynomial<C, FastMonomial<N, O>>,
    config: &GbConfig,
) -> Result<Vec<FastPolynomial<C, FastMonomial<N, O>>>> {
    const OP: &str = "colon_by_poly";
    if C::ENCODING == CoeffEncoding::GcdDomain {
        return Err(GbError::new(ErrorCode::NotImplemented, OP));
    }
    if f.is_zero() {
        return Err(GbError::new(ErrorCode::ZeroGenerator, OP));
    }
    let meet = intersect(ideal, std::slice::from_ref(f), config)?;
    let quotients: Vec<_> = meet
        .iter()
        .map(|g| {
            let (qs, r) = g.div_mod_polys(std::slice::from_ref(f));
            debug_assert!(r.is_zero(), "element of <f> not divisible by f");
            qs.into_iter().next().unwrap_or_else(FastPolynomial::zero)
        })
        .collect();
    if quotients.iter().all(|q| q.is_zero()) {
        return Ok(Vec::new());
    }
    ideal_gbasis(&quotients, config)
}

/// Saturating algorithm on homogeneous input: Gröbner basis of
/// `I : x_last^∞` under degree-reverse-lexicographic order.
pub fn saturation_by_last_indet<C: Coefficient, M: Monomial>(
    polys: &[FastPolynomial<C, M>],
    config: &GbConfig,
) -> Result<Vec<FastPolynomial<C, M>>> {
    const OP: &str = "saturation_by_last_indet";
    let n = num_indets_of(polys, OP)?;
    if n == 0 {
        return Err(GbError::new(ErrorCode::BadOrdering, OP));
    }
    compute(GRingInfoBuilder::new(n).saturating(n - 1), polys.to_vec(), config)
}

/// Gröbner basis of an affine ideal through its homogenisation with a new last
/// indeterminate, the saturating algorithm and dehomogenisation.
pub fn homogenized_gbasis<C: Coefficient, M: Monomial>(
    polys: &[FastPolynomial<C, M>],
    config: &GbConfig,
) -> Result<Vec<FastPolynomial<C, M>>> {
    const OP: &str = "homogenized_gbasis";
    if !M::IS_DEG_REV_LEX {
        return Err(GbError::new(ErrorCode::BadOrdering, OP));
    }
    let n = num_indets_of(polys, OP)?;
    if n + 1 > M::CAPACITY {
        return Err(GbError::new(ErrorCode::TooManyIndets, OP));
    }
    let h = n;
    let homogenized: Vec<FastPolynomial<C, M>> = polys
        .iter()
        .filter(|f| !f.is_zero())
        .map(|f| {
            let top = f.degree();
            f.map_monomials(n + 1, |m| {
                let mut exps = m.exponents();
                exps.push((h, top - m.degree()));
                M::new(&exps)
            })
        })
        .collect();
    if homogenized.is_empty() {
        return Ok(Vec::new());
    }
    let sat = compute(GRingInfoBuilder::new(n + 1).saturating(h), homogenized, config)?;
    let mut gb: Vec<FastPolynomial<C, M>> = sat
        .iter()
        .map(|f| {
            f.map_monomials(n, |m| {
                let exps: Vec<(usize, u16)> = m.exponents().into_iter().filter(|&(v, _)| v != h).collect();
                M::new(&exps)
            })
        })
        .collect();
    reduce_groebner_basis(&mut gb, config.div_mask_rule);
    Ok(gb)
}

/// Clears denominators and content: the primitive integer polynomial
/// with positive leading coefficient.
pub fn rational_to_integer<M: Monomial>(f: &FastPolynomial<BigRational, M>) -> FastPolynomial<BigInt, M> {
    let denominator = f
        .terms()
        .iter()
        .fold(BigInt::one(), |acc, (c, _)| acc.lcm(c.denom()));
    let mut result = f.map_coefficients(|c| (c * BigRational::from_integer(denominator.clone())).to_integer());
    result.remove_content();
    result
}

pub fn integer_to_rational_monic<M: Monomial>(f: &FastPolynomial<BigInt, M>) -> FastPolynomial<BigRational, M> {
    let mut result = f.map_coefficients(|c| BigRational::from_integer(c.clone()));
    result.make_monic();
    result
}
