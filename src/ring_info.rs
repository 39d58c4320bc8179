//! Shared, read-only description of the working ring of one computation.

use std::sync::Arc;

use crate::{
    degree::Degree,
    error::{ErrorCode, GbError, Result},
    poly::{
        coefficient::{CoeffEncoding, Coefficient},
        divmask::{DivMaskRule, PPWithMask},
        monomial::Monomial,
        polynomial::FastPolynomial,
    },
    sugar::SugarKind,
};

/// How the inputs relate to the grading of the working ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAndGrading {
    /// Degree-compatible ordering and homogeneous inputs.
    AllGraded,
    /// Degree-compatible ordering, some input is not homogeneous.
    AffineGradedOrder,
    /// The ordering ignores the grading.
    AllAffine,
}

#[derive(Debug, Clone)]
pub struct GRingInfo {
    num_indets: usize,
    grading: Vec<Vec<i64>>,
    component_indets: Vec<usize>,
    sat_indet: Option<usize>,
    encoding: CoeffEncoding,
    input_and_grading: InputAndGrading,
    div_mask_rule: DivMaskRule,
}

#[derive(Debug, Clone)]
pub struct GRingInfoBuilder {
    num_indets: usize,
    component_indets: Vec<usize>,
    sat_indet: Option<usize>,
    div_mask_rule: DivMaskRule,
}

impl GRingInfoBuilder {
    pub fn new(num_indets: usize) -> Self {
        Self {
            num_indets,
            component_indets: Vec::new(),
            sat_indet: None,
            div_mask_rule: DivMaskRule::default(),
        }
    }

    /// Indeterminates standing for the module basis vectors, in component order.
    pub fn components(mut self, indets: Vec<usize>) -> Self {
        self.component_indets = indets;
        self
    }

    pub fn saturating(mut self, indet: usize) -> Self {
        self.sat_indet = Some(indet);
        self
    }

    pub fn div_mask_rule(mut self, rule: DivMaskRule) -> Self {
        self.div_mask_rule = rule;
        self
    }

    pub fn build<C: Coefficient, M: Monomial>(
        self,
        inputs: &[FastPolynomial<C, M>],
    ) -> Result<Arc<GRingInfo>> {
        const OP: &str = "GRingInfo::build";
        let n = self.num_indets;
        if n > M::CAPACITY {
            return Err(GbError::new(ErrorCode::TooManyIndets, OP));
        }
        if inputs.iter().any(|f| f.max_indet().map_or(false, |v| v >= n)) {
            return Err(GbError::new(ErrorCode::MixedRings, OP));
        }

        let grading = if M::IS_DEG_COMPATIBLE {
            vec![vec![1; n]]
        } else {
            Vec::new()
        };
        let mut info = GRingInfo {
            num_indets: n,
            grading,
            component_indets: self.component_indets,
            sat_indet: self.sat_indet,
            encoding: C::ENCODING,
            input_and_grading: InputAndGrading::AllAffine,
            div_mask_rule: self.div_mask_rule,
        };
        info.input_and_grading = if info.grading.is_empty() {
            InputAndGrading::AllAffine
        } else if inputs.iter().all(|f| info.is_homogeneous(f)) {
            InputAndGrading::AllGraded
        } else {
            InputAndGrading::AffineGradedOrder
        };

        if info.is_module()
            && info.input_and_grading == InputAndGrading::AffineGradedOrder
            && info.grading_dim() > 1
        {
            return Err(GbError::new(ErrorCode::NotImplemented, OP));
        }
        if let Some(h) = info.sat_indet {
            if info.is_module() {
                return Err(GbError::new(ErrorCode::NotImplemented, OP));
            }
            if !M::IS_DEG_REV_LEX || h + 1 != n {
                return Err(GbError::new(ErrorCode::BadOrdering, OP));
            }
            if info.input_and_grading != InputAndGrading::AllGraded {
                return Err(GbError::new(ErrorCode::NotHomogeneous, OP));
            }
        }
        Ok(Arc::new(info))
    }
}

impl GRingInfo {
    pub fn num_indets(&self) -> usize {
        self.num_indets
    }

    pub fn grading_dim(&self) -> usize {
        self.grading.len()
    }

    pub fn is_module(&self) -> bool {
        !self.component_indets.is_empty()
    }

    pub fn component_indets(&self) -> &[usize] {
        &self.component_indets
    }

    pub fn sat_indet(&self) -> Option<usize> {
        self.sat_indet
    }

    pub fn encoding(&self) -> CoeffEncoding {
        self.encoding
    }

    pub fn input_and_grading(&self) -> InputAndGrading {
        self.input_and_grading
    }

    pub fn div_mask_rule(&self) -> DivMaskRule {
        self.div_mask_rule
    }

    pub fn sugar_kind(&self) -> SugarKind {
        if self.sat_indet.is_some() {
            return SugarKind::StdDeg;
        }
        match self.input_and_grading {
            InputAndGrading::AllGraded => SugarKind::Const,
            InputAndGrading::AffineGradedOrder => SugarKind::WDeg,
            InputAndGrading::AllAffine => SugarKind::StdDeg,
        }
    }

    /// In-loop ordered interreduction is sound only for graded, non-saturating runs.
    pub fn interreduces_in_loop(&self) -> bool {
        self.input_and_grading == InputAndGrading::AllGraded && self.sat_indet.is_none()
    }

    pub fn wdeg<M: Monomial>(&self, pp: &M) -> Degree {
        let values: Vec<i64> = self
            .grading
            .iter()
            .map(|row| {
                pp.iter()
                    .zip(row.iter())
                    .map(|(&e, &w)| e as i64 * w)
                    .sum::<i64>()
            })
            .collect();
        Degree::from_slice(&values)
    }

    fn is_plain_indet(&self, var: usize) -> bool {
        Some(var) != self.sat_indet && !self.component_indets.contains(&var)
    }

    /// Standard degree ignoring component and saturating indeterminates.
    pub fn std_deg<M: Monomial>(&self, pp: &M) -> i64 {
        pp.iter()
            .enumerate()
            .filter(|&(var, &e)| e > 0 && self.is_plain_indet(var))
            .map(|(_, &e)| e as i64)
            .sum()
    }

    pub fn sugar_deg<M: Monomial>(&self, kind: SugarKind, pp: &M) -> Degree {
        match kind {
            SugarKind::Const | SugarKind::WDeg => self.wdeg(pp),
            SugarKind::StdDeg => Degree::from_slice(&[self.std_deg(pp)]),
        }
    }

    /// Index of the module component `pp` lives in, 0 for ideals.
    pub fn component<M: Monomial>(&self, pp: &M) -> usize {
        self.component_indets
            .iter()
            .position(|&var| pp.exponent(var) > 0)
            .unwrap_or(0)
    }

    pub fn is_homogeneous<C: Coefficient, M: Monomial>(&self, f: &FastPolynomial<C, M>) -> bool {
        f.is_homogeneous_by(|m| self.wdeg(m))
    }

    pub fn with_mask<M: Monomial>(&self, pp: M) -> PPWithMask<M> {
        PPWithMask::new(pp, self.div_mask_rule)
    }

    /// Indeterminate used for Borel cofactors: the last one that is neither a
    /// component nor the saturating indeterminate.
    pub fn borel_indet(&self) -> Option<usize> {
        (0..self.num_indets).rev().find(|&v| self.is_plain_indet(v))
    }
}
