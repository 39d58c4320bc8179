use crate::poly::divmask::DivMaskRule;

/// Which pair-elimination criteria are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Criteria {
    pub divisibility: bool,
    pub gebauer_moeller: bool,
    pub coprime: bool,
    pub backwards: bool,
}

impl Criteria {
    pub fn all() -> Self {
        Self {
            divisibility: true,
            gebauer_moeller: true,
            coprime: true,
            backwards: true,
        }
    }

    pub fn none() -> Self {
        Self {
            divisibility: false,
            gebauer_moeller: false,
            coprime: false,
            backwards: false,
        }
    }
}

impl Default for Criteria {
    fn default() -> Self {
        Self::all()
    }
}

/// Accumulator used while reducing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CogKind {
    Poly,
    #[default]
    Geobucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Verbosity {
    #[default]
    Silent = 0,
    Summary = 1,
    Degree = 2,
    Poly = 3,
}

impl From<u8> for Verbosity {
    fn from(level: u8) -> Self {
        match level {
            0 => Verbosity::Silent,
            1 => Verbosity::Summary,
            2 => Verbosity::Degree,
            _ => Verbosity::Poly,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GbConfig {
    pub criteria: Criteria,
    pub cog: CogKind,
    pub borel: bool,
    pub borel_threshold: usize,
    pub interreduce: bool,
    pub div_mask_rule: DivMaskRule,
    pub verbosity: Verbosity,
}

impl Default for GbConfig {
    fn default() -> Self {
        Self {
            criteria: Criteria::all(),
            cog: CogKind::default(),
            borel: false,
            borel_threshold: 100,
            interreduce: true,
            div_mask_rule: DivMaskRule::default(),
            verbosity: Verbosity::default(),
        }
    }
}

impl GbConfig {
    pub fn with_criteria(mut self, criteria: Criteria) -> Self {
        self.criteria = criteria;
        self
    }

    pub fn with_cog(mut self, cog: CogKind) -> Self {
        self.cog = cog;
        self
    }

    pub fn with_borel(mut self, borel: bool) -> Self {
        self.borel = borel;
        self
    }

    pub fn with_borel_threshold(mut self, threshold: usize) -> Self {
        self.borel_threshold = threshold;
        self
    }

    pub fn with_interreduce(mut self, interreduce: bool) -> Self {
        self.interreduce = interreduce;
        self
    }

    pub fn with_div_mask_rule(mut self, rule: DivMaskRule) -> Self {
        self.div_mask_rule = rule;
        self
    }

    pub fn with_verbosity(mut self, verbosity: impl Into<Verbosity>) -> Self {
        self.verbosity = verbosity.into();
        self
    }
}
