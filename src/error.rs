use thiserror::Error;

/// What went wrong, independent of where.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    #[error("empty list of generators")]
    EmptyInput,
    #[error("zero polynomial where a nonzero one is required")]
    ZeroGenerator,
    #[error("input is not homogeneous")]
    NotHomogeneous,
    #[error("term ordering not supported here")]
    BadOrdering,
    #[error("polynomials from different rings")]
    MixedRings,
    #[error("too many indeterminates for the monomial representation")]
    TooManyIndets,
    #[error("module elements of different lengths")]
    BadComponent,
    #[error("ideal is not zero-dimensional")]
    NotZeroDim,
    #[error("not implemented")]
    NotImplemented,
    #[error("internal invariant violated")]
    Internal,
}

/// Structured error carrying the code and the name of the failing operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code} (in {operation})")]
pub struct GbError {
    pub code: ErrorCode,
    pub operation: &'static str,
}

impl GbError {
    pub fn new(code: ErrorCode, operation: &'static str) -> Self {
        Self { code, operation }
    }
}

pub type Result<T> = std::result::Result<T, GbError>;
