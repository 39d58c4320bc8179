pub mod coefficient;
pub mod divmask;
pub mod geobucket;
pub mod monomial;
pub mod polynomial;
