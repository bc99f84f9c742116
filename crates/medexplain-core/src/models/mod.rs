//! Domain models for MedExplain.

mod drug;
mod query;
mod response;

pub use drug::*;
pub use query::*;
pub use response::*;
