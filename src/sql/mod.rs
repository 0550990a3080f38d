//! Safe SQL builder: identifiers are fixed or validated, values are always parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
