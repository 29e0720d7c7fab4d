//! Feature schema and record assembly
//!
//! Turns form values into the ordered row the artifact expects.

pub mod defaults;
pub mod record;

pub use defaults::{categorical_defaults, expected_columns, numeric_defaults, DefaultTable};
pub use record::{assemble, assemble_with_defaults, FeatureRecord, UserInput};
