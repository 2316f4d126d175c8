pub mod stage;

pub use stage::{build_stage, Flavor, StageDescription, StageError};
