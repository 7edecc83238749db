pub mod entities;
pub mod error;

// Re-export the core types to provide a clean public API.
pub use entities::{
    Category, Material, NewCategory, NewMaterial, NewProject, NewStep, Project, ProjectUpdate,
    Step, round_two_places, validate_difficulty,
};
pub use error::CoreError;
