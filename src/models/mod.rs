//! Statistical models.

pub mod glm;

pub use glm::{FittedModel, ObjectiveKind, SeasonalGlm, SeasonalitySpec};
