//! Domain models for the star tracker. Each entity family is owned by
//! exactly one store in `crate::domain`.

pub mod behavior;
pub mod child;
pub mod progression;
pub mod reward;
