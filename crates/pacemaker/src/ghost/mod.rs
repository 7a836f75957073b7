//! Ghost selection and averaging.
//!
//! A request names one [`GhostStrategy`]; the [`GhostSelector`] builds the
//! matching candidate pool from the store and resolves it either to the top
//! player's own trace or to a population average.

mod average;
mod select;
mod strategy;

pub use average::*;
pub use select::*;
pub use strategy::*;
