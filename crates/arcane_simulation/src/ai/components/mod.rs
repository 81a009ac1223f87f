//! AI components

pub mod enemy;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod enemy_tests;

// Re-export all components
pub use enemy::*;
