//! AI components

pub mod alerts;
pub mod fsm;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod alerts_tests;
#[cfg(test)]
mod fsm_tests;

// Re-export all components
pub use alerts::*;
pub use fsm::*;
