//! Task marketplace for Neighborly.
//!
//! Posters publish tasks, workers apply, the poster assigns one applicant,
//! either party completes the task, and both may review each other once.
//! Every mutation commits as one unit of work together with the
//! notifications it promises; emails go out afterwards and never affect the
//! outcome.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
