//! Identity store for Neighborly.
//!
//! Owns user accounts and the email verification lifecycle. Registration
//! is token-gated: accounts start unverified and become verified only when a
//! token delivered by email is redeemed. The verification flag is consumed
//! by the authentication collaborator; marketplace authorization never reads
//! it.
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
