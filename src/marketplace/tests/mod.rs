//! Unit tests for the marketplace.
