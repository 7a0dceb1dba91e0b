//! Integration tests for the vtf-rs crates.
//!
//! This crate contains end-to-end tests that verify the interaction
//! between the transfer-function core, the 3D/2D consumers and the
//! preset persistence layer, including the documented invariants:
//! fix-up idempotence and boundary coverage, serialization round trips,
//! unsigned-CT symmetry and the lazy per-consumer rebuild behavior.
