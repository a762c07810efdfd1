// Pokemon Battle Schema - Shared type definitions
// This crate holds the elemental type enum and its fixed matchup tables so the
// simulator and any tooling built around it agree on a single source of truth.

// Re-export the main types
pub use pokemon_types::*;

pub mod pokemon_types;
