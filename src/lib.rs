// In: src/lib.rs

//! Pokemon Trainer Battle Engine
//!
//! Two trainers each bring a roster of Water, Fire and Grass Pokemon. Active
//! Pokemon fight round by round until one is debilitated, the loser's trainer
//! sends out a replacement, and the trainer who still has Pokemon standing wins.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod errors;
pub mod player;
pub mod pokemon;
pub mod teams;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::PokemonType;

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::{
    attack_order, resolve_attack, resolve_round, run_battle, run_battle_with_limit, start_battle,
    AttackOutcome, DEFAULT_ROUND_LIMIT,
};
pub use battle::state::{AttackKind, BattleEvent, BattleState, EventBus, GameState};
pub use battle::stats::{AttackRecord, BattleStatistics, Summary};

// Core runtime types for a battle.
pub use player::BattlePlayer;
pub use pokemon::{BaseStats, PokemonInst, TypeTraits};

// Roster loading.
pub use teams::{parse_battle_file, parse_ron_setup, BattleSetup, PokemonKind, PokemonTemplate, TeamTemplate};

// Crate-specific error and result types.
pub use errors::{
    BattleEngineError, BattleResult, BattleStateError, ParseError, ParseResult, PokemonDataError,
};
