use crate::battle::stats::AttackRecord;
use crate::player::BattlePlayer;
use crate::pokemon::PokemonInst;
use schema::PokemonType;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Copy)]
pub enum GameState {
    BattleStart,
    CombatInProgress,
    CombatResolved, // One active Pokemon is debilitated, its trainer still has others
    Player1Win,
    Player2Win,
    Draw, // Only reachable when both teams start with nothing able to fight
}

/// Which attack a Pokemon performs in a given round.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackKind {
    Basic,
    Water,
    Fire,
    Grass,
}

impl AttackKind {
    /// Odd rounds use the type-specific attack, even rounds the basic attack.
    pub fn for_round(round_number: u32, pokemon_type: PokemonType) -> Self {
        if round_number % 2 == 0 {
            return AttackKind::Basic;
        }
        match pokemon_type {
            PokemonType::Water => AttackKind::Water,
            PokemonType::Fire => AttackKind::Fire,
            PokemonType::Grass => AttackKind::Grass,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            AttackKind::Basic => "a basic attack",
            AttackKind::Water => "a water attack",
            AttackKind::Fire => "a fire attack",
            AttackKind::Grass => "a grass attack",
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    // Battle Management
    BattleStarted,
    CombatStarted {
        combat_number: u32,
    },
    PokemonSentOut {
        player_index: usize,
        pokemon: String,
    },
    RoundStarted {
        combat_number: u32,
        round_number: u32,
        fighters: [String; 2],
    },

    // Attacks
    AttackUsed {
        player_index: usize,
        attacker: String,
        defender: String,
        kind: AttackKind,
    },
    SurgeModeActive {
        pokemon: String,
    },
    DamageDealt {
        target: String,
        damage: u32,
        remaining_hp: u32,
    },
    EmbersDealt {
        target: String,
        damage: u32,
        remaining_hp: u32,
    },
    PokemonHealed {
        target: String,
        amount: u32,
        new_hp: u32,
    },
    PokemonDebilitated {
        player_index: usize,
        pokemon: String,
    },

    // Combat and Battle End
    CombatEnded {
        combat_number: u32,
        winner_index: usize,
        winner: String,
        loser: String,
    },
    BattleEnded {
        winner: Option<usize>,
    },
}

impl BattleEvent {
    /// Formats the event into a human-readable string using battle context.
    /// Returns None for silent events that should not produce user-visible text.
    pub fn format(&self, battle_state: &BattleState) -> Option<String> {
        let trainer = |index: usize| battle_state.players[index].player_name.as_str();

        match self {
            BattleEvent::BattleStarted => Some(format!(
                "=================================\nBattle between: {} vs {} begins!",
                trainer(0),
                trainer(1)
            )),
            BattleEvent::CombatStarted { combat_number } => {
                Some(format!("========= Combat {} =========", combat_number))
            }
            BattleEvent::PokemonSentOut { player_index, pokemon } => {
                Some(format!("{} chooses {}", trainer(*player_index), pokemon))
            }
            BattleEvent::RoundStarted { round_number, fighters, .. } => Some(format!(
                "┌───────── Round {} ─────────┐\n Fighter 1: {}\n Fighter 2: {}\n Actions",
                round_number, fighters[0], fighters[1]
            )),
            BattleEvent::AttackUsed { attacker, defender, kind, .. } => {
                Some(format!("  {} uses {} on {}", attacker, kind.label(), defender))
            }
            BattleEvent::SurgeModeActive { .. } => None, // Visible through the damage figure
            BattleEvent::DamageDealt { target, damage, remaining_hp } => Some(format!(
                "  {} took {} damage ({} HP left)",
                target, damage, remaining_hp
            )),
            BattleEvent::EmbersDealt { target, damage, remaining_hp } => Some(format!(
                "  Embers burn {} for {} more damage ({} HP left)",
                target, damage, remaining_hp
            )),
            BattleEvent::PokemonHealed { target, amount, new_hp } => Some(format!(
                "  {} healed {} HP (now {} HP)",
                target, amount, new_hp
            )),
            BattleEvent::PokemonDebilitated { pokemon, .. } => {
                Some(format!("  {} is debilitated", pokemon))
            }
            BattleEvent::CombatEnded { winner_index, winner, loser, .. } => Some(format!(
                "{}'s {} defeated {}",
                trainer(*winner_index),
                winner,
                loser
            )),
            BattleEvent::BattleEnded { winner: Some(index) } => Some(format!(
                "=================================\n{} wins the battle!",
                trainer(*index)
            )),
            BattleEvent::BattleEnded { winner: None } => Some(
                "=================================\nThe battle ended in a draw: no Pokemon could fight"
                    .to_string(),
            ),
        }
    }
}

/// Ordered log of everything that happened while resolving battle steps.
///
/// ```text
/// event_bus.print_debug_with_message("Round 1 events:");     // With header message
/// event_bus.print_formatted(&battle_state);                  // Human-readable format
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Move every event of `other` onto the end of this bus.
    pub fn append(&mut self, other: EventBus) {
        self.events.extend(other.events);
    }

    pub fn events(&self) -> &[BattleEvent] {
        &self.events
    }

    /// Print all events in debug format with indentation.
    pub fn print_debug(&self) {
        for event in &self.events {
            println!("  {:?}", event);
        }
    }

    /// Print all events in debug format with a custom prefix message.
    pub fn print_debug_with_message(&self, message: &str) {
        println!("{}", message);
        self.print_debug();
    }

    /// Print all non-silent events using their formatted text.
    pub fn print_formatted(&self, battle_state: &BattleState) {
        for event in &self.events {
            if let Some(formatted) = event.format(battle_state) {
                println!("{}", formatted);
            }
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct BattleState {
    pub players: [BattlePlayer; 2],
    /// Team index of each side's Pokemon in the current combat.
    pub active: [Option<usize>; 2],
    pub combat_number: u32,
    /// Round to be played next within the current combat, starting at 1.
    pub round_number: u32,
    pub game_state: GameState,
    /// One record per attack action, in the order they happened.
    pub observations: Vec<AttackRecord>,
}

impl BattleState {
    pub fn new(player1: BattlePlayer, player2: BattlePlayer) -> Self {
        Self {
            players: [player1, player2],
            active: [None, None],
            combat_number: 0,
            round_number: 1,
            game_state: GameState::BattleStart,
            observations: Vec::new(),
        }
    }

    pub fn active_pokemon(&self, player_index: usize) -> Option<&PokemonInst> {
        let team_index = (*self.active.get(player_index)?)?;
        self.players[player_index].pokemon(team_index)
    }

    pub fn is_over(&self) -> bool {
        matches!(
            self.game_state,
            GameState::Player1Win | GameState::Player2Win | GameState::Draw
        )
    }

    /// Index of the winning player once the battle has been decided.
    pub fn winner(&self) -> Option<usize> {
        match self.game_state {
            GameState::Player1Win => Some(0),
            GameState::Player2Win => Some(1),
            _ => None,
        }
    }
}
