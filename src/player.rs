use crate::errors::{BattleResult, BattleStateError};
use crate::pokemon::PokemonInst;
use serde::Serialize;

/// One side of a battle: a trainer and their ordered team.
///
/// The team keeps parse order for the whole battle. Pokemon are never added or
/// removed once the battle starts, only their HP changes, so a team index is a
/// stable identity for a Pokemon.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BattlePlayer {
    pub player_name: String,
    pub team: Vec<PokemonInst>,
}

impl BattlePlayer {
    /// Create a new BattlePlayer
    pub fn new(player_name: impl Into<String>, team: Vec<PokemonInst>) -> Self {
        BattlePlayer {
            player_name: player_name.into(),
            team,
        }
    }

    pub fn pokemon(&self, index: usize) -> Option<&PokemonInst> {
        self.team.get(index)
    }

    /// True if no Pokemon on the team has HP left. An empty team counts as debilitated.
    pub fn all_debilitated(&self) -> bool {
        self.team.iter().all(|pokemon| pokemon.is_debilitated())
    }

    /// Index of the first Pokemon in team order that is not debilitated.
    pub fn select_first_active(&self) -> Option<usize> {
        self.team.iter().position(|pokemon| !pokemon.is_debilitated())
    }

    /// Choose a replacement to send out against `opponent`.
    ///
    /// Picks the highest effectiveness against the opponent, then the highest
    /// level. Remaining ties go to the earliest team slot.
    pub fn select_next_active(&self, opponent: &PokemonInst) -> BattleResult<usize> {
        let mut selected: Option<(usize, &PokemonInst)> = None;

        for (index, candidate) in self.team.iter().enumerate() {
            if candidate.is_debilitated() {
                continue;
            }
            let better = match selected {
                None => true,
                Some((_, current)) => {
                    let candidate_score = candidate.effectiveness(opponent);
                    let current_score = current.effectiveness(opponent);
                    candidate_score > current_score
                        || (candidate_score == current_score && candidate.level > current.level)
                }
            };
            if better {
                selected = Some((index, candidate));
            }
        }

        selected
            .map(|(index, _)| index)
            .ok_or_else(|| BattleStateError::NoActivePokemon(self.player_name.clone()).into())
    }
}
