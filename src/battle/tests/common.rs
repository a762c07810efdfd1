use crate::battle::state::BattleState;
use crate::errors::BattleResult;
use crate::player::BattlePlayer;
use crate::pokemon::{BaseStats, PokemonInst, TypeTraits};
use schema::PokemonType;

/// A builder for creating test Pokemon instances with common defaults.
///
/// # Example
/// ```text
/// let pokemon = TestPokemonBuilder::new("Squirtle", PokemonType::Water)
///     .with_strength(10)
///     .with_hp(20)
///     .build();
/// ```
pub struct TestPokemonBuilder {
    name: String,
    pokemon_type: PokemonType,
    stats: BaseStats,
    temperature: f64,
    healing: f64,
    current_hp: Option<u32>,
}

impl TestPokemonBuilder {
    /// Creates a new builder: level 10, strength 10, defense 5, 20 HP, agility 5.
    pub fn new(name: &str, pokemon_type: PokemonType) -> Self {
        Self {
            name: name.to_string(),
            pokemon_type,
            stats: BaseStats {
                level: 10,
                strength: 10,
                defense: 5,
                hp: 20,
                agility: 5,
            },
            temperature: 1.0,
            healing: 0.0,
            current_hp: None,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.stats.level = level;
        self
    }

    pub fn with_strength(mut self, strength: u32) -> Self {
        self.stats.strength = strength;
        self
    }

    pub fn with_defense(mut self, defense: u32) -> Self {
        self.stats.defense = defense;
        self
    }

    /// Sets the maximum (and starting) HP.
    pub fn with_hp(mut self, hp: u32) -> Self {
        self.stats.hp = hp;
        self
    }

    /// Sets the current HP below the maximum by applying damage after creation.
    pub fn with_current_hp(mut self, hp: u32) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn with_agility(mut self, agility: u32) -> Self {
        self.stats.agility = agility;
        self
    }

    /// Only used by Fire Pokemon.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Only used by Grass Pokemon.
    pub fn with_healing(mut self, healing: f64) -> Self {
        self.healing = healing;
        self
    }

    /// Builds the `PokemonInst`.
    pub fn build(self) -> PokemonInst {
        let traits = match self.pokemon_type {
            PokemonType::Water => TypeTraits::water(),
            PokemonType::Fire => TypeTraits::Fire { temperature: self.temperature },
            PokemonType::Grass => TypeTraits::Grass { healing: self.healing },
        };
        let mut pokemon = match PokemonInst::new(self.name.clone(), self.stats, traits) {
            Ok(pokemon) => pokemon,
            Err(err) => panic!("Failed to build test Pokemon {}: {}", self.name, err),
        };

        if let Some(hp) = self.current_hp {
            pokemon.take_damage(pokemon.max_hp().saturating_sub(hp));
        }
        pokemon
    }
}

/// Creates a test player with a given name and team.
pub fn create_test_player(name: &str, team: Vec<PokemonInst>) -> BattlePlayer {
    BattlePlayer::new(name, team)
}

/// Creates a standard 1v1 battle state for testing.
pub fn create_test_battle(p1_pokemon: PokemonInst, p2_pokemon: PokemonInst) -> BattleState {
    create_team_battle(vec![p1_pokemon], vec![p2_pokemon])
}

/// Creates a battle state between two full teams.
pub fn create_team_battle(p1_team: Vec<PokemonInst>, p2_team: Vec<PokemonInst>) -> BattleState {
    let player1 = create_test_player("Player 1", p1_team);
    let player2 = create_test_player("Player 2", p2_team);

    BattleState::new(player1, player2)
}

/// Helper function to assert that a Result is Ok and return the value.
/// Provides clear error messages in tests when functions unexpectedly fail.
pub fn assert_ok<T>(result: BattleResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
