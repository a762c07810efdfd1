use crate::errors::{BattleResult, BattleStateError, PokemonDataError};
use schema::PokemonType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest level a Pokemon can be created with.
pub const MAX_LEVEL: u32 = 100;

/// Stats shared by every Pokemon regardless of type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub level: u32,
    pub strength: u32,
    pub defense: u32,
    pub hp: u32,
    pub agility: u32,
}

/// Type-specific state carried by each variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TypeTraits {
    /// Recomputed right before every water attack.
    Water { surge_mode: bool },
    /// Multiplier for the follow-up embers damage.
    Fire { temperature: f64 },
    /// Fraction of current HP restored after every grass attack.
    Grass { healing: f64 },
}

impl TypeTraits {
    pub fn water() -> Self {
        TypeTraits::Water { surge_mode: false }
    }

    pub fn pokemon_type(&self) -> PokemonType {
        match self {
            TypeTraits::Water { .. } => PokemonType::Water,
            TypeTraits::Fire { .. } => PokemonType::Fire,
            TypeTraits::Grass { .. } => PokemonType::Grass,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PokemonInst {
    pub name: String,
    pub level: u8,
    pub strength: u32,
    pub defense: u32,
    pub agility: u32,
    current_hp: u32,
    max_hp: u32,
    traits: TypeTraits,
}

impl PokemonInst {
    /// Create a new Pokemon at full health. The starting HP becomes its maximum.
    pub fn new(
        name: impl Into<String>,
        stats: BaseStats,
        traits: TypeTraits,
    ) -> Result<Self, PokemonDataError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PokemonDataError::EmptyName);
        }
        if stats.level > MAX_LEVEL {
            return Err(PokemonDataError::LevelOutOfRange(stats.level));
        }
        match traits {
            TypeTraits::Fire { temperature } => check_factor("temperature", temperature)?,
            TypeTraits::Grass { healing } => check_factor("healing", healing)?,
            TypeTraits::Water { .. } => {}
        }

        Ok(PokemonInst {
            name,
            level: stats.level as u8,
            strength: stats.strength,
            defense: stats.defense,
            agility: stats.agility,
            current_hp: stats.hp,
            max_hp: stats.hp,
            traits,
        })
    }

    pub fn pokemon_type(&self) -> PokemonType {
        self.traits.pokemon_type()
    }

    pub fn traits(&self) -> &TypeTraits {
        &self.traits
    }

    pub fn current_hp(&self) -> u32 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// A Pokemon is debilitated once its HP reaches zero.
    pub fn is_debilitated(&self) -> bool {
        self.current_hp == 0
    }

    /// Remove up to `amount` HP. Returns the HP actually removed.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let dealt = amount.min(self.current_hp);
        self.current_hp -= dealt;
        dealt
    }

    /// Restore up to `amount` HP without exceeding the maximum. Returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp - self.current_hp);
        self.current_hp += restored;
        restored
    }

    /// Untyped attack: `max(1, strength - defense)`.
    pub fn basic_attack(&self, opponent: &mut PokemonInst) -> u32 {
        let damage = self.strength.saturating_sub(opponent.defense).max(1);
        opponent.take_damage(damage)
    }

    /// Ranking score of this Pokemon's type against the opponent's.
    pub fn effectiveness(&self, opponent: &PokemonInst) -> i8 {
        PokemonType::effectiveness(self.pokemon_type(), opponent.pokemon_type())
    }

    /// Surge mode for Water Pokemon, `None` for the other types.
    pub fn surge_mode(&self) -> Option<bool> {
        match self.traits {
            TypeTraits::Water { surge_mode } => Some(surge_mode),
            _ => None,
        }
    }

    /// Recompute surge mode: active while HP is below half of its maximum.
    fn refresh_surge_mode(&mut self) -> bool {
        let below_half = (self.current_hp as u64) * 2 < self.max_hp as u64;
        if let TypeTraits::Water { surge_mode } = &mut self.traits {
            *surge_mode = below_half;
            below_half
        } else {
            false
        }
    }

    /// The type-specific attack of whichever variant this Pokemon is.
    ///
    /// Water refreshes its surge mode first and adds 0.1 to the factor while it is active.
    pub fn type_attack(&mut self, opponent: &mut PokemonInst) -> u32 {
        let surge_bonus = if self.refresh_surge_mode() { 1 } else { 0 };
        let factor_tenths =
            PokemonType::type_factor_tenths(self.pokemon_type(), opponent.pokemon_type()) + surge_bonus;

        let raw = (factor_tenths as u64 * self.strength as u64) / 10;
        let damage = raw.saturating_sub(opponent.defense as u64).max(1);
        opponent.take_damage(damage.min(u32::MAX as u64) as u32)
    }

    pub fn water_attack(&mut self, opponent: &mut PokemonInst) -> BattleResult<u32> {
        self.expect_type(PokemonType::Water)?;
        Ok(self.type_attack(opponent))
    }

    pub fn fire_attack(&mut self, opponent: &mut PokemonInst) -> BattleResult<u32> {
        self.expect_type(PokemonType::Fire)?;
        Ok(self.type_attack(opponent))
    }

    pub fn grass_attack(&mut self, opponent: &mut PokemonInst) -> BattleResult<u32> {
        self.expect_type(PokemonType::Grass)?;
        Ok(self.type_attack(opponent))
    }

    /// Fire follow-up: `floor(strength * temperature)` extra damage.
    pub fn embers(&self, opponent: &mut PokemonInst) -> BattleResult<u32> {
        match self.traits {
            TypeTraits::Fire { temperature } => {
                let damage = floor_to_u32(self.strength as f64 * temperature);
                Ok(opponent.take_damage(damage))
            }
            _ => Err(self.wrong_variant(PokemonType::Fire).into()),
        }
    }

    /// Grass follow-up: restores `floor(healing * current_hp)`.
    pub fn heal_self(&mut self) -> BattleResult<u32> {
        match self.traits {
            TypeTraits::Grass { healing } => {
                let amount = floor_to_u32(healing * self.current_hp as f64);
                Ok(self.heal(amount))
            }
            _ => Err(self.wrong_variant(PokemonType::Grass).into()),
        }
    }

    fn expect_type(&self, expected: PokemonType) -> BattleResult<()> {
        if self.pokemon_type() == expected {
            Ok(())
        } else {
            Err(self.wrong_variant(expected).into())
        }
    }

    fn wrong_variant(&self, expected: PokemonType) -> BattleStateError {
        BattleStateError::WrongVariant {
            name: self.name.clone(),
            expected,
            actual: self.pokemon_type(),
        }
    }
}

impl fmt::Display for PokemonInst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) Stats: Level: {}, ATT: {}, DEF: {}, AGI: {}, HP: {}/{}",
            self.name,
            self.pokemon_type(),
            self.level,
            self.strength,
            self.defense,
            self.agility,
            self.current_hp,
            self.max_hp
        )
    }
}

fn check_factor(field: &'static str, value: f64) -> Result<(), PokemonDataError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(PokemonDataError::InvalidFactor { field, value })
    }
}

// Inputs are validated non-negative and finite, so the cast only saturates on overflow.
fn floor_to_u32(value: f64) -> u32 {
    value.floor() as u32
}
