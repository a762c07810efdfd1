use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumString, EnumIter,
)]
pub enum PokemonType {
    Water,
    Fire,
    Grass,
}

impl fmt::Display for PokemonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl PokemonType {
    /// Damage factor of an attacking type against a defending type, in tenths.
    /// Returns: 15 = advantaged, 10 = same type, 5 = disadvantaged
    ///
    /// Kept as an integer so `floor(factor * strength)` is exact once the
    /// Water surge bonus (+1 tenth) is added on top.
    pub fn type_factor_tenths(attacking: PokemonType, defending: PokemonType) -> u32 {
        use PokemonType::*;

        match (attacking, defending) {
            (Water, Fire) | (Fire, Grass) | (Grass, Water) => 15,
            (Water, Grass) | (Fire, Water) | (Grass, Fire) => 5,
            (Water, Water) | (Fire, Fire) | (Grass, Grass) => 10,
        }
    }

    /// Three-valued advantage score used to rank replacement candidates.
    /// Returns: 1 = advantaged, 0 = neutral, -1 = disadvantaged
    pub fn effectiveness(attacking: PokemonType, defending: PokemonType) -> i8 {
        use PokemonType::*;

        match (attacking, defending) {
            (Water, Fire) | (Fire, Grass) | (Grass, Water) => 1,
            (Water, Grass) | (Fire, Water) | (Grass, Fire) => -1,
            (Water, Water) | (Fire, Fire) | (Grass, Grass) => 0,
        }
    }
}
