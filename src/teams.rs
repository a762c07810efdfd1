//! Building battle players from roster files.
//!
//! Two formats are understood. The text format is one block per trainer:
//!
//! ```text
//! Ash
//! Squirtle (Type: Water, Level: 10, Strength: 10, Defense: 5, HP: 20, Agility: 8)
//! Charmander (Type: Fire, Level: 12, Strength: 8, Defense: 4, HP: 18, Agility: 6, Temperature: 1.5)
//!
//! Gary
//! Bulbasaur (Type: Grass, Level: 11, Strength: 7, Defense: 6, HP: 22, Agility: 5, Healing: 0.2)
//! ```
//!
//! The RON format deserializes a [`BattleSetup`] of team templates.

use crate::errors::{ParseError, ParseResult, PokemonDataError};
use crate::player::BattlePlayer;
use crate::pokemon::{BaseStats, PokemonInst, TypeTraits};
use schema::PokemonType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;

/// Type-specific part of a Pokemon template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PokemonKind {
    Water,
    Fire { temperature: f64 },
    Grass { healing: f64 },
}

impl From<PokemonKind> for TypeTraits {
    fn from(kind: PokemonKind) -> Self {
        match kind {
            PokemonKind::Water => TypeTraits::water(),
            PokemonKind::Fire { temperature } => TypeTraits::Fire { temperature },
            PokemonKind::Grass { healing } => TypeTraits::Grass { healing },
        }
    }
}

/// A Pokemon as written in a roster file, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PokemonTemplate {
    pub name: String,
    pub kind: PokemonKind,
    pub level: u32,
    pub strength: u32,
    pub defense: u32,
    pub hp: u32,
    pub agility: u32,
}

/// A trainer and the Pokemon they bring, in send-out order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTemplate {
    pub name: String,
    pub pokemon: Vec<PokemonTemplate>,
}

/// Both sides of a battle as stored in a RON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSetup {
    /// Must hold exactly two trainers.
    pub trainers: Vec<TeamTemplate>,
}

/// Create a Pokemon from a template, validating its stats.
pub fn create_pokemon_from_template(template: &PokemonTemplate) -> Result<PokemonInst, PokemonDataError> {
    PokemonInst::new(
        template.name.clone(),
        BaseStats {
            level: template.level,
            strength: template.strength,
            defense: template.defense,
            hp: template.hp,
            agility: template.agility,
        },
        template.kind.into(),
    )
}

/// Convert the team template in trainer slot `index` (1-based) into a BattlePlayer.
pub fn create_battle_player_from_team(index: usize, team: &TeamTemplate) -> ParseResult<BattlePlayer> {
    if team.name.trim().is_empty() {
        return Err(ParseError::UnnamedTrainer { index });
    }
    let pokemon = team
        .pokemon
        .iter()
        .enumerate()
        .map(|(i, template)| {
            create_pokemon_from_template(template).map_err(|source| ParseError::InvalidTemplate {
                trainer: team.name.clone(),
                index: i + 1,
                source,
            })
        })
        .collect::<ParseResult<Vec<_>>>()?;

    Ok(BattlePlayer::new(team.name.clone(), pokemon))
}

/// Read both players from a RON `BattleSetup`.
pub fn parse_ron_setup(text: &str) -> ParseResult<(BattlePlayer, BattlePlayer)> {
    let setup: BattleSetup = ron::from_str(text).map_err(|e| ParseError::Ron(e.to_string()))?;
    let [first, second] = setup.trainers.as_slice() else {
        tracing::warn!("RON roster has {} trainers", setup.trainers.len());
        return Err(ParseError::TrainerCount(setup.trainers.len()));
    };
    Ok((
        create_battle_player_from_team(1, first)?,
        create_battle_player_from_team(2, second)?,
    ))
}

/// Read both players from the text roster format.
///
/// Trainer blocks are separated by one or more blank lines and there must be exactly two.
pub fn parse_battle_file(text: &str) -> ParseResult<(BattlePlayer, BattlePlayer)> {
    let blocks = split_blocks(text);
    if blocks.len() != 2 {
        tracing::warn!("roster file has {} trainer blocks", blocks.len());
        return Err(ParseError::TrainerCount(blocks.len()));
    }

    let mut players = blocks
        .iter()
        .map(parse_team_block)
        .collect::<ParseResult<Vec<_>>>()?;
    let second = players.remove(1);
    let first = players.remove(0);
    Ok((first, second))
}

/// A trainer name line followed by that trainer's Pokemon lines.
struct TeamBlock<'a> {
    name: &'a str,
    /// 1-based line number and trimmed text of each Pokemon line.
    lines: Vec<(usize, &'a str)>,
}

/// Groups non-blank lines into blocks separated by blank lines.
fn split_blocks(text: &str) -> Vec<TeamBlock<'_>> {
    let mut blocks = Vec::new();
    let mut current: Option<TeamBlock<'_>> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            blocks.extend(current.take());
            continue;
        }
        match current.as_mut() {
            Some(block) => block.lines.push((index + 1, line)),
            None => current = Some(TeamBlock { name: line, lines: Vec::new() }),
        }
    }
    blocks.extend(current);
    blocks
}

fn parse_team_block(block: &TeamBlock<'_>) -> ParseResult<BattlePlayer> {
    let team = block
        .lines
        .iter()
        .map(|&(line, text)| {
            let template = parse_pokemon_line(line, text)?;
            create_pokemon_from_template(&template)
                .map_err(|source| ParseError::InvalidPokemon { line, source })
        })
        .collect::<ParseResult<Vec<_>>>()?;

    tracing::debug!("parsed trainer {} with {} Pokemon", block.name, team.len());
    Ok(BattlePlayer::new(block.name, team))
}

/// Parse `Name (Type: T, Level: L, Strength: S, Defense: D, HP: H, Agility: A[, Temperature: F | Healing: F])`.
pub fn parse_pokemon_line(line: usize, text: &str) -> ParseResult<PokemonTemplate> {
    let malformed = |details: &str| ParseError::MalformedLine {
        line,
        details: details.to_string(),
    };

    let (name, rest) = text
        .split_once('(')
        .ok_or_else(|| malformed("expected `Name (Key: Value, ...)`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(malformed("missing Pokemon name"));
    }
    let body = rest
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| malformed("missing closing `)`"))?;

    let mut fields: HashMap<&str, &str> = HashMap::new();
    for part in body.split(',') {
        let (key, value) = part
            .split_once(':')
            .ok_or_else(|| malformed("expected `Key: Value`"))?;
        let key = key.trim();
        if fields.insert(key, value.trim()).is_some() {
            return Err(ParseError::UnexpectedField {
                line,
                field: key.to_string(),
            });
        }
    }

    let type_token = take_field(&mut fields, line, "Type")?;
    let pokemon_type = PokemonType::from_str(type_token).map_err(|_| ParseError::UnknownType {
        line,
        token: type_token.to_string(),
    })?;

    let level = take_number(&mut fields, line, "Level")?;
    let strength = take_number(&mut fields, line, "Strength")?;
    let defense = take_number(&mut fields, line, "Defense")?;
    let hp = take_number(&mut fields, line, "HP")?;
    let agility = take_number(&mut fields, line, "Agility")?;

    let kind = match pokemon_type {
        PokemonType::Water => PokemonKind::Water,
        PokemonType::Fire => PokemonKind::Fire {
            temperature: take_number(&mut fields, line, "Temperature")?,
        },
        PokemonType::Grass => PokemonKind::Grass {
            healing: take_number(&mut fields, line, "Healing")?,
        },
    };

    if let Some(extra) = fields.keys().min() {
        return Err(ParseError::UnexpectedField {
            line,
            field: extra.to_string(),
        });
    }

    Ok(PokemonTemplate {
        name: name.to_string(),
        kind,
        level,
        strength,
        defense,
        hp,
        agility,
    })
}

fn take_field<'a>(
    fields: &mut HashMap<&str, &'a str>,
    line: usize,
    field: &'static str,
) -> ParseResult<&'a str> {
    fields
        .remove(field)
        .ok_or(ParseError::MissingField { line, field })
}

fn take_number<T: FromStr>(
    fields: &mut HashMap<&str, &str>,
    line: usize,
    field: &'static str,
) -> ParseResult<T> {
    let value = take_field(fields, line, field)?;
    value.parse().map_err(|_| ParseError::InvalidNumber {
        line,
        field: field.to_string(),
        value: value.to_string(),
    })
}
