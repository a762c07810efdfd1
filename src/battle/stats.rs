//! Damage and healing aggregates over a finished battle.

use ordered_float::OrderedFloat;
use schema::PokemonType;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// One attack action as seen by the statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttackRecord {
    pub attacker: String,
    /// Primary damage plus any embers damage of the same action.
    pub damage: u32,
    pub attacker_type: PokemonType,
    pub opponent_type: PokemonType,
    pub healing: u32,
}

/// Count, mean and sample standard deviation of one group of observations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// `None` with fewer than two samples.
    pub std_dev: Option<f64>,
}

impl Summary {
    fn from_samples(samples: &[u32]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let count = samples.len();
        let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / count as f64;
        let std_dev = (count > 1).then(|| {
            let variance = samples
                .iter()
                .map(|&s| (s as f64 - mean).powi(2))
                .sum::<f64>()
                / (count - 1) as f64;
            variance.sqrt()
        });
        Some(Summary { count, mean, std_dev })
    }
}

/// The five aggregate views of a battle's attack log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattleStatistics {
    pub damage_by_pokemon: BTreeMap<String, Summary>,
    pub damage_by_type: BTreeMap<PokemonType, Summary>,
    pub damage_by_matchup: BTreeMap<(PokemonType, PokemonType), Summary>,
    pub healing_by_pokemon: BTreeMap<String, Summary>,
    pub healing_by_type: BTreeMap<PokemonType, Summary>,
}

impl BattleStatistics {
    /// Aggregate a list of observations. Every group averages over all actions in it,
    /// so basic and non-Grass attacks count as zero healing.
    pub fn from_records(records: &[AttackRecord]) -> Self {
        BattleStatistics {
            damage_by_pokemon: summarize(records, |r| r.attacker.clone(), |r| r.damage),
            damage_by_type: summarize(records, |r| r.attacker_type, |r| r.damage),
            damage_by_matchup: summarize(records, |r| (r.attacker_type, r.opponent_type), |r| r.damage),
            healing_by_pokemon: summarize(records, |r| r.attacker.clone(), |r| r.healing),
            healing_by_type: summarize(records, |r| r.attacker_type, |r| r.healing),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.damage_by_pokemon.is_empty()
    }
}

fn summarize<K: Ord>(
    records: &[AttackRecord],
    key: impl Fn(&AttackRecord) -> K,
    value: impl Fn(&AttackRecord) -> u32,
) -> BTreeMap<K, Summary> {
    let mut groups: BTreeMap<K, Vec<u32>> = BTreeMap::new();
    for record in records {
        groups.entry(key(record)).or_default().push(value(record));
    }
    groups
        .into_iter()
        .filter_map(|(k, samples)| Summary::from_samples(&samples).map(|summary| (k, summary)))
        .collect()
}

/// Rows sorted by mean, highest first; ties keep key order.
fn ranked<K>(table: &BTreeMap<K, Summary>) -> Vec<(&K, &Summary)> {
    let mut rows: Vec<_> = table.iter().collect();
    rows.sort_by_key(|(_, summary)| std::cmp::Reverse(OrderedFloat(summary.mean)));
    rows
}

fn write_table<K>(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    table: &BTreeMap<K, Summary>,
    label: impl Fn(&K) -> String,
) -> fmt::Result {
    writeln!(f, "{}", title)?;
    writeln!(f, "  {:<24} {:>5} {:>8} {:>8}", "", "count", "mean", "std")?;
    for (key, summary) in ranked(table) {
        let std_dev = summary
            .std_dev
            .map(|s| format!("{:.2}", s))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            f,
            "  {:<24} {:>5} {:>8.2} {:>8}",
            label(key),
            summary.count,
            summary.mean,
            std_dev
        )?;
    }
    writeln!(f)
}

impl fmt::Display for BattleStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No attacks were recorded.");
        }
        write_table(f, "Damage per Pokemon", &self.damage_by_pokemon, |k| k.clone())?;
        write_table(f, "Damage per type", &self.damage_by_type, |k| k.to_string())?;
        write_table(f, "Damage per matchup", &self.damage_by_matchup, |(a, d)| {
            format!("{} vs {}", a, d)
        })?;
        write_table(f, "Healing per Pokemon", &self.healing_by_pokemon, |k| k.clone())?;
        write_table(f, "Healing per type", &self.healing_by_type, |k| k.to_string())
    }
}
