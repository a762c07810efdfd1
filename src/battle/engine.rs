use crate::battle::state::{AttackKind, BattleEvent, BattleState, EventBus, GameState};
use crate::battle::stats::AttackRecord;
use crate::errors::{BattleResult, BattleStateError};
use crate::player::BattlePlayer;
use crate::pokemon::PokemonInst;
use serde::Serialize;

/// What a single attack action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AttackOutcome {
    pub kind: AttackKind,
    /// Damage from the primary attack.
    pub damage: u32,
    /// Follow-up damage from a Fire Pokemon's embers.
    pub embers: u32,
    /// HP a Grass Pokemon restored to itself.
    pub healing: u32,
    /// Whether a Water Pokemon attacked in surge mode.
    pub surge: bool,
}

impl AttackOutcome {
    pub fn total_damage(&self) -> u32 {
        self.damage + self.embers
    }
}

/// Decide which side attacks first. The faster Pokemon goes first and player 1 wins ties.
pub fn attack_order(p1: &PokemonInst, p2: &PokemonInst) -> [usize; 2] {
    if p1.agility < p2.agility {
        [1, 0]
    } else {
        [0, 1]
    }
}

/// Perform one attack action for the given round.
///
/// Even rounds use the basic attack. Odd rounds use the attacker's type attack;
/// Fire follows up with embers if the defender is still standing and Grass
/// always heals itself afterwards.
pub fn resolve_attack(
    attacker: &mut PokemonInst,
    defender: &mut PokemonInst,
    round_number: u32,
) -> BattleResult<AttackOutcome> {
    let kind = AttackKind::for_round(round_number, attacker.pokemon_type());
    let mut outcome = AttackOutcome {
        kind,
        damage: 0,
        embers: 0,
        healing: 0,
        surge: false,
    };

    match kind {
        AttackKind::Basic => {
            outcome.damage = attacker.basic_attack(defender);
        }
        AttackKind::Water => {
            outcome.damage = attacker.water_attack(defender)?;
            outcome.surge = attacker.surge_mode() == Some(true);
        }
        AttackKind::Fire => {
            outcome.damage = attacker.fire_attack(defender)?;
            if !defender.is_debilitated() {
                outcome.embers = attacker.embers(defender)?;
            }
        }
        AttackKind::Grass => {
            outcome.damage = attacker.grass_attack(defender)?;
            outcome.healing = attacker.heal_self()?;
        }
    }

    tracing::debug!(
        attacker = %attacker.name,
        defender = %defender.name,
        ?kind,
        damage = outcome.damage,
        embers = outcome.embers,
        healing = outcome.healing,
        "attack resolved"
    );
    Ok(outcome)
}

/// Send out the first Pokemon of each team, or settle the battle if a team has none able to fight.
pub fn start_battle(battle_state: &mut BattleState) -> BattleResult<EventBus> {
    if battle_state.is_over() {
        return Err(BattleStateError::BattleOver.into());
    }
    if battle_state.game_state != GameState::BattleStart {
        return Err(BattleStateError::AlreadyStarted.into());
    }
    let mut bus = EventBus::new();
    bus.push(BattleEvent::BattleStarted);

    if check_for_battle_end(battle_state, &mut bus) {
        return Ok(bus);
    }

    for player_index in 0..2 {
        let player = &battle_state.players[player_index];
        let team_index = player
            .select_first_active()
            .ok_or_else(|| BattleStateError::NoActivePokemon(player.player_name.clone()))?;
        battle_state.active[player_index] = Some(team_index);
    }

    tracing::info!(
        "battle started: {} vs {}",
        battle_state.players[0].player_name,
        battle_state.players[1].player_name
    );
    begin_combat(battle_state, &[0, 1], &mut bus)?;
    Ok(bus)
}

/// Advance the battle by one round, starting the battle or the next combat first when needed.
pub fn resolve_round(battle_state: &mut BattleState) -> BattleResult<EventBus> {
    let mut bus = EventBus::new();

    match battle_state.game_state {
        GameState::BattleStart => {
            bus.append(start_battle(battle_state)?);
            if battle_state.is_over() {
                return Ok(bus);
            }
        }
        GameState::CombatResolved => send_out_replacement(battle_state, &mut bus)?,
        GameState::CombatInProgress => {}
        GameState::Player1Win | GameState::Player2Win | GameState::Draw => {
            return Err(BattleStateError::BattleOver.into());
        }
    }

    execute_round(battle_state, &mut bus)?;
    Ok(bus)
}

/// Rounds `run_battle` will play before giving up on a battle that cannot finish.
pub const DEFAULT_ROUND_LIMIT: u32 = 10_000;

/// Resolve rounds until one trainer has no Pokemon left.
pub fn run_battle(battle_state: &mut BattleState) -> BattleResult<EventBus> {
    run_battle_with_limit(battle_state, DEFAULT_ROUND_LIMIT)
}

/// Like [`run_battle`], but fails once `max_rounds` rounds have been played.
///
/// Grass Pokemon heal after every type attack, so two of them can out-heal each
/// other's damage forever.
pub fn run_battle_with_limit(battle_state: &mut BattleState, max_rounds: u32) -> BattleResult<EventBus> {
    let mut bus = EventBus::new();
    let mut rounds_played = 0;
    while !battle_state.is_over() {
        if rounds_played >= max_rounds {
            tracing::warn!("battle stopped after {} rounds without a winner", rounds_played);
            return Err(BattleStateError::RoundLimitExceeded(max_rounds).into());
        }
        bus.append(resolve_round(battle_state)?);
        rounds_played += 1;
    }
    Ok(bus)
}

fn execute_round(battle_state: &mut BattleState, bus: &mut EventBus) -> BattleResult<()> {
    let round_number = battle_state.round_number;
    let order = {
        let p1 = active_of(battle_state, 0)?;
        let p2 = active_of(battle_state, 1)?;
        bus.push(BattleEvent::RoundStarted {
            combat_number: battle_state.combat_number,
            round_number,
            fighters: [p1.to_string(), p2.to_string()],
        });
        attack_order(p1, p2)
    };

    for attacker_index in order {
        let defender_index = 1 - attacker_index;
        let (attacker, defender) = active_pair_mut(battle_state, attacker_index)?;

        let outcome = resolve_attack(attacker, defender, round_number)?;
        let record = AttackRecord {
            attacker: attacker.name.clone(),
            damage: outcome.total_damage(),
            attacker_type: attacker.pokemon_type(),
            opponent_type: defender.pokemon_type(),
            healing: outcome.healing,
        };
        push_attack_events(bus, attacker_index, attacker, defender, &outcome);
        let defender_down = defender.is_debilitated();
        let defender_name = defender.name.clone();

        battle_state.observations.push(record);

        if defender_down {
            bus.push(BattleEvent::PokemonDebilitated {
                player_index: defender_index,
                pokemon: defender_name,
            });
            end_combat(battle_state, attacker_index, bus)?;
            return Ok(());
        }
    }

    battle_state.round_number += 1;
    Ok(())
}

fn push_attack_events(
    bus: &mut EventBus,
    attacker_index: usize,
    attacker: &PokemonInst,
    defender: &PokemonInst,
    outcome: &AttackOutcome,
) {
    bus.push(BattleEvent::AttackUsed {
        player_index: attacker_index,
        attacker: attacker.name.clone(),
        defender: defender.name.clone(),
        kind: outcome.kind,
    });
    if outcome.surge {
        bus.push(BattleEvent::SurgeModeActive {
            pokemon: attacker.name.clone(),
        });
    }
    // HP after the primary hit, before embers landed.
    bus.push(BattleEvent::DamageDealt {
        target: defender.name.clone(),
        damage: outcome.damage,
        remaining_hp: defender.current_hp() + outcome.embers,
    });
    if outcome.kind == AttackKind::Fire && outcome.embers > 0 {
        bus.push(BattleEvent::EmbersDealt {
            target: defender.name.clone(),
            damage: outcome.embers,
            remaining_hp: defender.current_hp(),
        });
    }
    if outcome.kind == AttackKind::Grass {
        bus.push(BattleEvent::PokemonHealed {
            target: attacker.name.clone(),
            amount: outcome.healing,
            new_hp: attacker.current_hp(),
        });
    }
}

fn end_combat(battle_state: &mut BattleState, winner_index: usize, bus: &mut EventBus) -> BattleResult<()> {
    let loser_index = 1 - winner_index;
    let winner = active_of(battle_state, winner_index)?.name.clone();
    let loser = active_of(battle_state, loser_index)?.name.clone();

    tracing::info!(
        combat = battle_state.combat_number,
        rounds = battle_state.round_number,
        "{} defeated {}",
        winner,
        loser
    );
    bus.push(BattleEvent::CombatEnded {
        combat_number: battle_state.combat_number,
        winner_index,
        winner,
        loser,
    });

    if !check_for_battle_end(battle_state, bus) {
        battle_state.game_state = GameState::CombatResolved;
    }
    Ok(())
}

/// Replace the debilitated Pokemon with the best match against the combat winner.
fn send_out_replacement(battle_state: &mut BattleState, bus: &mut EventBus) -> BattleResult<()> {
    let loser_index = (0..2)
        .find(|&i| active_of(battle_state, i).map_or(false, |p| p.is_debilitated()))
        .ok_or_else(|| {
            BattleStateError::NoActivePokemon("combat resolved without a debilitated Pokemon".to_string())
        })?;
    let winner = active_of(battle_state, 1 - loser_index)?;

    let next = battle_state.players[loser_index].select_next_active(winner)?;
    battle_state.active[loser_index] = Some(next);
    begin_combat(battle_state, &[loser_index], bus)
}

fn begin_combat(battle_state: &mut BattleState, sent_out: &[usize], bus: &mut EventBus) -> BattleResult<()> {
    battle_state.combat_number += 1;
    battle_state.round_number = 1;
    battle_state.game_state = GameState::CombatInProgress;
    bus.push(BattleEvent::CombatStarted {
        combat_number: battle_state.combat_number,
    });

    for &player_index in sent_out {
        let pokemon = active_of(battle_state, player_index)?.name.clone();
        tracing::info!(
            "{} sends out {}",
            battle_state.players[player_index].player_name,
            pokemon
        );
        bus.push(BattleEvent::PokemonSentOut { player_index, pokemon });
    }
    Ok(())
}

/// Settle the battle if either team is fully debilitated. Returns true when it ended.
fn check_for_battle_end(battle_state: &mut BattleState, bus: &mut EventBus) -> bool {
    let p1_out = battle_state.players[0].all_debilitated();
    let p2_out = battle_state.players[1].all_debilitated();

    let (game_state, winner) = match (p1_out, p2_out) {
        (false, false) => return false,
        (true, true) => (GameState::Draw, None),
        (false, true) => (GameState::Player1Win, Some(0)),
        (true, false) => (GameState::Player2Win, Some(1)),
    };

    battle_state.game_state = game_state;
    match winner {
        Some(index) => tracing::info!("{} wins the battle", battle_state.players[index].player_name),
        None => tracing::info!("battle ended in a draw"),
    }
    bus.push(BattleEvent::BattleEnded { winner });
    true
}

fn active_of(battle_state: &BattleState, player_index: usize) -> BattleResult<&PokemonInst> {
    battle_state.active_pokemon(player_index).ok_or_else(|| {
        BattleStateError::NoActivePokemon(battle_state.players[player_index].player_name.clone()).into()
    })
}

/// Borrow the attacker's and defender's active Pokemon at the same time.
fn active_pair_mut(
    battle_state: &mut BattleState,
    attacker_index: usize,
) -> BattleResult<(&mut PokemonInst, &mut PokemonInst)> {
    if attacker_index > 1 {
        return Err(BattleStateError::InvalidPlayerIndex(attacker_index).into());
    }
    let active = battle_state.active;
    let [p1, p2] = &mut battle_state.players;
    let (attacker_player, defender_player) = if attacker_index == 0 { (p1, p2) } else { (p2, p1) };

    let attacker = slot_mut(attacker_player, active[attacker_index])?;
    let defender = slot_mut(defender_player, active[1 - attacker_index])?;
    Ok((attacker, defender))
}

fn slot_mut(player: &mut BattlePlayer, slot: Option<usize>) -> BattleResult<&mut PokemonInst> {
    match slot {
        Some(index) if index < player.team.len() => Ok(&mut player.team[index]),
        _ => Err(BattleStateError::NoActivePokemon(player.player_name.clone()).into()),
    }
}
