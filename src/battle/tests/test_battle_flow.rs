#[cfg(test)]
mod tests {
    use crate::battle::engine::{resolve_round, run_battle, run_battle_with_limit, start_battle};
    use crate::battle::state::{BattleEvent, BattleState, GameState};
    use crate::battle::stats::BattleStatistics;
    use crate::battle::tests::common::{
        assert_ok, create_team_battle, create_test_battle, TestPokemonBuilder,
    };
    use crate::errors::{BattleEngineError, BattleStateError};
    use crate::pokemon::PokemonInst;
    use pretty_assertions::assert_eq;
    use schema::PokemonType;

    fn squirtle() -> PokemonInst {
        TestPokemonBuilder::new("Squirtle", PokemonType::Water)
            .with_strength(10)
            .with_defense(5)
            .with_hp(20)
            .with_agility(8)
            .build()
    }

    fn charmander() -> PokemonInst {
        TestPokemonBuilder::new("Charmander", PokemonType::Fire)
            .with_strength(8)
            .with_defense(4)
            .with_hp(18)
            .with_agility(6)
            .with_temperature(1.0)
            .build()
    }

    fn damage_log(battle_state: &BattleState) -> Vec<(String, u32)> {
        battle_state
            .observations
            .iter()
            .map(|r| (r.attacker.clone(), r.damage))
            .collect()
    }

    #[test]
    fn test_single_combat_plays_out_round_by_round() {
        // Arrange
        let mut battle_state = create_test_battle(squirtle(), charmander());

        // Act: round 1, type attacks
        let event_bus = assert_ok(resolve_round(&mut battle_state));
        event_bus.print_debug_with_message("Round 1 events:");

        // Assert: Squirtle 11, Charmander 1 plus 8 embers
        assert_eq!(battle_state.combat_number, 1);
        assert_eq!(battle_state.players[1].team[0].current_hp(), 7);
        assert_eq!(battle_state.players[0].team[0].current_hp(), 11);
        assert!(event_bus
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::EmbersDealt { damage: 8, .. })));

        // Act: round 2, basic attacks
        assert_ok(resolve_round(&mut battle_state));
        assert_eq!(battle_state.players[1].team[0].current_hp(), 1);
        assert_eq!(battle_state.players[0].team[0].current_hp(), 8);

        // Act: round 3, Squirtle is below half HP and surges
        let event_bus = assert_ok(resolve_round(&mut battle_state));
        event_bus.print_debug_with_message("Round 3 events:");

        assert!(event_bus
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::SurgeModeActive { .. })));
        assert!(battle_state.players[1].team[0].is_debilitated());
        assert_eq!(battle_state.game_state, GameState::Player1Win);
        assert_eq!(battle_state.winner(), Some(0));
        assert_eq!(
            damage_log(&battle_state),
            vec![
                ("Squirtle".to_string(), 11),
                ("Charmander".to_string(), 9),
                ("Squirtle".to_string(), 6),
                ("Charmander".to_string(), 3),
                ("Squirtle".to_string(), 1),
            ]
        );
        assert_eq!(battle_state.players[0].team[0].current_hp(), 8);
    }

    #[test]
    fn test_replacement_chosen_against_winner_and_hp_carries_over() {
        // Arrange
        let oddish = TestPokemonBuilder::new("Oddish", PokemonType::Grass)
            .with_level(5)
            .build();
        let poliwag = TestPokemonBuilder::new("Poliwag", PokemonType::Water)
            .with_level(50)
            .build();
        let mut battle_state = create_team_battle(vec![squirtle()], vec![charmander(), oddish, poliwag]);

        // Act: first combat is identical to the single combat battle
        for _ in 0..3 {
            assert_ok(resolve_round(&mut battle_state));
        }
        assert_eq!(battle_state.game_state, GameState::CombatResolved);

        let event_bus = assert_ok(resolve_round(&mut battle_state));
        event_bus.print_debug_with_message("Second combat events:");

        // Assert: Grass beats Water, so the low level Oddish is preferred over Poliwag
        assert_eq!(battle_state.active[1], Some(1));
        assert_eq!(battle_state.combat_number, 2);
        assert!(event_bus.events().contains(&BattleEvent::PokemonSentOut {
            player_index: 1,
            pokemon: "Oddish".to_string(),
        }));
        // Squirtle keeps its 8 HP, surges for 1 and falls to Oddish's grass attack
        assert_eq!(battle_state.players[1].team[1].current_hp(), 19);
        assert!(battle_state.players[0].team[0].is_debilitated());
        assert_eq!(battle_state.game_state, GameState::Player2Win);
        assert_eq!(event_bus.events().last(), Some(&BattleEvent::BattleEnded { winner: Some(1) }));
        // The grass attack only records the HP Squirtle had left
        let last = battle_state.observations.last().unwrap();
        assert_eq!(last.attacker, "Oddish");
        assert_eq!(last.damage, 8);
        // Poliwag never fought
        assert_eq!(battle_state.players[1].team[2].current_hp(), 20);
    }

    #[test]
    fn test_duplicate_names_tracked_by_slot() {
        let first = TestPokemonBuilder::new("Magikarp", PokemonType::Water)
            .with_hp(1)
            .with_agility(1)
            .build();
        let second = TestPokemonBuilder::new("Magikarp", PokemonType::Water)
            .with_hp(30)
            .with_agility(1)
            .build();
        let opponent = TestPokemonBuilder::new("Goldeen", PokemonType::Water)
            .with_hp(100)
            .with_agility(9)
            .build();
        let mut battle_state = create_team_battle(vec![opponent], vec![first, second]);

        assert_ok(resolve_round(&mut battle_state));
        assert_eq!(battle_state.game_state, GameState::CombatResolved);
        assert_ok(resolve_round(&mut battle_state));

        assert_eq!(battle_state.active[1], Some(1));
        assert!(battle_state.players[1].team[0].is_debilitated());
        assert!(!battle_state.players[1].team[1].is_debilitated());
    }

    #[test]
    fn test_empty_rosters_draw() {
        let mut battle_state = create_team_battle(vec![], vec![]);

        let event_bus = assert_ok(run_battle(&mut battle_state));

        assert_eq!(battle_state.game_state, GameState::Draw);
        assert_eq!(battle_state.winner(), None);
        assert_eq!(
            event_bus.events(),
            &[BattleEvent::BattleStarted, BattleEvent::BattleEnded { winner: None }]
        );
        assert!(battle_state.observations.is_empty());
    }

    #[test]
    fn test_roster_with_nothing_able_to_fight_loses_immediately() {
        let fainted = TestPokemonBuilder::new("Fainted", PokemonType::Fire).with_hp(0).build();
        let mut battle_state = create_test_battle(fainted, squirtle());

        assert_ok(run_battle(&mut battle_state));

        assert_eq!(battle_state.game_state, GameState::Player2Win);
        assert!(battle_state.observations.is_empty());
        assert_eq!(battle_state.combat_number, 0);
    }

    #[test]
    fn test_resolve_round_after_battle_over_errors() {
        let mut battle_state = create_test_battle(squirtle(), charmander());
        assert_ok(run_battle(&mut battle_state));

        let result = resolve_round(&mut battle_state);

        assert_eq!(
            result.err(),
            Some(BattleEngineError::BattleState(BattleStateError::BattleOver))
        );
    }

    #[test]
    fn test_start_battle_twice_errors() {
        let mut battle_state = create_test_battle(squirtle(), charmander());
        assert_ok(start_battle(&mut battle_state));

        let result = start_battle(&mut battle_state);

        assert_eq!(
            result.err(),
            Some(BattleEngineError::BattleState(BattleStateError::AlreadyStarted))
        );
        assert_eq!(battle_state.game_state, GameState::CombatInProgress);
    }

    #[test]
    fn test_start_battle_after_battle_over_errors() {
        let mut battle_state = create_test_battle(squirtle(), charmander());
        assert_ok(run_battle(&mut battle_state));

        assert_eq!(
            start_battle(&mut battle_state).err(),
            Some(BattleEngineError::BattleState(BattleStateError::BattleOver))
        );
    }

    #[test]
    fn test_statistics_cover_every_action_of_a_battle() {
        // Arrange
        let oddish = TestPokemonBuilder::new("Oddish", PokemonType::Grass)
            .with_level(5)
            .build();
        let mut battle_state = create_team_battle(vec![squirtle()], vec![charmander(), oddish]);

        // Act
        let event_bus = assert_ok(run_battle(&mut battle_state));
        let stats = BattleStatistics::from_records(&battle_state.observations);

        // Assert
        let attacks_by = |name: &str| {
            event_bus
                .events()
                .iter()
                .filter(|e| matches!(e, BattleEvent::AttackUsed { attacker, .. } if attacker == name))
                .count()
        };
        assert_eq!(stats.damage_by_pokemon["Squirtle"].count, attacks_by("Squirtle"));
        assert_eq!(stats.damage_by_pokemon["Charmander"].count, attacks_by("Charmander"));
        assert_eq!(stats.damage_by_pokemon["Oddish"].count, attacks_by("Oddish"));
        let total: usize = stats.damage_by_type.values().map(|s| s.count).sum();
        assert_eq!(total, battle_state.observations.len());
        assert_eq!(total, 7);
        // Squirtle: 11, 6 and 1 in the first combat, 1 in the second
        assert_eq!(stats.damage_by_pokemon["Squirtle"].mean, 19.0 / 4.0);
        assert_eq!(stats.healing_by_type[&PokemonType::Grass].count, 1);
    }

    #[test]
    fn test_battle_is_deterministic() {
        let oddish = TestPokemonBuilder::new("Oddish", PokemonType::Grass)
            .with_healing(0.3)
            .build();
        let template = create_team_battle(vec![squirtle(), oddish], vec![charmander()]);

        let mut first = template.clone();
        let mut second = template.clone();
        let first_events = assert_ok(run_battle(&mut first));
        let second_events = assert_ok(run_battle(&mut second));

        assert_eq!(first_events.events(), second_events.events());
        assert_eq!(first.observations, second.observations);
        assert_eq!(first.game_state, second.game_state);
    }

    #[test]
    fn test_round_limit_stops_grass_stalemate() {
        // Type attacks deal 1 and heal back to full, basic attacks deal 1.
        let left = TestPokemonBuilder::new("Bellsprout", PokemonType::Grass)
            .with_strength(10)
            .with_defense(10)
            .with_healing(1.0)
            .build();
        let right = TestPokemonBuilder::new("Bellsprout", PokemonType::Grass)
            .with_strength(10)
            .with_defense(10)
            .with_healing(1.0)
            .build();
        let mut battle_state = create_test_battle(left, right);

        let result = run_battle_with_limit(&mut battle_state, 50);

        assert_eq!(
            result.err(),
            Some(BattleEngineError::BattleState(BattleStateError::RoundLimitExceeded(50)))
        );
        assert!(!battle_state.is_over());
        assert_eq!(battle_state.observations.len(), 100);
    }

    #[test]
    fn test_formatted_log_names_trainers() {
        let mut battle_state = create_test_battle(squirtle(), charmander());
        let event_bus = assert_ok(run_battle(&mut battle_state));

        let lines: Vec<String> = event_bus
            .events()
            .iter()
            .filter_map(|e| e.format(&battle_state))
            .collect();

        assert!(lines[0].contains("Player 1 vs Player 2"));
        assert!(lines.iter().any(|l| l == "Player 1 chooses Squirtle"));
        assert!(lines.iter().any(|l| l == "Player 1's Squirtle defeated Charmander"));
        assert!(lines.last().unwrap().ends_with("Player 1 wins the battle!"));
    }
}
