//! Replay equivalence: a log rebuilds the live state exactly.

use liars_dice::agents::RandomAgent;
use liars_dice::core::{GameConfig, PlayerId, PlayerMap, ReplayError};
use liars_dice::events::{
    action_records, decode_log, encode_log, from_json_lines, replay, to_json_lines,
    EventPayload, JsonLinesRecorder, Recorder, Replayer,
};
use liars_dice::play::MatchPlay;
use liars_dice::rules::Engine;
use liars_dice::{Action, BidOrdering};

fn config(seed: u64) -> GameConfig {
    GameConfig::builder()
        .dice_distribution(vec![3, 3, 2])
        .ones_wild(true)
        .rng_seed(seed)
        .build()
        .unwrap()
}

fn random_agents(count: usize, seed: u64) -> PlayerMap<RandomAgent> {
    PlayerMap::new(count, |p| RandomAgent::new(seed * 31 + u64::from(p.0)))
}

#[test]
fn test_full_match_replays_to_identical_state() {
    for seed in 0..10 {
        let mut game = MatchPlay::new(config(seed));
        let mut agents = random_agents(3, seed);
        game.play_to_completion(&mut agents).unwrap();

        let engine = game.into_engine();
        let rebuilt = replay(config(seed), &engine.events()).unwrap();
        assert_eq!(&rebuilt, engine.state(), "seed {seed}");
        assert_eq!(rebuilt.match_winner(), engine.state().match_winner());
    }
}

#[test]
fn test_replay_restores_agent_labels() {
    let mut game = MatchPlay::new(config(5));
    let mut agents = PlayerMap::new(3, |p| {
        RandomAgent::new(u64::from(p.0)).with_label(format!("random-{}", p.0))
    });
    game.play_round(&mut agents).unwrap();

    let engine = game.into_engine();
    let rebuilt = replay(config(5), &engine.events()).unwrap();
    assert_eq!(
        rebuilt.player(PlayerId::new(2)).and_then(|p| p.agent_label()),
        Some("random-2")
    );
}

#[test]
fn test_relabelled_seats_replay_across_rounds() {
    let mut game = MatchPlay::new(config(13));
    let mut first = random_agents(3, 13);
    game.play_round(&mut first).unwrap();

    let mut second = PlayerMap::new(3, |p| {
        RandomAgent::new(50 + u64::from(p.0)).with_label("swapped")
    });
    game.play_to_completion(&mut second).unwrap();

    let engine = game.into_engine();
    let rebuilt = replay(config(13), &engine.events()).unwrap();
    assert_eq!(&rebuilt, engine.state());
    assert!(rebuilt
        .players()
        .values()
        .all(|p| p.agent_label() == Some("swapped")));
}

#[test]
fn test_unseeded_game_replays_from_recorded_dice() {
    let config = GameConfig::builder()
        .dice_per_player(2, 4)
        .unseeded()
        .build()
        .unwrap();
    let mut game = MatchPlay::new(config.clone());
    let mut agents = random_agents(2, 99);
    game.play_to_completion(&mut agents).unwrap();

    let engine = game.into_engine();
    let rebuilt = replay(config, &engine.events()).unwrap();
    assert_eq!(&rebuilt, engine.state());
}

#[test]
fn test_replay_under_standard_ordering() {
    let config = GameConfig::builder()
        .dice_distribution(vec![4, 4])
        .ones_wild(true)
        .bid_ordering(BidOrdering::LiarsDiceStandard)
        .build()
        .unwrap();
    let mut game = MatchPlay::new(config.clone());
    let mut agents = random_agents(2, 4);
    game.play_to_completion(&mut agents).unwrap();

    let engine = game.into_engine();
    assert_eq!(&replay(config, &engine.events()).unwrap(), engine.state());
}

#[test]
fn test_replay_through_json_lines_and_bincode() {
    let mut engine = Engine::with_recorder(config(8), JsonLinesRecorder::new(Vec::new()));
    engine.start_new_round().unwrap();
    engine.apply_action(PlayerId::new(0), Action::bid(2, 4)).unwrap();
    engine.apply_action(PlayerId::new(1), Action::CallLiar).unwrap();
    engine.recorder_mut().flush().unwrap();

    let live_state = engine.state().clone();
    let events = engine.events();
    let text = String::from_utf8(engine.into_recorder().into_inner()).unwrap();

    let from_text = from_json_lines(&text).unwrap();
    assert_eq!(from_text, events);
    assert_eq!(replay(config(8), &from_text).unwrap(), live_state);

    let bytes = encode_log(&events).unwrap();
    let from_bytes = decode_log(&bytes).unwrap();
    assert_eq!(replay(config(8), &from_bytes).unwrap(), live_state);

    assert_eq!(to_json_lines(&from_bytes).unwrap(), text);
}

#[test]
fn test_replay_rejects_log_under_other_config() {
    let mut game = MatchPlay::new(config(3));
    let mut agents = random_agents(3, 3);
    game.play_round(&mut agents).unwrap();
    let events = game.engine().events();

    let other = GameConfig::builder()
        .dice_distribution(vec![3, 3, 3])
        .ones_wild(true)
        .build()
        .unwrap();
    assert!(matches!(
        replay(other, &events),
        Err(ReplayError::DiceMismatch { .. }) | Err(ReplayError::Divergence { .. })
    ));
}

#[test]
fn test_incremental_replay_tracks_live_engine() {
    let mut engine = Engine::new(config(11));
    let mut replayer = Replayer::new(config(11));
    let mut agents = random_agents(3, 11);
    engine.start_new_round().unwrap();

    let mut consumed = 0;
    while !engine.is_terminal() {
        let player = engine.state().public().current_player;
        let view = engine.get_view(player).unwrap();
        let action = liars_dice::Agent::choose_action(&mut agents[player], &view);
        engine.apply_action(player, action).unwrap();

        // a challenge is replayed together with its reveal and outcome
        let events = engine.events();
        for event in &events[consumed..] {
            replayer.apply(event).unwrap();
        }
        consumed = events.len();
        if !engine.is_terminal() {
            assert_eq!(replayer.state(), engine.state());
        }
    }
    assert_eq!(replayer.finish().unwrap(), engine.into_state());
}

#[test]
fn test_action_records_drive_a_second_engine() {
    let mut game = MatchPlay::new(config(21));
    let mut agents = random_agents(3, 21);
    game.play_round(&mut agents).unwrap();
    let events = game.engine().events();

    let records: Vec<_> = action_records(&events).collect();
    assert!(records.last().map_or(false, |r| r.action == Action::CallLiar));
    let bids = events
        .iter()
        .filter(|e| matches!(e.payload, EventPayload::BidPlaced { .. }))
        .count();
    assert_eq!(records.len(), bids + 1);

    // same seed, same actions: same log
    let mut engine = Engine::new(config(21));
    for (player, agent) in agents.iter() {
        engine
            .set_agent_label(player, Some(liars_dice::Agent::label(agent).to_owned()))
            .unwrap();
    }
    engine.start_new_round().unwrap();
    for record in &records {
        engine.apply_action(record.player, record.action).unwrap();
    }
    let replayed: Vec<_> = engine.events();
    assert_eq!(replayed.len(), events.len() - 1);
    for (a, b) in replayed.iter().zip(&events) {
        assert!(a.same_record(b), "{a} vs {b}");
    }
}
