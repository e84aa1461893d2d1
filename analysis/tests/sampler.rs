mod fixtures;

use analysis::trace::Step;
use analysis::ParseOptions;
use fixtures::*;
use pretty_assertions::assert_eq;
use tracing_test::traced_test;

fn sampled_ticks(result: &common::ParseResult) -> Vec<i32> {
    let mut ticks: Vec<_> = result.ticks.iter().map(|t| t.tick).collect();
    ticks.dedup();
    ticks
}

#[test]
fn default_interval_without_tick_rate() {
    let mut script = Script::new();
    script.at(1, [Step::Players { players: roster() }]);
    let result = analysis::parse(script.build(1, 35), &ParseOptions::default()).unwrap();

    assert_eq!(vec![1, 11, 21, 31], sampled_ticks(&result));
    assert_eq!(4 * 4, result.ticks.len());
    assert_eq!(0.0, result.header.tick_rate);
}

#[test]
fn custom_interval_without_tick_rate() {
    let mut script = Script::new();
    script.at(5, [Step::Players { players: roster() }]);
    let options = ParseOptions {
        tick_interval: 3,
        ..Default::default()
    };
    let result = analysis::parse(script.build(5, 15), &options).unwrap();

    assert_eq!(vec![5, 8, 11, 14], sampled_ticks(&result));
}

#[test]
fn tick_rate_128() {
    let mut script = Script::new();
    script.at(1, [
        Step::TickRate { tick_rate: 128.0 },
        Step::Players { players: roster() },
    ]);
    let result = analysis::parse(script.build(1, 40), &ParseOptions::default()).unwrap();

    assert_eq!(vec![1, 13, 25, 37], sampled_ticks(&result));
    assert_eq!(128.0, result.header.tick_rate);
}

#[test]
#[traced_test]
fn tick_rate_known_late() {
    let mut script = Script::new();
    script
        .at(1, [Step::Players { players: roster() }])
        .at(20, [Step::TickRate { tick_rate: 64.0 }]);
    let result = analysis::parse(script.build(1, 35), &ParseOptions::default()).unwrap();

    assert_eq!(vec![1, 11, 20, 26, 32], sampled_ticks(&result));
    assert!(logs_contain("Tick rate discovered"));
}

#[test]
fn sampled_frames_respect_the_interval() {
    let mut script = Script::new();
    script.at(1, [
        Step::TickRate { tick_rate: 64.0 },
        Step::Players { players: roster() },
    ]);

    // Frames with gaps, the way a decoder skips ticks without packets.
    let mut replay = analysis::scripted::ScriptedReplay::new(header());
    replay.extend(script.build(1, 1).steps().iter().cloned());
    for frame in [3, 4, 8, 9, 15, 16, 17, 21, 30, 31] {
        replay.push(Step::Frame { frame });
    }
    let result = analysis::parse(replay, &ParseOptions::default()).unwrap();

    let ticks = sampled_ticks(&result);
    assert_eq!(vec![1, 8, 15, 21, 30], ticks);
    for pair in ticks.windows(2) {
        assert!(pair[1] - pair[0] >= 6, "{:?}", pair);
    }
}

#[test]
fn snapshots_follow_participant_order() {
    let mut players = roster();
    players[0].active_weapon = Some(rifle("AK-47"));
    players[0].view_x = 271.25;
    players[0].velocity.x = -120.5;
    players[0].has_helmet = true;
    players[3].is_alive = false;
    players[3].health = 0;

    let mut script = Script::new();
    script.at(1, [Step::Players { players }]);
    let result = analysis::parse(script.build(1, 1), &ParseOptions::default()).unwrap();

    let ids: Vec<_> = result.ticks.iter().map(|t| t.steam_id).collect();
    assert_eq!(vec![T1, T2, CT1, CT2], ids);

    let first = &result.ticks[0];
    assert_eq!("AK-47", first.active_weapon);
    assert_eq!(271.25, first.view_x);
    assert_eq!(-120.5, first.velocity_x);
    assert_eq!("T", first.side);
    assert_eq!("Team A", first.team);
    assert!(first.has_helmet);

    assert_eq!("none", result.ticks[1].active_weapon);
    assert!(!result.ticks[3].is_alive);
    assert_eq!("CT", result.ticks[3].side);
}

#[test]
fn player_stats_do_not_depend_on_sampling() {
    let mut players = roster();
    for (i, player) in players.iter_mut().enumerate() {
        player.kills = 10 + i as i32;
        player.deaths = 7;
        player.assists = i as i32;
    }

    // An unknown tick rate leaves the configured interval in place.
    let mut script = short_match();
    script
        .at(1, [Step::TickRate { tick_rate: 0.0 }])
        .at(280, [Step::Players { players }]);

    let parse = |tick_interval| {
        let options = ParseOptions {
            tick_interval,
            ..Default::default()
        };
        analysis::parse(script.build(1, 300), &options).unwrap()
    };

    let dense = parse(1);
    let sparse = parse(500);
    assert_eq!(300 * 4, dense.ticks.len());
    assert_eq!(4, sparse.ticks.len());

    assert_eq!(dense.players, sparse.players);
    let dense = dense.players;
    assert_eq!(46, dense.iter().map(|p| p.kills).sum::<i32>());
    assert_eq!(28, dense.iter().map(|p| p.deaths).sum::<i32>());
}
