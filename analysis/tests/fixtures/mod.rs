#![allow(dead_code)]

use std::collections::BTreeMap;

use analysis::scripted::ScriptedReplay;
use analysis::source::{DemoHeader, Equipment, EquipmentClass, Player, Team, Vector};
use analysis::trace::Step;

pub const T1: u64 = 76561198000000001;
pub const T2: u64 = 76561198000000002;
pub const CT1: u64 = 76561198000000003;
pub const CT2: u64 = 76561198000000004;

pub fn header() -> DemoHeader {
    DemoHeader {
        client_name: "GOTV Demo".to_owned(),
        server_name: "Valve CS2 Server".to_owned(),
        network_protocol: 14000,
        map_name: "de_nuke".to_owned(),
    }
}

pub fn player(steam_id: u64, name: &str, team: Team) -> Player {
    let clan_name = if team == Team::TERRORISTS {
        "Team A"
    } else {
        "Team B"
    };

    Player {
        steam_id,
        name: name.to_owned(),
        clan_name: clan_name.to_owned(),
        team,
        position: Vector {
            x: steam_id as f32 % 100.0,
            y: -250.5,
            z: 12.0,
        },
        is_alive: true,
        health: 100,
        money: 800,
        ..Default::default()
    }
}

pub fn roster() -> Vec<Player> {
    vec![
        player(T1, "excel", Team::TERRORISTS),
        player(T2, "skalla", Team::TERRORISTS),
        player(CT1, "haze", Team::COUNTER_TERRORISTS),
        player(CT2, "zodiac", Team::COUNTER_TERRORISTS),
    ]
}

pub fn rifle(name: &str) -> Equipment {
    Equipment {
        name: name.to_owned(),
        class: EquipmentClass::RIFLE,
    }
}

/// Collects steps per frame and lays them out as a frame by frame script.
#[derive(Debug, Default)]
pub struct Script {
    frames: BTreeMap<i32, Vec<Step>>,
}

impl Script {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at<I>(&mut self, frame: i32, steps: I) -> &mut Self
    where
        I: IntoIterator<Item = Step>,
    {
        self.frames.entry(frame).or_default().extend(steps);
        self
    }

    /// Frames `first..=last`, each followed by the steps registered for it.
    pub fn build(&self, first: i32, last: i32) -> ScriptedReplay {
        let mut replay = ScriptedReplay::new(header());
        for frame in first..=last {
            replay.push(Step::Frame { frame });
            if let Some(steps) = self.frames.get(&frame) {
                replay.extend(steps.iter().cloned());
            }
        }
        replay
    }
}

/// Two finished rounds and a third one that never ends.
pub fn short_match() -> Script {
    use analysis::source::{Bombsite, RoundEndReason};
    use analysis::trace::BombAction;

    let mut script = Script::new();
    script
        .at(1, [
            Step::TickRate { tick_rate: 64.0 },
            Step::Players { players: roster() },
            Step::Score { team: Team::TERRORISTS, score: 0 },
            Step::Score { team: Team::COUNTER_TERRORISTS, score: 0 },
        ])
        .at(2, [Step::RoundStart])
        .at(10, [Step::RoundFreezetimeEnd])
        .at(40, [Step::Kill {
            killer: Some(T1),
            victim: Some(CT1),
            assister: Some(T2),
            weapon: Some(rifle("AK-47")),
            is_headshot: true,
            penetrated_objects: 0,
            assisted_flash: false,
            through_smoke: false,
        }])
        .at(50, [Step::BombPlanted(BombAction {
            player: Some(T2),
            site: Bombsite::A,
        })])
        .at(100, [
            Step::Score { team: Team::TERRORISTS, score: 1 },
            Step::RoundEnd {
                winner: Team::TERRORISTS,
                reason: RoundEndReason::TARGET_BOMBED,
            },
        ])
        .at(120, [Step::RoundStart])
        .at(130, [Step::RoundFreezetimeEnd])
        .at(200, [
            Step::Score { team: Team::COUNTER_TERRORISTS, score: 1 },
            Step::RoundEnd {
                winner: Team::COUNTER_TERRORISTS,
                reason: RoundEndReason::CT_WIN,
            },
        ])
        .at(250, [Step::RoundStart]);

    script
}
