//! Recorded event traces.
//!
//! A trace is JSON Lines. The first line holds the [`DemoHeader`], every
//! following line one [`Step`]. Events reference players by steam id, those
//! are resolved against every player the trace has announced so far, so
//! events about players that already left can still name them.
//!
//! ```text
//! {"mapName":"de_nuke","networkProtocol":14000}
//! {"type":"tickRate","tickRate":64.0}
//! {"type":"players","players":[{"steamId":1,"name":"a","team":2}]}
//! {"type":"frame","frame":1}
//! {"type":"roundStart"}
//! {"type":"weaponFire","shooter":1,"weapon":{"name":"AK-47","class":4}}
//! ```
//!
//! A `frame` step moves the cursor. Its frame done marker is dispatched when
//! the next `frame` step arrives, or when the trace ends.

use std::collections::HashMap;

use crate::source::{
    self, Bombsite, DemoHeader, Equipment, EventHandler, GameState, HitGroup, Player, ReplayEvent,
    ReplaySource, RoundEndReason, Team, Vector,
};

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Step {
    Frame {
        frame: i32,
    },
    #[serde(rename_all = "camelCase")]
    TickRate {
        tick_rate: f64,
    },
    /// Replaces the list of participants.
    Players {
        players: Vec<Player>,
    },
    Score {
        team: Team,
        score: i32,
    },
    Convar {
        name: String,
        value: String,
    },
    #[serde(rename_all = "camelCase")]
    MapName {
        map_name: String,
    },
    RoundStart,
    RoundFreezetimeEnd,
    #[serde(rename_all = "camelCase")]
    Kill {
        #[serde(default)]
        killer: Option<u64>,
        #[serde(default)]
        victim: Option<u64>,
        #[serde(default)]
        assister: Option<u64>,
        #[serde(default)]
        weapon: Option<Equipment>,
        #[serde(default)]
        is_headshot: bool,
        #[serde(default)]
        penetrated_objects: i32,
        #[serde(default)]
        assisted_flash: bool,
        #[serde(default)]
        through_smoke: bool,
    },
    #[serde(rename_all = "camelCase")]
    PlayerHurt {
        #[serde(default)]
        player: Option<u64>,
        #[serde(default)]
        attacker: Option<u64>,
        #[serde(default)]
        weapon: Option<Equipment>,
        #[serde(default)]
        health: i32,
        #[serde(default)]
        armor: i32,
        #[serde(default)]
        health_damage: i32,
        #[serde(default)]
        armor_damage: i32,
        #[serde(default)]
        hit_group: HitGroup,
    },
    WeaponFire {
        #[serde(default)]
        shooter: Option<u64>,
        #[serde(default)]
        weapon: Option<Equipment>,
    },
    PlayerFlashed {
        #[serde(default)]
        player: Option<u64>,
        #[serde(default)]
        attacker: Option<u64>,
    },
    GrenadeThrow(Projectile),
    GrenadeDestroy(Projectile),
    SmokeStart(SmokeCloud),
    SmokeExpired(SmokeCloud),
    BombPlanted(BombAction),
    BombDefuseStart(BombAction),
    BombDefuseAborted(BombAction),
    BombDefused(BombAction),
    BombExplode(BombAction),
    RoundEnd {
        #[serde(default)]
        winner: Team,
        #[serde(default)]
        reason: RoundEndReason,
    },
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Projectile {
    pub thrower: Option<u64>,
    pub weapon: Option<Equipment>,
    pub position: Vector,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SmokeCloud {
    pub thrower: Option<u64>,
    pub position: Vector,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BombAction {
    pub player: Option<u64>,
    pub site: Bombsite,
}

/// The game state a replay has built up so far.
#[derive(Debug, Clone, Default)]
pub struct ReplayState {
    pub(crate) header: DemoHeader,
    pub(crate) current_frame: i32,
    pub(crate) tick_rate: f64,
    pub(crate) playing: Vec<Player>,
    pub(crate) departed: Vec<Player>,
    pub(crate) scores: HashMap<Team, i32>,
    pub(crate) convars: HashMap<String, String>,
    frame_open: bool,
}

impl ReplayState {
    pub fn new(header: DemoHeader) -> Self {
        Self {
            header,
            ..Default::default()
        }
    }

    /// Finds a player by steam id, including players that are no longer
    /// participating.
    pub fn lookup(&self, steam_id: Option<u64>) -> Option<&Player> {
        let steam_id = steam_id?;
        self.playing
            .iter()
            .chain(self.departed.iter())
            .find(|p| p.steam_id == steam_id)
    }

    pub(crate) fn replace_players(&mut self, players: Vec<Player>) {
        let previous = std::mem::replace(&mut self.playing, players);
        for player in previous {
            if self.playing.iter().any(|p| p.steam_id == player.steam_id) {
                continue;
            }

            self.departed.retain(|p| p.steam_id != player.steam_id);
            self.departed.push(player);
        }
    }

    /// Moves the cursor, closing the previous frame first.
    pub(crate) fn advance(&mut self, frame: i32, handler: &mut dyn EventHandler) {
        self.close_frame(handler);
        self.current_frame = frame;
        self.frame_open = true;
    }

    pub(crate) fn close_frame(&mut self, handler: &mut dyn EventHandler) {
        if self.frame_open {
            self.frame_open = false;
            handler.on_event(&*self, &ReplayEvent::FrameDone);
        }
    }

    pub(crate) fn apply(&mut self, step: &Step, handler: &mut dyn EventHandler) {
        match step {
            Step::Frame { frame } => self.advance(*frame, handler),
            Step::TickRate { tick_rate } => self.tick_rate = *tick_rate,
            Step::Players { players } => self.replace_players(players.clone()),
            Step::Score { team, score } => {
                self.scores.insert(*team, *score);
            }
            Step::Convar { name, value } => {
                self.convars.insert(name.clone(), value.clone());
            }
            Step::MapName { map_name } => self.header.map_name = map_name.clone(),
            event => self.emit(event, handler),
        };
    }

    fn emit(&self, step: &Step, handler: &mut dyn EventHandler) {
        let event = match step {
            Step::RoundStart => ReplayEvent::RoundStart,
            Step::RoundFreezetimeEnd => ReplayEvent::RoundFreezetimeEnd,
            Step::Kill {
                killer,
                victim,
                assister,
                weapon,
                is_headshot,
                penetrated_objects,
                assisted_flash,
                through_smoke,
            } => ReplayEvent::Kill(source::Kill {
                killer: self.lookup(*killer),
                victim: self.lookup(*victim),
                assister: self.lookup(*assister),
                weapon: weapon.as_ref(),
                is_headshot: *is_headshot,
                penetrated_objects: *penetrated_objects,
                assisted_flash: *assisted_flash,
                through_smoke: *through_smoke,
            }),
            Step::PlayerHurt {
                player,
                attacker,
                weapon,
                health,
                armor,
                health_damage,
                armor_damage,
                hit_group,
            } => ReplayEvent::PlayerHurt(source::PlayerHurt {
                player: self.lookup(*player),
                attacker: self.lookup(*attacker),
                weapon: weapon.as_ref(),
                health: *health,
                armor: *armor,
                health_damage: *health_damage,
                armor_damage: *armor_damage,
                hit_group: *hit_group,
            }),
            Step::WeaponFire { shooter, weapon } => ReplayEvent::WeaponFire(source::WeaponFire {
                shooter: self.lookup(*shooter),
                weapon: weapon.as_ref(),
            }),
            Step::PlayerFlashed { player, attacker } => {
                ReplayEvent::PlayerFlashed(source::PlayerFlashed {
                    player: self.lookup(*player),
                    attacker: self.lookup(*attacker),
                })
            }
            Step::GrenadeThrow(p) => ReplayEvent::GrenadeProjectileThrow(self.projectile(p)),
            Step::GrenadeDestroy(p) => ReplayEvent::GrenadeProjectileDestroy(self.projectile(p)),
            Step::SmokeStart(s) => ReplayEvent::SmokeStart(self.smoke(s)),
            Step::SmokeExpired(s) => ReplayEvent::SmokeExpired(self.smoke(s)),
            Step::BombPlanted(b) => ReplayEvent::BombPlanted(self.bomb(b)),
            Step::BombDefuseStart(b) => ReplayEvent::BombDefuseStart(self.bomb(b)),
            Step::BombDefuseAborted(b) => ReplayEvent::BombDefuseAborted(self.bomb(b)),
            Step::BombDefused(b) => ReplayEvent::BombDefused(self.bomb(b)),
            Step::BombExplode(b) => ReplayEvent::BombExplode(self.bomb(b)),
            Step::RoundEnd { winner, reason } => ReplayEvent::RoundEnd(source::RoundEnd {
                winner: *winner,
                reason: *reason,
            }),
            Step::Frame { .. }
            | Step::TickRate { .. }
            | Step::Players { .. }
            | Step::Score { .. }
            | Step::Convar { .. }
            | Step::MapName { .. } => return,
        };

        handler.on_event(self, &event);
    }

    fn projectile<'s>(&'s self, projectile: &'s Projectile) -> source::GrenadeProjectile<'s> {
        source::GrenadeProjectile {
            thrower: self.lookup(projectile.thrower),
            weapon: projectile.weapon.as_ref(),
            position: projectile.position,
        }
    }

    fn smoke<'s>(&'s self, smoke: &'s SmokeCloud) -> source::Smoke<'s> {
        source::Smoke {
            thrower: self.lookup(smoke.thrower),
            position: smoke.position,
        }
    }

    fn bomb<'s>(&'s self, bomb: &'s BombAction) -> source::Bomb<'s> {
        source::Bomb {
            player: self.lookup(bomb.player),
            site: bomb.site,
        }
    }
}

impl GameState for ReplayState {
    fn current_frame(&self) -> i32 {
        self.current_frame
    }

    fn tick_rate(&self) -> f64 {
        self.tick_rate
    }

    fn header(&self) -> &DemoHeader {
        &self.header
    }

    fn playing(&self) -> &[Player] {
        &self.playing
    }

    fn team_score(&self, team: Team) -> i32 {
        self.scores.get(&team).copied().unwrap_or(0)
    }

    fn convar(&self, name: &str) -> Option<&str> {
        self.convars.get(name).map(|v| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    Empty,
    Header(String),
    HeaderNotParsed,
    Step { line: usize, message: String },
}

impl std::fmt::Display for TraceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "trace is empty"),
            Self::Header(msg) => write!(f, "invalid trace header: {}", msg),
            Self::HeaderNotParsed => write!(f, "header has not been parsed"),
            Self::Step { line, message } => write!(f, "invalid step on line {}: {}", line, message),
        }
    }
}

impl std::error::Error for TraceError {}

/// A [`ReplaySource`] reading a JSON Lines trace from memory.
pub struct TraceReplay<'b> {
    data: &'b [u8],
    body: Option<&'b [u8]>,
    state: ReplayState,
}

impl<'b> TraceReplay<'b> {
    pub fn new(data: &'b [u8]) -> Self {
        Self {
            data,
            body: None,
            state: ReplayState::default(),
        }
    }
}

fn is_blank(line: &[u8]) -> bool {
    line.iter().all(|b| b.is_ascii_whitespace())
}

impl<'b> ReplaySource for TraceReplay<'b> {
    type Error = TraceError;

    fn parse_header(&mut self) -> Result<DemoHeader, Self::Error> {
        let (header_line, body) = match self.data.iter().position(|b| *b == b'\n') {
            Some(idx) => (&self.data[..idx], &self.data[idx + 1..]),
            None => (self.data, &self.data[self.data.len()..]),
        };

        if is_blank(header_line) {
            return Err(TraceError::Empty);
        }

        let header: DemoHeader =
            serde_json::from_slice(header_line).map_err(|e| TraceError::Header(e.to_string()))?;

        self.state = ReplayState::new(header.clone());
        self.body = Some(body);

        Ok(header)
    }

    fn parse_to_end(&mut self, handler: &mut dyn EventHandler) -> Result<(), Self::Error> {
        let body = self.body.take().ok_or(TraceError::HeaderNotParsed)?;

        for (idx, line) in body.split(|b| *b == b'\n').enumerate() {
            if is_blank(line) {
                continue;
            }

            let step: Step = serde_json::from_slice(line).map_err(|e| TraceError::Step {
                line: idx + 2,
                message: e.to_string(),
            })?;
            self.state.apply(&step, handler);
        }

        self.state.close_frame(handler);

        Ok(())
    }

    fn game_state(&self) -> &dyn GameState {
        &self.state
    }
}
