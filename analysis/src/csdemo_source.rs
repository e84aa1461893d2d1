//! [`ReplaySource`] for CS2 `.dem` files, decoded with `csdemo`.
//!
//! The decoder hands over the whole event list and the per tick entity states
//! at once. Both are replayed through the handler tick by tick: before the
//! events of a tick are dispatched, every entity update up to that tick is
//! folded into the player table, the team scores and the round win reason.
//!
//! Kills, deaths and assists are counted here from the death events, the same
//! way the end of game statistics are derived from them. Warmup is not
//! counted.

use std::collections::HashMap;

use crate::source::{
    self, Bombsite, DemoHeader, EventHandler, GameState, Player, ReplayEvent, ReplaySource,
    RoundEndReason, Team,
};
use crate::trace::ReplayState;

/// CS2 records every demo at 64 ticks per second.
pub const CS2_TICK_RATE: f64 = 64.0;

/// Width of one coordinate cell of a pawn position.
const CELL_WIDTH: f32 = (1 << 9) as f32;
/// Cell coordinates start at the map origin shifted by this amount.
const MAX_COORD: f32 = (1 << 14) as f32;

const PAWN_CLASS: &str = "CCSPlayerPawn";
const CONTROLLER_CLASS: &str = "CCSPlayerController";
const GAME_RULES_CLASS: &str = "CCSGameRulesProxy";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsDemoError {
    Container,
    Parse,
    HeaderNotParsed,
}

impl std::fmt::Display for CsDemoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Container => write!(f, "not a valid CS2 demo container"),
            Self::Parse => write!(f, "demo is truncated or corrupt"),
            Self::HeaderNotParsed => write!(f, "header has not been parsed"),
        }
    }
}

impl std::error::Error for CsDemoError {}

pub struct CsDemoReplay<'b> {
    data: &'b [u8],
    frames: Option<&'b [u8]>,
    /// Everyone the demo knows about, whether currently playing or not.
    roster: Vec<Player>,
    state: ReplayState,
}

impl<'b> CsDemoReplay<'b> {
    pub fn new(data: &'b [u8]) -> Self {
        Self {
            data,
            frames: None,
            roster: Vec::new(),
            state: ReplayState::default(),
        }
    }

    pub fn is_demo(data: &[u8]) -> bool {
        data.starts_with(source::DEMO_MAGIC)
    }

    /// Publishes the participants of the roster as the players currently
    /// playing.
    fn refresh_playing(&mut self, tracker: &EntityTracker) {
        let playing = self
            .roster
            .iter()
            .enumerate()
            .filter(|(idx, p)| {
                tracker.connected[*idx]
                    && (p.team == Team::TERRORISTS || p.team == Team::COUNTER_TERRORISTS)
            })
            .map(|(_, p)| p.clone())
            .collect();
        self.state.replace_players(playing);
    }
}

fn raw_to_i32(value: &Option<csdemo::RawValue>) -> i32 {
    match value {
        Some(csdemo::RawValue::F32(v)) => *v as i32,
        Some(csdemo::RawValue::I32(v)) => *v,
        Some(csdemo::RawValue::U64(v)) => *v as i32,
        _ => 0,
    }
}

/// The side a round end reason awards the round to.
fn round_winner(reason: RoundEndReason) -> Team {
    match reason {
        RoundEndReason::TARGET_BOMBED
        | RoundEndReason::TERRORISTS_WIN
        | RoundEndReason::CT_SURRENDER => Team::TERRORISTS,
        RoundEndReason::BOMB_DEFUSED
        | RoundEndReason::CT_WIN
        | RoundEndReason::TARGET_SAVED
        | RoundEndReason::TERRORISTS_SURRENDER => Team::COUNTER_TERRORISTS,
        _ => Team::UNASSIGNED,
    }
}

fn team_from_name(name: &str) -> Team {
    match name {
        "TERRORIST" => Team::TERRORISTS,
        "CT" => Team::COUNTER_TERRORISTS,
        "Spectator" => Team::SPECTATORS,
        _ => Team::UNASSIGNED,
    }
}

/// Folds entity updates into the roster. Entity updates only carry the
/// properties that changed, so partial values are kept between ticks.
#[derive(Debug, Default)]
struct EntityTracker {
    /// Pawn ids announced by player spawns, to roster index.
    spawned_pawns: HashMap<i32, usize>,
    /// Pawn entity id to roster index.
    pawn_entities: HashMap<i32, usize>,
    /// Controller entity id to roster index.
    controllers: HashMap<i32, usize>,
    team_entities: HashMap<i32, Team>,
    cells: Vec<[u32; 3]>,
    offsets: Vec<[f32; 3]>,
    connected: Vec<bool>,
    win_reason: RoundEndReason,
}

impl EntityTracker {
    fn new(roster_len: usize) -> Self {
        Self {
            cells: vec![[0; 3]; roster_len],
            offsets: vec![[0.0; 3]; roster_len],
            connected: vec![true; roster_len],
            ..Default::default()
        }
    }

    /// Returns whether any player changed.
    fn apply(
        &mut self,
        tick_state: &csdemo::parser::EntityTickStates,
        roster: &mut [Player],
        scores: &mut HashMap<Team, i32>,
    ) -> bool {
        let mut changed = false;

        for entity in tick_state.states.iter() {
            let int_prop = |name: &str| {
                entity.get_prop(name).and_then(|p| {
                    p.value
                        .as_i32()
                        .or_else(|| p.value.as_u32().map(|v| v as i32))
                })
            };
            let float_prop = |name: &str| entity.get_prop(name).and_then(|p| p.value.as_f32());

            if entity.class.as_ref() == PAWN_CLASS {
                let idx = match self.pawn_entities.get(&entity.id) {
                    Some(idx) => *idx,
                    None => {
                        let owner = int_prop("CCSPlayerPawn.m_nEntityId")
                            .and_then(|pawn| self.spawned_pawns.get(&pawn).copied());
                        match owner {
                            Some(idx) => {
                                self.pawn_entities.insert(entity.id, idx);
                                idx
                            }
                            None => continue,
                        }
                    }
                };
                let player = &mut roster[idx];

                for (axis, name) in ["m_cellX", "m_cellY", "m_cellZ"].iter().enumerate() {
                    let prop = format!("CCSPlayerPawn.CBodyComponentBaseAnimGraph.{}", name);
                    if let Some(cell) = entity.get_prop(&prop).and_then(|p| p.value.as_u32()) {
                        self.cells[idx][axis] = cell;
                    }
                }
                for (axis, name) in ["m_vecX", "m_vecY", "m_vecZ"].iter().enumerate() {
                    let prop = format!("CCSPlayerPawn.CBodyComponentBaseAnimGraph.{}", name);
                    if let Some(offset) = float_prop(&prop) {
                        self.offsets[idx][axis] = offset;
                    }
                }

                let [x, y, z] = self.position(idx);
                player.position = source::Vector { x, y, z };

                if let Some(lifestate) = int_prop("CCSPlayerPawn.m_lifeState") {
                    // 0 means alive
                    player.is_alive = lifestate == 0;
                }
                if let Some(health) = int_prop("CCSPlayerPawn.m_iHealth") {
                    player.health = health;
                }
                if let Some(armor) = int_prop("CCSPlayerPawn.m_ArmorValue") {
                    player.armor = armor;
                }
                if let Some(value) = int_prop("CCSPlayerPawn.m_unCurrentEquipmentValue") {
                    player.equipment_value = value;
                }

                changed = true;
            } else if entity.class.as_ref() == CONTROLLER_CLASS {
                let idx = match self.controllers.get(&entity.id) {
                    Some(idx) => *idx,
                    None => continue,
                };
                let player = &mut roster[idx];

                if let Some(team) = int_prop("CCSPlayerController.m_iTeamNum") {
                    player.team = Team(team);
                }
                if let Some(money) =
                    int_prop("CCSPlayerController.CCSPlayerController_InGameMoneyServices.m_iAccount")
                {
                    player.money = money;
                }
                if let Some(state) = int_prop("CCSPlayerController.m_iConnected") {
                    // 3 disconnecting, 4 disconnected
                    self.connected[idx] = !matches!(state, 3 | 4);
                }

                changed = true;
            } else if entity.class.as_ref() == GAME_RULES_CLASS {
                if let Some(reason) = int_prop("CCSGameRulesProxy.CCSGameRules.m_eRoundWinReason") {
                    self.win_reason = RoundEndReason(reason);
                }
            } else if let Ok(team) = csdemo::structured::ccsteam::CCSTeam::try_from(entity) {
                if let Some(name) = team.team_name() {
                    self.team_entities.insert(entity.id, team_from_name(name));
                }

                let side = self.team_entities.get(&entity.id).copied();
                if let (Some(side), Some(score)) = (side, team.score()) {
                    scores.insert(side, score as i32);
                }
            }
        }

        changed
    }

    fn position(&self, idx: usize) -> [f32; 3] {
        let mut position = [0.0; 3];
        for axis in 0..3 {
            position[axis] =
                self.cells[idx][axis] as f32 * CELL_WIDTH + self.offsets[idx][axis] - MAX_COORD;
        }
        position
    }
}

impl<'b> ReplaySource for CsDemoReplay<'b> {
    type Error = CsDemoError;

    fn parse_header(&mut self) -> Result<DemoHeader, Self::Error> {
        if !Self::is_demo(self.data) {
            return Err(CsDemoError::Container);
        }
        let container = csdemo::Container::parse(self.data).map_err(|_| CsDemoError::Container)?;
        self.frames = Some(container.inner);

        self.state = ReplayState::new(DemoHeader::default());
        self.state.tick_rate = CS2_TICK_RATE;

        // The file header is the first frame, it is only available once the
        // frames are decoded.
        Ok(DemoHeader::default())
    }

    #[tracing::instrument(name = "CsDemo", skip(self, handler))]
    fn parse_to_end(&mut self, handler: &mut dyn EventHandler) -> Result<(), Self::Error> {
        let frames = self.frames.take().ok_or(CsDemoError::HeaderNotParsed)?;

        let output = csdemo::parser::parse(
            csdemo::FrameIterator::parse(frames),
            csdemo::parser::EntityFilter::all(),
        )
        .map_err(|_| CsDemoError::Parse)?;

        let header = &output.header;
        self.state.header = DemoHeader {
            client_name: header.client_name().to_owned(),
            server_name: header.server_name().to_owned(),
            network_protocol: header.network_protocol(),
            map_name: header.map_name().to_owned(),
        };

        let mut user_ids: Vec<_> = output.player_info.keys().copied().collect();
        user_ids.sort_unstable_by_key(|id| id.0);

        let mut index = HashMap::new();
        self.roster = Vec::with_capacity(user_ids.len());
        for user_id in user_ids {
            let info = match output.player_info.get(&user_id) {
                Some(i) => i,
                None => continue,
            };

            index.insert(user_id, self.roster.len());
            self.roster.push(Player {
                steam_id: info.xuid,
                name: info.name.clone(),
                team: Team(info.team),
                is_alive: true,
                ..Default::default()
            });
        }
        tracing::debug!(players = self.roster.len(), "Loaded player table");

        let mut tracker = EntityTracker::new(self.roster.len());
        for (user_id, idx) in index.iter() {
            // Controllers live in the entity slot after the player slot.
            tracker.controllers.insert(user_id.0 as i32 + 1, *idx);
        }
        for event in output.events.iter() {
            if let csdemo::DemoEvent::GameEvent(ge) = event {
                if let csdemo::game_event::GameEvent::PlayerSpawn(spawn) = ge.as_ref() {
                    let owner = spawn.userid.and_then(|id| index.get(&id).copied());
                    if let (Some(csdemo::RawValue::I32(pawn)), Some(owner)) =
                        (spawn.userid_pawn.as_ref(), owner)
                    {
                        tracker.spawned_pawns.insert(*pawn, owner);
                    }
                }
            }
        }

        self.refresh_playing(&tracker);

        let mut entity_ticks = output.entity_states.ticks.iter().peekable();
        let mut track = false;
        for event in output.events.iter() {
            match event {
                csdemo::DemoEvent::Tick(tick) => {
                    let tick = tick.tick();

                    let mut changed = false;
                    while let Some(tick_state) = entity_ticks.next_if(|t| t.tick <= tick) {
                        changed |= tracker.apply(tick_state, &mut self.roster, &mut self.state.scores);
                    }
                    if changed {
                        self.refresh_playing(&tracker);
                    }

                    if tick as i32 != self.state.current_frame {
                        self.state.advance(tick as i32, handler);
                    }
                }
                csdemo::DemoEvent::GameEvent(ge) => {
                    let lookup = |id: Option<csdemo::UserId>| id.and_then(|id| index.get(&id).copied());
                    let roster = &self.roster;
                    let state = &self.state;

                    match ge.as_ref() {
                        csdemo::game_event::GameEvent::RoundAnnounceMatchStart(_) => {
                            for player in self.roster.iter_mut() {
                                player.kills = 0;
                                player.deaths = 0;
                                player.assists = 0;
                            }
                            self.refresh_playing(&tracker);
                            track = true;
                        }
                        csdemo::game_event::GameEvent::RoundPreStart(_) => {
                            track = true;
                            handler.on_event(state, &ReplayEvent::RoundStart);
                        }
                        csdemo::game_event::GameEvent::RoundFreezeEnd(_) => {
                            handler.on_event(state, &ReplayEvent::RoundFreezetimeEnd);
                        }
                        csdemo::game_event::GameEvent::WinPanelMatch(_) => {
                            track = false;
                        }
                        csdemo::game_event::GameEvent::RoundOfficiallyEnded(_) => {
                            let reason = tracker.win_reason;
                            handler.on_event(
                                state,
                                &ReplayEvent::RoundEnd(source::RoundEnd {
                                    winner: round_winner(reason),
                                    reason,
                                }),
                            );
                            track = false;
                        }
                        csdemo::game_event::GameEvent::PlayerDeath(death) => {
                            let victim = lookup(death.userid);
                            let killer = lookup(death.attacker);
                            let assister = lookup(death.assister);

                            let kill = source::Kill {
                                killer: killer.map(|i| &roster[i]),
                                victim: victim.map(|i| &roster[i]),
                                assister: assister.map(|i| &roster[i]),
                                ..Default::default()
                            };
                            handler.on_event(state, &ReplayEvent::Kill(kill));

                            if track {
                                count_death(&mut self.roster, victim, killer, assister);
                                self.refresh_playing(&tracker);
                            }
                        }
                        csdemo::game_event::GameEvent::PlayerHurt(hurt) => {
                            let hurt = source::PlayerHurt {
                                player: lookup(hurt.userid).map(|i| &roster[i]),
                                attacker: lookup(hurt.attacker).map(|i| &roster[i]),
                                health: raw_to_i32(&hurt.health),
                                ..Default::default()
                            };
                            handler.on_event(state, &ReplayEvent::PlayerHurt(hurt));
                        }
                        csdemo::game_event::GameEvent::BombPlanted(_) => {
                            let bomb = source::Bomb {
                                player: None,
                                site: Bombsite::UNKNOWN,
                            };
                            handler.on_event(state, &ReplayEvent::BombPlanted(bomb));
                        }
                        csdemo::game_event::GameEvent::BombDefused(_) => {
                            let bomb = source::Bomb {
                                player: None,
                                site: Bombsite::UNKNOWN,
                            };
                            handler.on_event(state, &ReplayEvent::BombDefused(bomb));
                        }
                        _ => {}
                    };
                }
                _ => {}
            };
        }

        self.refresh_playing(&tracker);
        self.state.close_frame(handler);

        Ok(())
    }

    fn game_state(&self) -> &dyn GameState {
        &self.state
    }
}

/// Suicides count as a death only, team kills neither as kill nor assist.
fn count_death(
    players: &mut [Player],
    victim: Option<usize>,
    killer: Option<usize>,
    assister: Option<usize>,
) {
    let victim = match victim {
        Some(v) => v,
        None => return,
    };
    let victim_team = players[victim].team;
    players[victim].deaths += 1;

    if let Some(killer) = killer.filter(|k| *k != victim) {
        if players[killer].team != victim_team {
            players[killer].kills += 1;
        }
    }

    if let Some(assister) = assister {
        if players[assister].team != victim_team {
            players[assister].assists += 1;
        }
    }
}
