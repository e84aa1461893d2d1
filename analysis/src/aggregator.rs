use crate::projectors::{self, BombAction, GrenadePhase, SmokePhase};
use crate::rounds::RoundAccumulator;
use crate::sampler::TickSampler;
use crate::source::{DemoHeader, EventHandler, GameState, ReplayEvent, Team};
use crate::ParseOptions;

/// Console variables consulted, in order, when the header has no map name.
pub const MAP_NAME_CONVARS: [&str; 2] = ["host_map", "map"];

/// Collects the output of one parse.
///
/// Records are appended in the order the events arrive. Once the stream is
/// exhausted, [`Aggregator::finish`] fills in everything that is only known at
/// the end.
#[derive(Debug)]
pub struct Aggregator {
    result: common::ParseResult,
    rounds: RoundAccumulator,
    sampler: TickSampler,
    flush_incomplete_round: bool,
}

impl Aggregator {
    pub fn new(header: &DemoHeader, options: &ParseOptions) -> Self {
        let result = common::ParseResult {
            header: common::Header {
                client_name: header.client_name.clone(),
                server_name: header.server_name.clone(),
                network_protocol: header.network_protocol,
                map_name: header.map_name.clone(),
                tick_rate: 0.0,
            },
            ..Default::default()
        };

        Self {
            result,
            rounds: RoundAccumulator::new(),
            sampler: TickSampler::new(options.tick_interval),
            flush_incomplete_round: options.flush_incomplete_round,
        }
    }

    pub fn finish(self, state: &dyn GameState) -> common::ParseResult {
        let mut result = self.result;

        // Some sources only learn the header while decoding the stream.
        let header = state.header();
        if !header.client_name.is_empty() {
            result.header.client_name = header.client_name.clone();
        }
        if !header.server_name.is_empty() {
            result.header.server_name = header.server_name.clone();
        }
        if header.network_protocol != 0 {
            result.header.network_protocol = header.network_protocol;
        }
        result.header.map_name = final_map_name(state);
        result.header.tick_rate = state.tick_rate();
        result.rounds = self.rounds.finish(self.flush_incomplete_round);
        result.players = state
            .playing()
            .iter()
            .map(projectors::player_stats)
            .collect();

        tracing::info!(
            map = %result.header.map_name,
            tick_rate = result.header.tick_rate,
            ticks = result.ticks.len(),
            rounds = result.rounds.len(),
            "Finished aggregation"
        );

        result
    }

    fn frame_done(&mut self, state: &dyn GameState) {
        self.sampler.observe_tick_rate(state.tick_rate());

        let frame = state.current_frame();
        if !self.sampler.should_sample(frame) {
            return;
        }

        self.result.ticks.extend(
            state
                .playing()
                .iter()
                .map(|player| projectors::player_position(frame, player)),
        );
    }
}

fn final_map_name(state: &dyn GameState) -> String {
    let map_name = &state.header().map_name;
    if !map_name.is_empty() {
        return map_name.clone();
    }

    match MAP_NAME_CONVARS
        .iter()
        .find_map(|name| state.convar(name).filter(|value| !value.is_empty()))
    {
        Some(name) => {
            tracing::debug!(map = name, "Using map name from console variables");
            name.to_owned()
        }
        None => String::new(),
    }
}

impl EventHandler for Aggregator {
    fn on_event(&mut self, state: &dyn GameState, event: &ReplayEvent<'_>) {
        let tick = state.current_frame();

        match event {
            ReplayEvent::RoundStart => {
                self.rounds.start(
                    tick,
                    state.team_score(Team::COUNTER_TERRORISTS),
                    state.team_score(Team::TERRORISTS),
                );
            }
            ReplayEvent::RoundFreezetimeEnd => {
                self.rounds.freeze_time_end(tick, state.playing());
            }
            ReplayEvent::Kill(kill) => {
                self.result.kills.push(projectors::kill(tick, kill));
            }
            ReplayEvent::PlayerHurt(hurt) => {
                self.result.damages.push(projectors::damage(tick, hurt));
            }
            ReplayEvent::WeaponFire(fire) => {
                self.result
                    .weapon_fires
                    .push(projectors::weapon_fire(tick, fire));
            }
            ReplayEvent::PlayerFlashed(flashed) => {
                self.result.flashes.push(projectors::flash(tick, flashed));
            }
            ReplayEvent::GrenadeProjectileThrow(projectile) => {
                self.result.grenades.push(projectors::grenade(
                    tick,
                    projectile,
                    GrenadePhase::Thrown,
                ));
            }
            ReplayEvent::GrenadeProjectileDestroy(projectile) => {
                self.result.grenades.push(projectors::grenade(
                    tick,
                    projectile,
                    GrenadePhase::Detonate,
                ));
            }
            ReplayEvent::SmokeStart(smoke) => {
                self.result
                    .smokes
                    .push(projectors::smoke(tick, smoke, SmokePhase::Start));
            }
            ReplayEvent::SmokeExpired(smoke) => {
                self.result
                    .smokes
                    .push(projectors::smoke(tick, smoke, SmokePhase::Expire));
            }
            ReplayEvent::BombPlanted(bomb) => {
                self.rounds.bomb_planted(tick);
                self.result
                    .bombs
                    .push(projectors::bomb(tick, bomb, BombAction::Planted));
            }
            ReplayEvent::BombDefuseStart(bomb) => {
                self.result
                    .bombs
                    .push(projectors::bomb(tick, bomb, BombAction::DefuseStart));
            }
            ReplayEvent::BombDefuseAborted(bomb) => {
                self.result
                    .bombs
                    .push(projectors::bomb(tick, bomb, BombAction::DefuseStop));
            }
            ReplayEvent::BombDefused(bomb) => {
                self.result
                    .bombs
                    .push(projectors::bomb(tick, bomb, BombAction::Defused));
            }
            ReplayEvent::BombExplode(bomb) => {
                self.result
                    .bombs
                    .push(projectors::bomb(tick, bomb, BombAction::Exploded));
            }
            ReplayEvent::RoundEnd(end) => {
                self.rounds.end(
                    tick,
                    end.winner,
                    end.reason,
                    state.team_score(Team::COUNTER_TERRORISTS),
                    state.team_score(Team::TERRORISTS),
                );
            }
            ReplayEvent::FrameDone => self.frame_done(state),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::ReplayState;

    #[test]
    fn header_learned_while_decoding() {
        let aggregator = Aggregator::new(&DemoHeader::default(), &ParseOptions::default());

        let state = ReplayState::new(DemoHeader {
            client_name: "SourceTV Demo".to_owned(),
            server_name: "Valve CS2 EU West".to_owned(),
            network_protocol: 14040,
            map_name: "de_anubis".to_owned(),
        });
        let result = aggregator.finish(&state);

        assert_eq!("SourceTV Demo", result.header.client_name);
        assert_eq!("Valve CS2 EU West", result.header.server_name);
        assert_eq!(14040, result.header.network_protocol);
        assert_eq!("de_anubis", result.header.map_name);
    }

    #[test]
    fn empty_state_header_keeps_parsed_one() {
        let header = DemoHeader {
            client_name: "GOTV Demo".to_owned(),
            server_name: "faceit".to_owned(),
            network_protocol: 13992,
            map_name: "de_nuke".to_owned(),
        };
        let aggregator = Aggregator::new(&header, &ParseOptions::default());

        let result = aggregator.finish(&ReplayState::default());

        assert_eq!("GOTV Demo", result.header.client_name);
        assert_eq!("faceit", result.header.server_name);
        assert_eq!(13992, result.header.network_protocol);
        assert_eq!("", result.header.map_name);
    }
}
