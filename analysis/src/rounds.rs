use crate::mapping;
use crate::source::{Player, RoundEndReason, Team};

pub const NOT_PLANTED: i32 = -1;

/// Builds round records from round start, freeze time end, bomb plant and
/// round end.
///
/// At most one round is in progress. It is appended to the finished rounds
/// when its round end arrives and is never touched again afterwards. The
/// events are trusted to arrive in order, a freeze time end, plant or round
/// end without a preceding round start operates on a zero-initialized record.
#[derive(Debug, Default)]
pub struct RoundAccumulator {
    current: Option<common::RoundEvent>,
    finished: Vec<common::RoundEvent>,
}

impl RoundAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_progress(&self) -> Option<&common::RoundEvent> {
        self.current.as_ref()
    }

    pub fn finished(&self) -> &[common::RoundEvent] {
        &self.finished
    }

    pub fn start(&mut self, tick: i32, ct_score: i32, t_score: i32) {
        let round_num = self.finished.len() as i32 + 1;
        tracing::debug!(round_num, tick, "Round started");

        self.current = Some(common::RoundEvent {
            round_num,
            start_tick: tick,
            ct_score,
            t_score,
            bomb_plant_tick: NOT_PLANTED,
            ..Default::default()
        });
    }

    /// Stores the per side money and equipment value of everyone playing.
    pub fn freeze_time_end(&mut self, tick: i32, playing: &[Player]) {
        let round = self.current.get_or_insert_with(Default::default);
        round.freeze_time_end_tick = tick;

        // Totals saturate, replays can carry arbitrary account values.
        let (mut ct_money, mut t_money, mut ct_equip, mut t_equip) = (0i32, 0i32, 0i32, 0i32);
        for player in playing {
            if player.team == Team::COUNTER_TERRORISTS {
                ct_money = ct_money.saturating_add(player.money);
                ct_equip = ct_equip.saturating_add(player.equipment_value);
            } else if player.team == Team::TERRORISTS {
                t_money = t_money.saturating_add(player.money);
                t_equip = t_equip.saturating_add(player.equipment_value);
            }
        }

        round.ct_start_money = ct_money;
        round.t_start_money = t_money;
        round.ct_equipment_value = ct_equip;
        round.t_equipment_value = t_equip;
    }

    pub fn bomb_planted(&mut self, tick: i32) {
        self.current.get_or_insert_with(Default::default).bomb_plant_tick = tick;
    }

    pub fn end(
        &mut self,
        tick: i32,
        winner: Team,
        reason: RoundEndReason,
        ct_score: i32,
        t_score: i32,
    ) {
        let mut round = match self.current.take() {
            Some(r) => r,
            None => {
                tracing::debug!(tick, "Round end without a round start");
                common::RoundEvent::default()
            }
        };

        round.end_tick = tick;
        round.winner = mapping::team(winner).to_owned();
        round.winner_side = round.winner.clone();
        round.reason = mapping::round_end_reason(reason).to_owned();
        round.ct_score = ct_score;
        round.t_score = t_score;

        tracing::debug!(round_num = round.round_num, tick, winner = %round.winner, "Round ended");
        self.finished.push(round);
    }

    /// Returns the finished rounds. A round still in progress is dropped
    /// unless `flush_incomplete` is set.
    pub fn finish(mut self, flush_incomplete: bool) -> Vec<common::RoundEvent> {
        if let Some(round) = self.current.take() {
            if flush_incomplete {
                tracing::debug!(round_num = round.round_num, "Flushing incomplete round");
                self.finished.push(round);
            } else {
                tracing::debug!(round_num = round.round_num, "Dropping incomplete round");
            }
        }

        self.finished
    }
}
