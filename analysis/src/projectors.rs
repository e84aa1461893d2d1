//! One function per event kind, turning a decoded event into its output record.
//!
//! Every optional actor or weapon is checked before use. A missing one leaves
//! the corresponding fields at their zero value, the record itself is always
//! produced.

use crate::mapping;
use crate::source::{self, Equipment, Player};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrenadePhase {
    Thrown,
    Detonate,
}

impl GrenadePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thrown => "thrown",
            Self::Detonate => "detonate",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmokePhase {
    Start,
    Expire,
}

impl SmokePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Expire => "expire",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BombAction {
    Planted,
    DefuseStart,
    DefuseStop,
    Defused,
    Exploded,
}

impl BombAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planted => "planted",
            Self::DefuseStart => "defuse_start",
            Self::DefuseStop => "defuse_stop",
            Self::Defused => "defused",
            Self::Exploded => "exploded",
        }
    }
}

pub const NO_WEAPON: &str = "none";

fn weapon_name(weapon: Option<&Equipment>) -> String {
    weapon.map(|w| w.name.clone()).unwrap_or_default()
}

fn weapon_class(weapon: Option<&Equipment>) -> String {
    weapon
        .map(|w| mapping::equipment_class(w.class).to_owned())
        .unwrap_or_default()
}

pub fn kill(tick: i32, event: &source::Kill<'_>) -> common::KillEvent {
    let mut kill = common::KillEvent {
        tick,
        is_headshot: event.is_headshot,
        is_wallbang: event.penetrated_objects > 0,
        penetrated_objects: event.penetrated_objects,
        is_flash_assist: event.assisted_flash,
        is_through_smoke: event.through_smoke,
        weapon: weapon_name(event.weapon),
        weapon_class: weapon_class(event.weapon),
        ..Default::default()
    };

    if let Some(killer) = event.killer {
        kill.attacker_id = killer.steam_id;
        kill.attacker_name = killer.name.clone();
        kill.attacker_team = killer.clan_name.clone();
        kill.attacker_side = mapping::team(killer.team).to_owned();
        kill.attacker_x = killer.position.x as f64;
        kill.attacker_y = killer.position.y as f64;
    }

    if let Some(victim) = event.victim {
        kill.victim_id = victim.steam_id;
        kill.victim_name = victim.name.clone();
        kill.victim_team = victim.clan_name.clone();
        kill.victim_side = mapping::team(victim.team).to_owned();
        kill.victim_x = victim.position.x as f64;
        kill.victim_y = victim.position.y as f64;
    }

    if let Some(assister) = event.assister {
        kill.assister_id = assister.steam_id;
        kill.assister_name = assister.name.clone();
    }

    kill
}

pub fn damage(tick: i32, event: &source::PlayerHurt<'_>) -> common::DamageEvent {
    common::DamageEvent {
        tick,
        attacker_id: event.attacker.map(|p| p.steam_id).unwrap_or_default(),
        victim_id: event.player.map(|p| p.steam_id).unwrap_or_default(),
        weapon: weapon_name(event.weapon),
        weapon_class: weapon_class(event.weapon),
        damage: event.health_damage,
        damage_armor: event.armor_damage,
        health: event.health,
        armor: event.armor,
        hitgroup: mapping::hit_group(event.hit_group).to_owned(),
    }
}

pub fn weapon_fire(tick: i32, event: &source::WeaponFire<'_>) -> common::WeaponFireEvent {
    let mut fire = common::WeaponFireEvent {
        tick,
        weapon: weapon_name(event.weapon),
        ..Default::default()
    };

    if let Some(shooter) = event.shooter {
        fire.shooter_id = shooter.steam_id;
        fire.shooter_name = shooter.name.clone();
        fire.x = shooter.position.x as f64;
        fire.y = shooter.position.y as f64;
    }

    fire
}

pub fn flash(tick: i32, event: &source::PlayerFlashed<'_>) -> common::FlashEvent {
    let mut flash = common::FlashEvent {
        tick,
        ..Default::default()
    };

    if let Some(attacker) = event.attacker {
        flash.attacker_id = attacker.steam_id;
        flash.attacker_name = attacker.name.clone();
    }

    if let Some(victim) = event.player {
        flash.victim_id = victim.steam_id;
        flash.victim_name = victim.name.clone();
        flash.flash_duration = victim.flash_duration;
    }

    flash
}

pub fn grenade(
    tick: i32,
    event: &source::GrenadeProjectile<'_>,
    phase: GrenadePhase,
) -> common::GrenadeEvent {
    let mut grenade = common::GrenadeEvent {
        tick,
        grenade_type: weapon_name(event.weapon),
        x: event.position.x as f64,
        y: event.position.y as f64,
        event_type: phase.as_str().to_owned(),
        ..Default::default()
    };

    if let Some(thrower) = event.thrower {
        grenade.thrower_id = thrower.steam_id;
        grenade.thrower_name = thrower.name.clone();
        grenade.thrower_team = thrower.clan_name.clone();
        grenade.thrower_side = mapping::team(thrower.team).to_owned();
    }

    grenade
}

pub fn smoke(tick: i32, event: &source::Smoke<'_>, phase: SmokePhase) -> common::SmokeEvent {
    common::SmokeEvent {
        tick,
        thrower_id: event.thrower.map(|p| p.steam_id).unwrap_or_default(),
        thrower_name: event.thrower.map(|p| p.name.clone()).unwrap_or_default(),
        x: event.position.x as f64,
        y: event.position.y as f64,
        event_type: phase.as_str().to_owned(),
    }
}

pub fn bomb(tick: i32, event: &source::Bomb<'_>, action: BombAction) -> common::BombEvent {
    let mut bomb = common::BombEvent {
        tick,
        event: action.as_str().to_owned(),
        site: mapping::bombsite(event.site).to_owned(),
        ..Default::default()
    };

    if let Some(player) = event.player {
        bomb.player_id = player.steam_id;
        bomb.player_name = player.name.clone();
        bomb.x = player.position.x as f64;
        bomb.y = player.position.y as f64;
    }

    bomb
}

pub fn player_position(tick: i32, player: &Player) -> common::PlayerPosition {
    common::PlayerPosition {
        tick,
        steam_id: player.steam_id,
        name: player.name.clone(),
        team: player.clan_name.clone(),
        side: mapping::team(player.team).to_owned(),
        x: player.position.x as f64,
        y: player.position.y as f64,
        view_x: player.view_x,
        view_y: player.view_y,
        velocity_x: player.velocity.x as f64,
        velocity_y: player.velocity.y as f64,
        is_alive: player.is_alive,
        health: player.health,
        armor: player.armor,
        has_helmet: player.has_helmet,
        has_defuse_kit: player.has_defuse_kit,
        money: player.money,
        equipment_value: player.equipment_value,
        active_weapon: player
            .active_weapon
            .as_ref()
            .map(|w| w.name.clone())
            .unwrap_or_else(|| NO_WEAPON.to_owned()),
        is_scoped: player.is_scoped,
        is_ducking: player.is_ducking,
        is_walking: player.is_walking,
    }
}

pub fn player_stats(player: &Player) -> common::PlayerStats {
    common::PlayerStats {
        name: player.name.clone(),
        steam_id: player.steam_id,
        team: player.clan_name.clone(),
        side: mapping::team(player.team).to_owned(),
        kills: player.kills,
        deaths: player.deaths,
        assists: player.assists,
        mvps: player.mvps,
        score: player.score,
    }
}
