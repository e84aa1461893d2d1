mod fixtures;

use analysis::source::{Bombsite, Equipment, EquipmentClass, HitGroup, Vector};
use analysis::trace::{BombAction, Projectile, SmokeCloud, Step};
use analysis::ParseOptions;
use fixtures::*;
use pretty_assertions::assert_eq;

fn run(steps: Vec<Step>) -> common::ParseResult {
    let mut script = Script::new();
    script
        .at(1, [Step::Players { players: roster() }])
        .at(5, steps);
    analysis::parse(script.build(1, 6), &ParseOptions::default()).unwrap()
}

#[test]
fn kill_with_all_actors() {
    let result = run(vec![Step::Kill {
        killer: Some(T1),
        victim: Some(CT1),
        assister: Some(T2),
        weapon: Some(rifle("AK-47")),
        is_headshot: true,
        penetrated_objects: 1,
        assisted_flash: true,
        through_smoke: false,
    }]);

    let expected = common::KillEvent {
        tick: 5,
        attacker_id: T1,
        attacker_name: "excel".to_owned(),
        attacker_team: "Team A".to_owned(),
        attacker_side: "T".to_owned(),
        victim_id: CT1,
        victim_name: "haze".to_owned(),
        victim_team: "Team B".to_owned(),
        victim_side: "CT".to_owned(),
        assister_id: T2,
        assister_name: "skalla".to_owned(),
        weapon: "AK-47".to_owned(),
        weapon_class: "Rifle".to_owned(),
        is_headshot: true,
        is_wallbang: true,
        penetrated_objects: 1,
        is_flash_assist: true,
        is_through_smoke: false,
        attacker_x: (T1 as f32 % 100.0) as f64,
        attacker_y: -250.5,
        victim_x: (CT1 as f32 % 100.0) as f64,
        victim_y: -250.5,
    };

    assert_eq!(vec![expected], result.kills);
}

#[test]
fn suicide_by_world_keeps_record() {
    let result = run(vec![Step::Kill {
        killer: None,
        victim: Some(CT2),
        assister: None,
        weapon: None,
        is_headshot: false,
        penetrated_objects: 0,
        assisted_flash: false,
        through_smoke: false,
    }]);

    let kill = &result.kills[0];
    assert_eq!(0, kill.attacker_id);
    assert_eq!("", kill.attacker_name);
    assert_eq!("", kill.attacker_side);
    assert_eq!(0.0, kill.attacker_x);
    assert_eq!(CT2, kill.victim_id);
    assert_eq!("", kill.weapon);
    assert_eq!("", kill.weapon_class);
    assert!(!kill.is_wallbang);
}

#[test]
fn world_damage() {
    let result = run(vec![Step::PlayerHurt {
        player: Some(T2),
        attacker: None,
        weapon: Some(Equipment {
            name: "World".to_owned(),
            class: EquipmentClass::UNKNOWN,
        }),
        health: 73,
        armor: 100,
        health_damage: 27,
        armor_damage: 0,
        hit_group: HitGroup::GENERIC,
    }]);

    let expected = common::DamageEvent {
        tick: 5,
        attacker_id: 0,
        victim_id: T2,
        weapon: "World".to_owned(),
        weapon_class: "Unknown".to_owned(),
        damage: 27,
        damage_armor: 0,
        health: 73,
        armor: 100,
        hitgroup: "Generic".to_owned(),
    };
    assert_eq!(vec![expected], result.damages);
}

#[test]
fn neck_hits_are_unknown() {
    let result = run(vec![Step::PlayerHurt {
        player: Some(CT1),
        attacker: Some(T1),
        weapon: Some(rifle("AK-47")),
        health: 0,
        armor: 50,
        health_damage: 111,
        armor_damage: 12,
        hit_group: HitGroup::NECK,
    }]);

    assert_eq!(T1, result.damages[0].attacker_id);
    assert_eq!("Unknown", result.damages[0].hitgroup);
}

#[test]
fn weapon_fire_without_shooter() {
    let result = run(vec![
        Step::WeaponFire {
            shooter: Some(CT1),
            weapon: Some(rifle("M4A1-S")),
        },
        Step::WeaponFire {
            shooter: None,
            weapon: None,
        },
    ]);

    assert_eq!(2, result.weapon_fires.len());
    assert_eq!(CT1, result.weapon_fires[0].shooter_id);
    assert_eq!("haze", result.weapon_fires[0].shooter_name);
    assert_eq!("M4A1-S", result.weapon_fires[0].weapon);
    assert_eq!(-250.5, result.weapon_fires[0].y);
    assert_eq!(common::WeaponFireEvent { tick: 5, ..Default::default() }, result.weapon_fires[1]);
}

#[test]
fn flashes() {
    let mut players = roster();
    players[2].flash_duration = 3.25;

    let mut script = Script::new();
    script.at(1, [Step::Players { players }]).at(4, [
        Step::PlayerFlashed {
            player: Some(CT1),
            attacker: Some(T1),
        },
        Step::PlayerFlashed {
            player: Some(CT1),
            attacker: None,
        },
        Step::PlayerFlashed {
            player: None,
            attacker: Some(T1),
        },
    ]);
    let result = analysis::parse(script.build(1, 5), &ParseOptions::default()).unwrap();

    assert_eq!(
        vec![
            common::FlashEvent {
                tick: 4,
                attacker_id: T1,
                attacker_name: "excel".to_owned(),
                victim_id: CT1,
                victim_name: "haze".to_owned(),
                flash_duration: 3.25,
            },
            common::FlashEvent {
                tick: 4,
                victim_id: CT1,
                victim_name: "haze".to_owned(),
                flash_duration: 3.25,
                ..Default::default()
            },
            common::FlashEvent {
                tick: 4,
                attacker_id: T1,
                attacker_name: "excel".to_owned(),
                ..Default::default()
            },
        ],
        result.flashes
    );
}

#[test]
fn grenade_lifecycle() {
    let he = Equipment {
        name: "HE Grenade".to_owned(),
        class: EquipmentClass::GRENADE,
    };
    let result = run(vec![
        Step::GrenadeThrow(Projectile {
            thrower: Some(T2),
            weapon: Some(he.clone()),
            position: Vector { x: 10.0, y: 20.0, z: 0.0 },
        }),
        Step::GrenadeDestroy(Projectile {
            thrower: None,
            weapon: Some(he),
            position: Vector { x: 400.0, y: -80.0, z: 3.0 },
        }),
    ]);

    let phases: Vec<_> = result.grenades.iter().map(|g| g.event_type.as_str()).collect();
    assert_eq!(vec!["thrown", "detonate"], phases);

    assert_eq!(T2, result.grenades[0].thrower_id);
    assert_eq!("T", result.grenades[0].thrower_side);
    assert_eq!("Team A", result.grenades[0].thrower_team);
    assert_eq!("HE Grenade", result.grenades[0].grenade_type);

    assert_eq!(0, result.grenades[1].thrower_id);
    assert_eq!("", result.grenades[1].thrower_side);
    assert_eq!(400.0, result.grenades[1].x);
    assert_eq!(-80.0, result.grenades[1].y);
}

#[test]
fn smoke_lifecycle() {
    let position = Vector { x: -512.0, y: 1024.0, z: 0.0 };
    let result = run(vec![
        Step::SmokeStart(SmokeCloud {
            thrower: Some(CT2),
            position,
        }),
        Step::SmokeExpired(SmokeCloud {
            thrower: None,
            position,
        }),
    ]);

    assert_eq!(
        vec![
            common::SmokeEvent {
                tick: 5,
                thrower_id: CT2,
                thrower_name: "zodiac".to_owned(),
                x: -512.0,
                y: 1024.0,
                event_type: "start".to_owned(),
            },
            common::SmokeEvent {
                tick: 5,
                thrower_id: 0,
                thrower_name: String::new(),
                x: -512.0,
                y: 1024.0,
                event_type: "expire".to_owned(),
            },
        ],
        result.smokes
    );
}

#[test]
fn bomb_events() {
    let planted = BombAction {
        player: Some(T1),
        site: Bombsite::B,
    };
    let defuser = BombAction {
        player: Some(CT1),
        site: Bombsite::B,
    };
    let result = run(vec![
        Step::BombPlanted(planted),
        Step::BombDefuseStart(defuser.clone()),
        Step::BombDefuseAborted(defuser.clone()),
        Step::BombDefused(defuser),
        Step::BombExplode(BombAction {
            player: None,
            site: Bombsite::UNKNOWN,
        }),
    ]);

    let events: Vec<_> = result
        .bombs
        .iter()
        .map(|b| (b.event.as_str(), b.player_id, b.site.as_str()))
        .collect();
    assert_eq!(
        vec![
            ("planted", T1, "B"),
            ("defuse_start", CT1, "B"),
            ("defuse_stop", CT1, "B"),
            ("defused", CT1, "B"),
            ("exploded", 0, "Unknown"),
        ],
        events
    );
    assert_eq!("excel", result.bombs[0].player_name);
    assert_eq!(0.0, result.bombs[4].x);
}

#[test]
fn records_keep_arrival_order() {
    let result = run(vec![
        Step::WeaponFire {
            shooter: Some(T1),
            weapon: None,
        },
        Step::WeaponFire {
            shooter: Some(CT1),
            weapon: None,
        },
        Step::WeaponFire {
            shooter: Some(T2),
            weapon: None,
        },
    ]);

    let shooters: Vec<_> = result.weapon_fires.iter().map(|f| f.shooter_id).collect();
    assert_eq!(vec![T1, CT1, T2], shooters);
}
