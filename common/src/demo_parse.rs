#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub client_name: String,
    pub server_name: String,
    pub network_protocol: i32,
    pub map_name: String,
    pub tick_rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPosition {
    pub tick: i32,
    pub steam_id: u64,
    pub name: String,
    pub team: String,
    pub side: String,
    pub x: f64,
    pub y: f64,
    pub view_x: f32,
    pub view_y: f32,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub is_alive: bool,
    pub health: i32,
    pub armor: i32,
    pub has_helmet: bool,
    pub has_defuse_kit: bool,
    pub money: i32,
    pub equipment_value: i32,
    pub active_weapon: String,
    pub is_scoped: bool,
    pub is_ducking: bool,
    pub is_walking: bool,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillEvent {
    pub tick: i32,
    pub attacker_id: u64,
    pub attacker_name: String,
    pub attacker_team: String,
    pub attacker_side: String,
    pub victim_id: u64,
    pub victim_name: String,
    pub victim_team: String,
    pub victim_side: String,
    pub assister_id: u64,
    pub assister_name: String,
    pub weapon: String,
    pub weapon_class: String,
    pub is_headshot: bool,
    pub is_wallbang: bool,
    pub penetrated_objects: i32,
    pub is_flash_assist: bool,
    pub is_through_smoke: bool,
    pub attacker_x: f64,
    pub attacker_y: f64,
    pub victim_x: f64,
    pub victim_y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageEvent {
    pub tick: i32,
    pub attacker_id: u64,
    pub victim_id: u64,
    pub weapon: String,
    pub weapon_class: String,
    pub damage: i32,
    pub damage_armor: i32,
    pub health: i32,
    pub armor: i32,
    pub hitgroup: String,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponFireEvent {
    pub tick: i32,
    pub shooter_id: u64,
    pub shooter_name: String,
    pub weapon: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashEvent {
    pub tick: i32,
    pub attacker_id: u64,
    pub attacker_name: String,
    pub victim_id: u64,
    pub victim_name: String,
    pub flash_duration: f32,
}

/// One record per lifecycle step of a projectile. `event_type` is `thrown`
/// or `detonate`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrenadeEvent {
    pub tick: i32,
    pub thrower_id: u64,
    pub thrower_name: String,
    pub thrower_team: String,
    pub thrower_side: String,
    pub grenade_type: String,
    pub x: f64,
    pub y: f64,
    pub event_type: String,
}

/// `event_type` is `start` or `expire`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmokeEvent {
    pub tick: i32,
    pub thrower_id: u64,
    pub thrower_name: String,
    pub x: f64,
    pub y: f64,
    pub event_type: String,
}

/// `event` is one of `planted`, `defuse_start`, `defuse_stop`, `defused` or
/// `exploded`.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BombEvent {
    pub tick: i32,
    pub event: String,
    pub player_id: u64,
    pub player_name: String,
    pub site: String,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundEvent {
    pub round_num: i32,
    pub start_tick: i32,
    pub end_tick: i32,
    pub freeze_time_end_tick: i32,
    pub winner: String,
    pub reason: String,
    pub ct_score: i32,
    pub t_score: i32,
    pub winner_side: String,
    pub ct_start_money: i32,
    pub t_start_money: i32,
    pub ct_equipment_value: i32,
    pub t_equipment_value: i32,
    pub bomb_plant_tick: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub name: String,
    pub steam_id: u64,
    pub team: String,
    pub side: String,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub mvps: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    pub header: Header,
    pub ticks: Vec<PlayerPosition>,
    pub kills: Vec<KillEvent>,
    pub damages: Vec<DamageEvent>,
    pub weapon_fires: Vec<WeaponFireEvent>,
    pub flashes: Vec<FlashEvent>,
    pub grenades: Vec<GrenadeEvent>,
    pub smokes: Vec<SmokeEvent>,
    pub bombs: Vec<BombEvent>,
    pub rounds: Vec<RoundEvent>,
    pub players: Vec<PlayerStats>,
}
