//! The surface a replay decoder exposes to the aggregation engine.
//!
//! A decoder implements [`ReplaySource`]. While it is driven to the end of the
//! stream it pushes every decoded event into an [`EventHandler`], together with
//! a view of its current [`GameState`]. Enumerated values are kept as the raw
//! integer codes the decoder reports so that codes added by newer game versions
//! can still be carried through.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Team(pub i32);

impl Team {
    pub const UNASSIGNED: Team = Team(0);
    pub const SPECTATORS: Team = Team(1);
    pub const TERRORISTS: Team = Team(2);
    pub const COUNTER_TERRORISTS: Team = Team(3);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct HitGroup(pub i32);

impl HitGroup {
    pub const GENERIC: HitGroup = HitGroup(0);
    pub const HEAD: HitGroup = HitGroup(1);
    pub const CHEST: HitGroup = HitGroup(2);
    pub const STOMACH: HitGroup = HitGroup(3);
    pub const LEFT_ARM: HitGroup = HitGroup(4);
    pub const RIGHT_ARM: HitGroup = HitGroup(5);
    pub const LEFT_LEG: HitGroup = HitGroup(6);
    pub const RIGHT_LEG: HitGroup = HitGroup(7);
    pub const NECK: HitGroup = HitGroup(8);
    pub const GEAR: HitGroup = HitGroup(10);
}

/// Sites are reported as the ASCII code of their letter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Bombsite(pub i32);

impl Bombsite {
    pub const UNKNOWN: Bombsite = Bombsite(0);
    pub const A: Bombsite = Bombsite(b'A' as i32);
    pub const B: Bombsite = Bombsite(b'B' as i32);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EquipmentClass(pub i32);

impl EquipmentClass {
    pub const UNKNOWN: EquipmentClass = EquipmentClass(0);
    pub const PISTOLS: EquipmentClass = EquipmentClass(1);
    pub const SMG: EquipmentClass = EquipmentClass(2);
    pub const HEAVY: EquipmentClass = EquipmentClass(3);
    pub const RIFLE: EquipmentClass = EquipmentClass(4);
    pub const EQUIPMENT: EquipmentClass = EquipmentClass(5);
    pub const GRENADE: EquipmentClass = EquipmentClass(6);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RoundEndReason(pub i32);

impl RoundEndReason {
    pub const STILL_IN_PROGRESS: RoundEndReason = RoundEndReason(0);
    pub const TARGET_BOMBED: RoundEndReason = RoundEndReason(1);
    pub const BOMB_DEFUSED: RoundEndReason = RoundEndReason(7);
    pub const CT_WIN: RoundEndReason = RoundEndReason(8);
    pub const TERRORISTS_WIN: RoundEndReason = RoundEndReason(9);
    pub const DRAW: RoundEndReason = RoundEndReason(10);
    pub const TARGET_SAVED: RoundEndReason = RoundEndReason(12);
    pub const GAME_START: RoundEndReason = RoundEndReason(16);
    pub const TERRORISTS_SURRENDER: RoundEndReason = RoundEndReason(17);
    pub const CT_SURRENDER: RoundEndReason = RoundEndReason(18);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Vector {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Equipment {
    pub name: String,
    pub class: EquipmentClass,
}

/// A participant as the decoder currently knows it.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Player {
    pub steam_id: u64,
    pub name: String,
    pub clan_name: String,
    pub team: Team,
    pub position: Vector,
    pub velocity: Vector,
    pub view_x: f32,
    pub view_y: f32,
    pub is_alive: bool,
    pub health: i32,
    pub armor: i32,
    pub has_helmet: bool,
    pub has_defuse_kit: bool,
    pub money: i32,
    pub equipment_value: i32,
    pub active_weapon: Option<Equipment>,
    pub is_scoped: bool,
    pub is_ducking: bool,
    pub is_walking: bool,
    pub flash_duration: f32,
    pub kills: i32,
    pub deaths: i32,
    pub assists: i32,
    pub mvps: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DemoHeader {
    pub client_name: String,
    pub server_name: String,
    pub network_protocol: i32,
    pub map_name: String,
}

/// Leading bytes of a CS2 demo container.
pub const DEMO_MAGIC: &[u8] = b"PBDEMS2\0";

pub trait GameState {
    /// Monotonically increasing frame cursor.
    fn current_frame(&self) -> i32;

    /// Ticks per second, `0.0` while not yet known.
    fn tick_rate(&self) -> f64;

    fn header(&self) -> &DemoHeader;

    /// Players currently participating, in the decoder's iteration order.
    fn playing(&self) -> &[Player];

    fn team_score(&self, team: Team) -> i32;

    fn convar(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Kill<'a> {
    pub killer: Option<&'a Player>,
    pub victim: Option<&'a Player>,
    pub assister: Option<&'a Player>,
    pub weapon: Option<&'a Equipment>,
    pub is_headshot: bool,
    pub penetrated_objects: i32,
    pub assisted_flash: bool,
    pub through_smoke: bool,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerHurt<'a> {
    pub player: Option<&'a Player>,
    pub attacker: Option<&'a Player>,
    pub weapon: Option<&'a Equipment>,
    pub health: i32,
    pub armor: i32,
    pub health_damage: i32,
    pub armor_damage: i32,
    pub hit_group: HitGroup,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WeaponFire<'a> {
    pub shooter: Option<&'a Player>,
    pub weapon: Option<&'a Equipment>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerFlashed<'a> {
    pub player: Option<&'a Player>,
    pub attacker: Option<&'a Player>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GrenadeProjectile<'a> {
    pub thrower: Option<&'a Player>,
    pub weapon: Option<&'a Equipment>,
    pub position: Vector,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Smoke<'a> {
    pub thrower: Option<&'a Player>,
    pub position: Vector,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bomb<'a> {
    pub player: Option<&'a Player>,
    pub site: Bombsite,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RoundEnd {
    pub winner: Team,
    pub reason: RoundEndReason,
}

#[derive(Debug, Clone, Copy)]
pub enum ReplayEvent<'a> {
    RoundStart,
    RoundFreezetimeEnd,
    Kill(Kill<'a>),
    PlayerHurt(PlayerHurt<'a>),
    WeaponFire(WeaponFire<'a>),
    PlayerFlashed(PlayerFlashed<'a>),
    GrenadeProjectileThrow(GrenadeProjectile<'a>),
    GrenadeProjectileDestroy(GrenadeProjectile<'a>),
    SmokeStart(Smoke<'a>),
    SmokeExpired(Smoke<'a>),
    BombPlanted(Bomb<'a>),
    BombDefuseStart(Bomb<'a>),
    BombDefuseAborted(Bomb<'a>),
    BombDefused(Bomb<'a>),
    BombExplode(Bomb<'a>),
    RoundEnd(RoundEnd),
    /// Emitted once after all other events of a frame.
    FrameDone,
}

pub trait EventHandler {
    fn on_event(&mut self, state: &dyn GameState, event: &ReplayEvent<'_>);
}

pub trait ReplaySource {
    type Error: std::fmt::Display;

    fn parse_header(&mut self) -> Result<DemoHeader, Self::Error>;

    /// Decodes the rest of the stream, dispatching every event synchronously.
    fn parse_to_end(&mut self, handler: &mut dyn EventHandler) -> Result<(), Self::Error>;

    /// The state as it stands after the last dispatched event.
    fn game_state(&self) -> &dyn GameState;
}
