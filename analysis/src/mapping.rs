use crate::source::{Bombsite, EquipmentClass, HitGroup, RoundEndReason, Team};

pub const UNKNOWN: &str = "Unknown";
pub const UNASSIGNED: &str = "UNASSIGNED";

static TEAMS: phf::Map<i32, &'static str> = phf::phf_map! {
    1_i32 => "SPEC",
    2_i32 => "T",
    3_i32 => "CT",
};

static HIT_GROUPS: phf::Map<i32, &'static str> = phf::phf_map! {
    0_i32 => "Generic",
    1_i32 => "Head",
    2_i32 => "Chest",
    3_i32 => "Stomach",
    4_i32 => "LeftArm",
    5_i32 => "RightArm",
    6_i32 => "LeftLeg",
    7_i32 => "RightLeg",
};

static BOMBSITES: phf::Map<i32, &'static str> = phf::phf_map! {
    65_i32 => "A",
    66_i32 => "B",
};

static EQUIPMENT_CLASSES: phf::Map<i32, &'static str> = phf::phf_map! {
    1_i32 => "Pistol",
    2_i32 => "SMG",
    3_i32 => "Heavy",
    4_i32 => "Rifle",
    5_i32 => "Equipment",
    6_i32 => "Grenade",
};

static ROUND_END_REASONS: phf::Map<i32, &'static str> = phf::phf_map! {
    1_i32 => "TargetBombed",
    7_i32 => "BombDefused",
    8_i32 => "CTWin",
    9_i32 => "TerroristsWin",
    12_i32 => "TargetSaved",
    17_i32 => "TerroristsSurrender",
    18_i32 => "CTSurrender",
};

pub fn team(team: Team) -> &'static str {
    TEAMS.get(&team.0).copied().unwrap_or(UNASSIGNED)
}

pub fn hit_group(group: HitGroup) -> &'static str {
    HIT_GROUPS.get(&group.0).copied().unwrap_or(UNKNOWN)
}

pub fn bombsite(site: Bombsite) -> &'static str {
    BOMBSITES.get(&site.0).copied().unwrap_or(UNKNOWN)
}

pub fn equipment_class(class: EquipmentClass) -> &'static str {
    EQUIPMENT_CLASSES.get(&class.0).copied().unwrap_or(UNKNOWN)
}

pub fn round_end_reason(reason: RoundEndReason) -> &'static str {
    ROUND_END_REASONS.get(&reason.0).copied().unwrap_or(UNKNOWN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sides() {
        assert_eq!("T", team(Team::TERRORISTS));
        assert_eq!("CT", team(Team::COUNTER_TERRORISTS));
        assert_eq!("SPEC", team(Team::SPECTATORS));
        assert_eq!("UNASSIGNED", team(Team::UNASSIGNED));
        assert_eq!("UNASSIGNED", team(Team(42)));
    }

    #[test]
    fn hit_groups_outside_the_body_are_unknown() {
        assert_eq!("Head", hit_group(HitGroup::HEAD));
        assert_eq!("Generic", hit_group(HitGroup::GENERIC));
        assert_eq!("RightLeg", hit_group(HitGroup::RIGHT_LEG));
        assert_eq!("Unknown", hit_group(HitGroup::NECK));
        assert_eq!("Unknown", hit_group(HitGroup::GEAR));
    }

    #[test]
    fn bombsites() {
        assert_eq!("A", bombsite(Bombsite::A));
        assert_eq!("B", bombsite(Bombsite::B));
        assert_eq!("Unknown", bombsite(Bombsite::UNKNOWN));
    }

    #[test]
    fn equipment_classes() {
        assert_eq!("Pistol", equipment_class(EquipmentClass::PISTOLS));
        assert_eq!("Rifle", equipment_class(EquipmentClass::RIFLE));
        assert_eq!("Grenade", equipment_class(EquipmentClass::GRENADE));
        assert_eq!("Unknown", equipment_class(EquipmentClass::UNKNOWN));
        assert_eq!("Unknown", equipment_class(EquipmentClass(99)));
    }

    #[test]
    fn round_end_reasons() {
        assert_eq!("TargetBombed", round_end_reason(RoundEndReason::TARGET_BOMBED));
        assert_eq!("CTWin", round_end_reason(RoundEndReason::CT_WIN));
        assert_eq!("TerroristsWin", round_end_reason(RoundEndReason::TERRORISTS_WIN));
        assert_eq!("CTSurrender", round_end_reason(RoundEndReason::CT_SURRENDER));
        assert_eq!("Unknown", round_end_reason(RoundEndReason::DRAW));
        assert_eq!("Unknown", round_end_reason(RoundEndReason::STILL_IN_PROGRESS));
    }
}
