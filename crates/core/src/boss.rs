//! Boss blinds: the boss catalogue, per-blind effect resolution and per-ante
//! selection.

use serde::{Deserialize, Serialize};

mod effects;
mod selection;

pub use effects::*;
pub use selection::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BossKind {
    Hook,
    Ox,
    House,
    Wall,
    Wheel,
    Arm,
    Club,
    Fish,
    Psychic,
    Goad,
    Water,
    Window,
    Manacle,
    Eye,
    Mouth,
    Plant,
    Serpent,
    Pillar,
    Needle,
    Head,
    Tooth,
    Flint,
    Mark,
    AmberAcorn,
    VerdantLeaf,
    VioletVessel,
    CrimsonHeart,
    CeruleanBell,
}

impl BossKind {
    pub const ALL: [BossKind; 28] = [
        BossKind::Hook,
        BossKind::Ox,
        BossKind::House,
        BossKind::Wall,
        BossKind::Wheel,
        BossKind::Arm,
        BossKind::Club,
        BossKind::Fish,
        BossKind::Psychic,
        BossKind::Goad,
        BossKind::Water,
        BossKind::Window,
        BossKind::Manacle,
        BossKind::Eye,
        BossKind::Mouth,
        BossKind::Plant,
        BossKind::Serpent,
        BossKind::Pillar,
        BossKind::Needle,
        BossKind::Head,
        BossKind::Tooth,
        BossKind::Flint,
        BossKind::Mark,
        BossKind::AmberAcorn,
        BossKind::VerdantLeaf,
        BossKind::VioletVessel,
        BossKind::CrimsonHeart,
        BossKind::CeruleanBell,
    ];

    /// Bosses allowed on the very first ante.
    pub const ANTE_ONE: [BossKind; 8] = [
        BossKind::Hook,
        BossKind::Club,
        BossKind::Psychic,
        BossKind::Goad,
        BossKind::Window,
        BossKind::Manacle,
        BossKind::Pillar,
        BossKind::Head,
    ];

    pub const FINISHERS: [BossKind; 5] = [
        BossKind::AmberAcorn,
        BossKind::VerdantLeaf,
        BossKind::VioletVessel,
        BossKind::CrimsonHeart,
        BossKind::CeruleanBell,
    ];

    pub fn is_finisher(self) -> bool {
        Self::FINISHERS.contains(&self)
    }

    pub fn allowed_on_ante_one(self) -> bool {
        Self::ANTE_ONE.contains(&self)
    }
}

pub fn is_finisher_ante(ante: u32) -> bool {
    ante > 0 && ante % 8 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finisher_and_ante_one_sets_are_disjoint() {
        for boss in BossKind::ANTE_ONE {
            assert!(!boss.is_finisher(), "{boss:?} cannot be both");
        }
        assert_eq!(
            BossKind::ALL.iter().filter(|boss| boss.is_finisher()).count(),
            5
        );
    }

    #[test]
    fn finisher_antes_are_multiples_of_eight() {
        assert!(is_finisher_ante(8));
        assert!(is_finisher_ante(16));
        assert!(!is_finisher_ante(7));
        assert!(!is_finisher_ante(0));
    }
}
