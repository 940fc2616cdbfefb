//! Publication allow-lists
//!
//! These lists are narrower than [`crate::keys::PLACEABLES`]: the decoder keeps
//! every historical name readable, publication only accepts what is balanced.

use crate::keys::PLACEABLES;

/// Placeables the decoder understands but publication rejects.
pub const EXPERIMENTAL_PLACEABLES: [&str; 4] =
    ["oImitater", "oIceBergLettuce", "oBonkChoy", "oSnapDragon"];

/// Placeables allowed past the stripe column (pots, pads and pumpkins).
pub const STRIPE_BYPASS: [&str; 3] = ["oLilyPad", "oFlowerPot", "oPumpkinHead"];

/// Music tracks a published level may use.
pub const MUSIC: [&str; 1] = ["Cerebrawl"];

/// Enemy types a published level may offer.
pub const ZOMBIES: [&str; 20] = [
    "oZombie",
    "oFlagZombie",
    "oConeheadZombie",
    "oPoleVaultingZombie",
    "oBucketheadZombie",
    "oNewspaperZombie",
    "oScreenDoorZombie",
    "oFootballZombie",
    "oDancingZombie",
    "oBackupDancer",
    "oDuckyTubeZombie",
    "oSnorkelZombie",
    "oZomboni",
    "oDolphinRiderZombie",
    "oJackinTheBoxZombie",
    "oBalloonZombie",
    "oDiggerZombie",
    "oPogoZombie",
    "oLadderZombie",
    "oImp",
];

/// Placeables a published level may contain.
pub fn publishable_placeables() -> impl Iterator<Item = &'static str> {
    PLACEABLES
        .iter()
        .copied()
        .filter(|name| !EXPERIMENTAL_PLACEABLES.contains(name))
}
