/// Pickup drop table.  Entries are tried in order with a fresh draw each;
/// the first draw under its entry's chance wins.

use rand::Rng;

use super::projectile;
use crate::entities::{GameState, PickupKind, Vec2};

pub const DROP_TABLE: [(PickupKind, f64); 6] = [
    (PickupKind::HealthPack, 0.05),
    (PickupKind::DoubleShot, 0.10),
    (PickupKind::Shield, 0.05),
    (PickupKind::Missile, 0.05),
    (PickupKind::Speed, 0.05),
    (PickupKind::Bomb, 0.03),
];

/// Walk the table with draws from `draw`, stopping at the first hit.
pub fn select(mut draw: impl FnMut() -> f64) -> Option<PickupKind> {
    DROP_TABLE
        .iter()
        .find(|(_, chance)| draw() < *chance)
        .map(|(kind, _)| *kind)
}

pub fn roll(rng: &mut impl Rng) -> Option<PickupKind> {
    select(|| rng.gen::<f64>())
}

/// Roll the table and leave any result at `at`.
pub fn drop_at(state: &mut GameState, at: Vec2, rng: &mut impl Rng) {
    if let Some(kind) = roll(rng) {
        state.pickups.push(projectile::pickup(kind, at));
    }
}
