/// Boss behavior.  The phase is re-derived from the health ratio every tick;
/// the stored phase only exists to notice a change.

use rand::Rng;
use tracing::{debug, info};

use super::projectile;
use crate::entities::{Body, Boss, BossPhase, Cue, EntityId, GameState, Vec2, BOSS_VARIANTS, WIDTH};

pub const BOSS_WIDTH: f32 = 150.0;
pub const BOSS_HEIGHT: f32 = 100.0;
pub const ENTRY_Y: f32 = -150.0;
pub const ENTRY_SPEED: f32 = 2.0;
/// Top edge the boss descends to before it starts patrolling.
pub const PATROL_TOP: f32 = 50.0;

pub const BOMB_INTERVAL: u32 = 120;
pub const REVERSE_CHANCE: f64 = 0.05;
/// Contact damage per tick while the player overlaps the boss.
pub const CONTACT_DAMAGE: i32 = 1;
/// Ticks of calm after a boss dies before the level moves on.
pub const TRANSITION_DELAY: u32 = 180;

pub fn max_health(level: u32) -> i32 {
    300 + 75 * level as i32
}

pub fn phase_speed(phase: BossPhase) -> f32 {
    match phase {
        BossPhase::One => 5.0,
        BossPhase::Two => 7.0,
        BossPhase::Three => 10.0,
    }
}

pub fn fire_delay(phase: BossPhase, level: u32) -> u32 {
    let level = level as i32;
    match phase {
        BossPhase::One | BossPhase::Two => (60 - 5 * level).max(30) as u32,
        BossPhase::Three => (45 - 5 * level).max(25) as u32,
    }
}

/// Bullet angles from vertical for one volley.
pub fn spread(phase: BossPhase) -> &'static [f32] {
    match phase {
        BossPhase::One => &[0.0],
        BossPhase::Two => &[0.0, -30.0, 30.0],
        BossPhase::Three => &[0.0, -45.0, -22.5, 22.5, 45.0],
    }
}

pub fn defeat_bonus(level: u32) -> u32 {
    (250.0 * 1.25_f64.powi(level as i32 - 1)).round() as u32
}

pub fn new_boss(id: EntityId, level: u32, variant: u8) -> Boss {
    let health = max_health(level);
    Boss {
        id,
        body: Body::new(WIDTH / 2.0, ENTRY_Y, BOSS_WIDTH, BOSS_HEIGHT),
        health,
        max_health: health,
        direction: 1.0,
        fire_timer: 0,
        bomb_timer: 0,
        phase: BossPhase::One,
        variant,
        destroyed: false,
    }
}

pub fn spawn(state: &mut GameState, rng: &mut impl Rng) {
    let id = state.alloc_id();
    let variant = rng.gen_range(0..BOSS_VARIANTS);
    state.boss = Some(new_boss(id, state.waves.level, variant));
    info!(level = state.waves.level, variant, "boss spawned");
}

pub fn update(state: &mut GameState, rng: &mut impl Rng) {
    let level = state.waves.level;
    let Some(boss) = state.boss.as_mut().filter(|b| !b.destroyed) else {
        return;
    };

    let phase = boss.current_phase();
    if phase != boss.phase {
        boss.phase = phase;
        state.cues.push(Cue::BossPhase(phase.number()));
        debug!(phase = phase.number(), "boss phase change");
    }
    if phase == BossPhase::Three && rng.gen_bool(REVERSE_CHANCE) {
        boss.direction = -boss.direction;
    }

    if boss.body.top() < PATROL_TOP {
        boss.body.pos.y += ENTRY_SPEED;
    } else {
        boss.body.pos.x += phase_speed(phase) * boss.direction;
        if boss.body.right() >= WIDTH || boss.body.left() <= 0.0 {
            boss.direction = -boss.direction;
        }
    }

    let muzzle = Vec2::new(boss.body.pos.x, boss.body.bottom());
    boss.fire_timer += 1;
    if boss.fire_timer >= fire_delay(phase, level) {
        for angle in spread(phase) {
            state
                .boss_bullets
                .push(projectile::boss_bullet(muzzle.x, muzzle.y, *angle));
        }
        state.cues.push(Cue::BossShoot);
        boss.fire_timer = 0;
    }

    if phase == BossPhase::Three {
        boss.bomb_timer += 1;
        if boss.bomb_timer >= BOMB_INTERVAL {
            state.bombs.push(projectile::bomb(muzzle.x, muzzle.y, 0.0));
            state.cues.push(Cue::BossShoot);
            boss.bomb_timer = 0;
        }
    }
}

/// Finish off the boss: bonus, explosion, wave bump and the transition hold.
/// Returns where it died, or `None` if there was no live boss.
pub fn defeat(state: &mut GameState) -> Option<Vec2> {
    let boss = state.boss.as_mut().filter(|b| !b.destroyed)?;
    boss.destroyed = true;
    let pos = boss.body.pos;

    let bonus = defeat_bonus(state.waves.level);
    state.score += bonus;
    state.cues.push(Cue::BossExplosion);
    state.waves.wave += 1;
    state.waves.transition_delay = Some(TRANSITION_DELAY);
    info!(level = state.waves.level, bonus, "boss defeated");
    Some(pos)
}
