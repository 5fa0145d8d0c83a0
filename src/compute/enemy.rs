/// Enemy archetype catalogue: spawn-time rolls, per-tick behavior, firing.

use std::sync::OnceLock;

use rand::Rng;

use super::{player, projectile};
use crate::entities::{
    Archetype, Behavior, Body, Cue, Enemy, EntityId, GameState, LeechState, SniperPhase, Vec2,
    HEIGHT, PLAYER_ID, WIDTH,
};

pub const ENEMY_SIZE: f32 = 40.0;
pub const SPAWN_Y: f32 = -40.0;
pub const ARTILLERY_SPAWN_Y: f32 = 100.0;
/// Horizontal band enemies spawn in and drift within.
pub const EDGE_MARGIN: f32 = 20.0;

const SINE_STEPS: usize = 360;
const LEECH_DRIFT: f32 = 5.0;
const LEECH_TETHER_RANGE: f32 = 200.0;
const LEECH_PULSE_PERIOD: u32 = 10;

const SNIPER_AIM_TICKS: u32 = 30;
const SNIPER_BLINK_EVERY: u32 = 5;
const SNIPER_RECOIL_STEPS: u32 = 4;
const SNIPER_RECOIL_LIFT: f32 = 20.0;
const SNIPER_RECOIL_CEILING: f32 = -80.0;
const SNIPER_PAUSE_TICKS: u32 = 2;
const SNIPER_COOLDOWN_TICKS: u32 = 30;
const SNIPER_BEAM_LENGTH: f32 = 144.0;

const MUZZLE_FLASH_TICKS: u32 = 3;
const BOMBER_SPREAD: [f32; 3] = [-30.0, 0.0, 30.0];

/// Shared horizontal drift table: `sin(i * 0.05) * 3`.
fn sine_table() -> &'static [f32; SINE_STEPS] {
    static TABLE: OnceLock<[f32; SINE_STEPS]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [0.0; SINE_STEPS];
        for (i, v) in table.iter_mut().enumerate() {
            *v = (i as f32 * 0.05).sin() * 3.0;
        }
        table
    })
}

pub fn sine_offset(phase: usize) -> f32 {
    sine_table()[phase % SINE_STEPS]
}

// ── Spawn rolls ──────────────────────────────────────────────────────────────

/// Relative spawn weight by unlock level before renormalization.
pub fn archetype_weight(archetype: Archetype) -> f64 {
    match archetype.unlock_level() {
        1 => 0.25,
        2 => 0.2,
        3 => 0.15,
        4 => 0.1,
        _ => 0.05,
    }
}

/// Archetypes unlocked at `level`; the two earliest when nothing is.
pub fn eligible_archetypes(level: u32) -> Vec<Archetype> {
    let unlocked: Vec<Archetype> = Archetype::ALL
        .iter()
        .copied()
        .filter(|a| a.unlock_level() <= level)
        .collect();
    if unlocked.is_empty() {
        vec![Archetype::Basic, Archetype::Fighter]
    } else {
        unlocked
    }
}

/// Map a uniform `roll` in [0, 1) to an archetype by cumulative weight.
pub fn choose_archetype(level: u32, roll: f64) -> Archetype {
    let pool = eligible_archetypes(level);
    let total: f64 = pool.iter().map(|a| archetype_weight(*a)).sum();
    let mut acc = 0.0;
    for archetype in &pool {
        acc += archetype_weight(*archetype) / total;
        if roll < acc {
            return *archetype;
        }
    }
    // Floating-point slack at the top of the range.
    pool[pool.len() - 1]
}

pub fn scaled_health(archetype: Archetype, level: u32) -> i32 {
    let over = level as f64 - archetype.unlock_level() as f64;
    (archetype.base_health() as f64 * (1.0 + over * 0.1)).round() as i32
}

pub fn build_enemy(id: EntityId, archetype: Archetype, level: u32, x: f32, base_speed: f32) -> Enemy {
    let y = if archetype == Archetype::Artillery {
        ARTILLERY_SPAWN_Y
    } else {
        SPAWN_Y
    };
    let behavior = match archetype {
        Archetype::Sniper => Behavior::Sniper {
            phase: SniperPhase::Idle,
            dimmed: false,
        },
        Archetype::Leech => Behavior::Leech(LeechState {
            tethered_to: None,
            attach_cue_played: false,
            pulse: 0,
            pulse_scale: 1.0,
        }),
        Archetype::Artillery => Behavior::Artillery,
        _ => Behavior::Straight,
    };
    Enemy {
        id,
        archetype,
        body: Body::new(x, y, ENEMY_SIZE, ENEMY_SIZE),
        health: scaled_health(archetype, level),
        base_speed,
        speed: base_speed,
        score_value: archetype.score_value(),
        fire_timer: 0,
        fire_delay: archetype.fire_delay().unwrap_or(0),
        sine_phase: 0,
        muzzle_flash: 0,
        behavior,
        destroyed: false,
    }
}

/// Roll and add one enemy for the current level.
pub fn spawn_enemy(state: &mut GameState, rng: &mut impl Rng) {
    let level = state.waves.level;
    let archetype = choose_archetype(level, rng.gen::<f64>());
    let x = rng.gen_range(EDGE_MARGIN as i32..=(WIDTH - EDGE_MARGIN) as i32) as f32;
    let base_speed = if archetype == Archetype::Artillery {
        0.0
    } else {
        let (lo, hi) = archetype.speed_range();
        (rng.gen_range(lo..=hi) + level / 2) as f32
    };
    let id = state.alloc_id();
    state
        .enemies
        .push(build_enemy(id, archetype, level, x, base_speed));
}

// ── Per-tick behavior ────────────────────────────────────────────────────────

pub fn update_all(state: &mut GameState) {
    let mut enemies = std::mem::take(&mut state.enemies);
    for enemy in enemies.iter_mut().filter(|e| !e.destroyed) {
        update_enemy(enemy, state);
    }
    state.enemies = enemies;
}

fn update_enemy(enemy: &mut Enemy, state: &mut GameState) {
    let body = enemy.body;
    if body.top() > HEIGHT + projectile::OFFSCREEN_MARGIN
        || body.bottom() < -projectile::OFFSCREEN_MARGIN
    {
        if body.bottom() > HEIGHT && enemy.archetype != Archetype::Artillery {
            enemy.destroyed = true;
            if state.player.tethered_by == Some(enemy.id) {
                player::release_tether(&mut state.player);
            }
        }
        return;
    }
    enemy.sine_phase = (enemy.sine_phase + 1) % SINE_STEPS;

    match enemy.behavior {
        Behavior::Leech(_) => update_leech(enemy, state),
        Behavior::Sniper { .. } => update_sniper(enemy, state),
        Behavior::Artillery => {
            enemy.speed = 0.0;
            enemy.fire_timer += 1;
            if enemy.fire_timer >= enemy.fire_delay {
                fire(enemy, state);
                enemy.fire_timer = 0;
            }
        }
        Behavior::Straight => enemy.speed = enemy.base_speed,
    }

    if matches!(
        enemy.archetype,
        Archetype::Fighter | Archetype::Tank | Archetype::Bomber | Archetype::Sniper
    ) {
        enemy.fire_timer += 1;
        if enemy.fire_timer >= enemy.fire_delay {
            fire(enemy, state);
            enemy.fire_timer = 0;
        }
    }
    enemy.muzzle_flash = enemy.muzzle_flash.saturating_sub(1);

    enemy.body.pos.y += enemy.speed;
}

fn update_leech(enemy: &mut Enemy, state: &mut GameState) {
    let Behavior::Leech(mut leech) = enemy.behavior else {
        return;
    };
    enemy.body.pos.x += sine_offset(enemy.sine_phase) * LEECH_DRIFT;
    enemy.body.clamp_x(EDGE_MARGIN, WIDTH - EDGE_MARGIN);

    // A link lasts only as long as the player still names this leech.
    if leech.tethered_to.is_some() && state.player.tethered_by != Some(enemy.id) {
        leech.tethered_to = None;
    }

    enemy.fire_timer += 1;
    if enemy.fire_timer >= enemy.fire_delay {
        let in_range = enemy.body.pos.distance(state.player.body.pos) <= LEECH_TETHER_RANGE;
        if in_range && !state.player.is_tethered() {
            state.player.tether_ticks = player::TETHER_DURATION;
            state.player.tethered_by = Some(enemy.id);
            leech.tethered_to = Some(PLAYER_ID);
            enemy.fire_timer = 0;
            if !leech.attach_cue_played {
                state.cues.push(Cue::LeechTether);
                leech.attach_cue_played = true;
            }
        }
    }

    leech.pulse += 1;
    if leech.pulse >= LEECH_PULSE_PERIOD {
        leech.pulse = 0;
    }
    leech.pulse_scale = 1.0 + 0.05 * (leech.pulse as f32 * 0.628).sin();
    enemy.behavior = Behavior::Leech(leech);
}

fn update_sniper(enemy: &mut Enemy, state: &mut GameState) {
    let Behavior::Sniper { phase, mut dimmed } = enemy.behavior else {
        return;
    };
    let next = match phase {
        SniperPhase::Aiming { remaining, flash } => {
            enemy.speed = 0.0;
            let remaining = remaining.saturating_sub(1);
            let flash = flash + 1;
            if flash % SNIPER_BLINK_EVERY == 0 {
                dimmed = !dimmed;
            }
            if remaining == 0 {
                dimmed = false;
                SniperPhase::Recoil { step: 1 }
            } else {
                SniperPhase::Aiming { remaining, flash }
            }
        }
        SniperPhase::Recoil { step } => {
            enemy.speed = 0.0;
            if enemy.body.top() > SNIPER_RECOIL_CEILING {
                enemy.body.pos.y -= SNIPER_RECOIL_LIFT;
            }
            if step + 1 > SNIPER_RECOIL_STEPS {
                SniperPhase::Pause {
                    remaining: SNIPER_PAUSE_TICKS,
                }
            } else {
                SniperPhase::Recoil { step: step + 1 }
            }
        }
        SniperPhase::Pause { remaining } => {
            enemy.speed = 0.0;
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                let top = enemy.body.bottom() - 20.0;
                state.enemy_bullets.push(projectile::sniper_beam(
                    enemy.body.pos.x,
                    top + SNIPER_BEAM_LENGTH / 2.0,
                ));
                state.cues.push(Cue::SniperLaser);
                enemy.muzzle_flash = MUZZLE_FLASH_TICKS;
                SniperPhase::Cooldown {
                    remaining: SNIPER_COOLDOWN_TICKS,
                }
            } else {
                SniperPhase::Pause { remaining }
            }
        }
        SniperPhase::Cooldown { remaining } => {
            enemy.speed = 0.0;
            let remaining = remaining.saturating_sub(1);
            if remaining == 0 {
                enemy.speed = enemy.base_speed;
                SniperPhase::Idle
            } else {
                SniperPhase::Cooldown { remaining }
            }
        }
        SniperPhase::Idle => {
            enemy.speed = enemy.base_speed;
            enemy.body.pos.x += sine_offset(enemy.sine_phase);
            enemy.body.clamp_x(EDGE_MARGIN, WIDTH - EDGE_MARGIN);
            SniperPhase::Idle
        }
    };
    enemy.behavior = Behavior::Sniper {
        phase: next,
        dimmed,
    };
}

/// One shot on the archetype's own terms.  Snipers only begin aiming.
fn fire(enemy: &mut Enemy, state: &mut GameState) {
    let muzzle = Vec2::new(enemy.body.pos.x, enemy.body.bottom());
    match enemy.archetype {
        Archetype::Sniper => {
            if let Behavior::Sniper { phase, dimmed } = enemy.behavior {
                if phase == SniperPhase::Idle {
                    enemy.behavior = Behavior::Sniper {
                        phase: SniperPhase::Aiming {
                            remaining: SNIPER_AIM_TICKS,
                            flash: 0,
                        },
                        dimmed,
                    };
                }
            }
        }
        Archetype::Bomber => {
            for angle in BOMBER_SPREAD {
                state.bombs.push(projectile::bomb(muzzle.x, muzzle.y, angle));
            }
            state.cues.push(Cue::EnemyBomb);
            enemy.muzzle_flash = MUZZLE_FLASH_TICKS;
        }
        Archetype::Tank => {
            state.bombs.push(projectile::bomb(muzzle.x, muzzle.y, 0.0));
            state.cues.push(Cue::EnemyBomb);
        }
        Archetype::Artillery => {
            state
                .artillery_shells
                .push(projectile::artillery_shell(muzzle, state.player.body.pos));
            state.cues.push(Cue::ArtilleryShot);
            enemy.muzzle_flash = MUZZLE_FLASH_TICKS;
        }
        Archetype::Fighter => {
            state
                .enemy_bullets
                .push(projectile::enemy_bullet(muzzle.x, muzzle.y));
            state.cues.push(Cue::FighterShoot);
        }
        Archetype::Basic | Archetype::Leech => {}
    }
}
