/// Wave and level progression.  At most one [`DirectorAction`] happens per
/// tick, checked in priority order.

use rand::Rng;
use tracing::{debug, info};

use super::{boss, enemy, player, projectile};
use crate::entities::{Cue, GameState, WaveCounters, BACKGROUND_COUNT};

/// Ticks between enemy spawns.
pub const SPAWN_DELAY: u32 = 30;
/// Ticks between asteroid spawns.
pub const ASTEROID_SPAWN_DELAY: u32 = 90;
pub const LEVEL_BONUS: u32 = 100;
pub const MAX_WAVES_CAP: u32 = 10;

/// Enemy-count multiplier per wave; later waves reuse the last entry.
pub const WAVE_MULTIPLIERS: [f64; 7] = [0.5, 0.75, 1.0, 1.25, 1.5, 1.75, 2.0];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DirectorAction {
    AdvanceWave,
    SpawnBoss,
    CompleteLevel,
    SpawnEnemy,
    SpawnAsteroid,
}

pub fn max_waves_for(level: u32) -> u32 {
    MAX_WAVES_CAP.min(5 + level)
}

pub fn base_enemies_for(level: u32) -> u32 {
    3 + level
}

pub fn enemies_for_wave(base_enemies: u32, wave: u32) -> u32 {
    let index = (wave.max(1) as usize - 1).min(WAVE_MULTIPLIERS.len() - 1);
    (base_enemies as f64 * WAVE_MULTIPLIERS[index]).ceil() as u32
}

/// Live asteroid cap; none before level 2.
pub fn asteroid_cap(level: u32) -> usize {
    if level >= 2 {
        (level as usize - 1).clamp(5, 8)
    } else {
        0
    }
}

/// Fresh counters for the first wave of `level`.
pub fn counters_for_level(level: u32) -> WaveCounters {
    let base_enemies = base_enemies_for(level);
    WaveCounters {
        level,
        wave: 1,
        max_waves: max_waves_for(level),
        base_enemies,
        enemies_per_wave: enemies_for_wave(base_enemies, 1),
        enemies_spawned: 0,
        boss_spawned: false,
        spawn_timer: 0,
        asteroid_spawn_timer: 0,
        max_asteroids: asteroid_cap(level),
        transition_delay: None,
    }
}

/// Count down the post-boss hold.  On expiry the screen fades and the
/// asteroid cap is refreshed.
pub fn advance_transition(state: &mut GameState) {
    let Some(ticks) = state.waves.transition_delay else {
        return;
    };
    if ticks <= 1 {
        state.waves.transition_delay = None;
        state.waves.max_asteroids = asteroid_cap(state.waves.level);
        state.cues.push(Cue::TransitionFade);
    } else {
        state.waves.transition_delay = Some(ticks - 1);
    }
}

fn live_enemies(state: &GameState) -> bool {
    state.enemies.iter().any(|e| !e.destroyed)
}

/// Pick this tick's action, if any, and carry it out.
pub fn step(state: &mut GameState, rng: &mut impl Rng) -> Option<DirectorAction> {
    if state.waves.transition_delay.is_some() {
        return None;
    }
    let action = choose(state)?;
    match action {
        DirectorAction::AdvanceWave => advance_wave(&mut state.waves),
        DirectorAction::SpawnBoss => {
            boss::spawn(state, rng);
            state.waves.boss_spawned = true;
            state.enemy_bullets.clear();
            state.bombs.clear();
            state.artillery_shells.clear();
        }
        DirectorAction::CompleteLevel => complete_level(state, rng),
        DirectorAction::SpawnEnemy => {
            enemy::spawn_enemy(state, rng);
            state.waves.enemies_spawned += 1;
            state.waves.spawn_timer = 0;
        }
        DirectorAction::SpawnAsteroid => {
            projectile::spawn_asteroid(state, rng);
            state.waves.asteroid_spawn_timer = 0;
        }
    }
    Some(action)
}

/// Evaluate the progression rules in priority order.  Spawn timers advance
/// here whenever their spawn is eligible.
fn choose(state: &mut GameState) -> Option<DirectorAction> {
    let enemies_alive = live_enemies(state);
    let boss_alive = state.live_boss().is_some();
    let asteroids_alive = state.asteroids.iter().filter(|a| !a.destroyed).count();
    let w = &mut state.waves;

    if w.wave < w.max_waves && w.enemies_spawned >= w.enemies_per_wave && !enemies_alive && !boss_alive
    {
        return Some(DirectorAction::AdvanceWave);
    }
    if w.wave == w.max_waves && !w.boss_spawned && !enemies_alive {
        return Some(DirectorAction::SpawnBoss);
    }
    if w.wave > w.max_waves {
        return Some(DirectorAction::CompleteLevel);
    }

    let mut enemy_due = false;
    if w.wave < w.max_waves && w.enemies_spawned < w.enemies_per_wave && !w.boss_spawned {
        w.spawn_timer += 1;
        enemy_due = w.spawn_timer >= SPAWN_DELAY;
    }
    let mut asteroid_due = false;
    if w.level >= 2 && asteroids_alive < w.max_asteroids && !w.boss_spawned {
        w.asteroid_spawn_timer += 1;
        asteroid_due = w.asteroid_spawn_timer >= ASTEROID_SPAWN_DELAY;
    }

    if enemy_due {
        Some(DirectorAction::SpawnEnemy)
    } else if asteroid_due {
        Some(DirectorAction::SpawnAsteroid)
    } else {
        None
    }
}

fn advance_wave(w: &mut WaveCounters) {
    w.wave += 1;
    w.base_enemies = base_enemies_for(w.level);
    w.enemies_per_wave = enemies_for_wave(w.base_enemies, w.wave);
    w.enemies_spawned = 0;
    w.boss_spawned = false;
    w.spawn_timer = 0;
    debug!(level = w.level, wave = w.wave, target = w.enemies_per_wave, "wave advanced");
}

/// Any background index other than `current`.
pub fn reroll_background(current: usize, rng: &mut impl Rng) -> usize {
    if BACKGROUND_COUNT < 2 {
        return current;
    }
    let pick = rng.gen_range(0..BACKGROUND_COUNT - 1);
    if pick >= current {
        pick + 1
    } else {
        pick
    }
}

/// Bonus, next level's counters, a fresh background and a cleared board.
pub fn complete_level(state: &mut GameState, rng: &mut impl Rng) {
    state.score += LEVEL_BONUS;
    state.cues.push(Cue::LevelComplete);
    let finished = state.waves.level;
    state.waves = counters_for_level(finished + 1);
    state.background = reroll_background(state.background, rng);

    state.enemies.clear();
    state.boss = None;
    state.bullets.clear();
    state.missiles.clear();
    player::clear_hostile_fire(state);
    state.asteroids.clear();
    state.missile_hits.clear();

    let spawn = player::spawn_point();
    state.player.body.pos = spawn;
    player::release_tether(&mut state.player);
    info!(level = finished, score = state.score, "level complete");
}
