/// Pure game-logic functions.
///
/// [`tick`] takes an immutable reference to the current [`GameState`], the
/// held-key [`PlayerInput`] for this frame and an RNG handle, and returns a
/// brand-new `GameState`.  Side effects are limited to the injected RNG, so a
/// seeded RNG replays a game exactly.
///
/// Each submodule owns one slice of the frame:
///
/// * [`director`]   : wave/level progression and spawning
/// * [`player`]     : movement, firing, bombs, power-up timers, death
/// * [`enemy`]      : archetype catalogue and per-archetype behavior
/// * [`boss`]       : health-derived phase machine
/// * [`projectile`] : constructors and motion for every projectile/hazard
/// * [`collision`]  : damage resolution and rewards
/// * [`drops`]      : the sequential pickup drop table

pub mod boss;
pub mod collision;
pub mod director;
pub mod drops;
pub mod enemy;
pub mod player;
pub mod projectile;

use std::collections::HashMap;

use rand::Rng;

use crate::entities::{GameState, GameStatus, PlayerInput, BACKGROUND_COUNT, PLAYER_ID};

/// Ticks of "get ready" before the first simulated frame (3 s at 60 Hz).
pub const START_COUNTDOWN: u32 = 180;

/// Lives a new game starts with unless configured otherwise.
pub const DEFAULT_LIVES: u32 = 3;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state.
pub fn init_state(starting_lives: u32, high_score: u32, rng: &mut impl Rng) -> GameState {
    GameState {
        player: player::new_player(starting_lives.max(1)),
        enemies: Vec::new(),
        boss: None,
        bullets: Vec::new(),
        missiles: Vec::new(),
        boss_bullets: Vec::new(),
        enemy_bullets: Vec::new(),
        bombs: Vec::new(),
        artillery_shells: Vec::new(),
        asteroids: Vec::new(),
        pickups: Vec::new(),
        waves: director::counters_for_level(1),
        score: 0,
        high_score,
        status: GameStatus::Starting {
            ticks_left: START_COUNTDOWN,
        },
        frame: 0,
        background: rng.gen_range(0..BACKGROUND_COUNT),
        bomb_flash: 0,
        missile_hits: HashMap::new(),
        cues: Vec::new(),
        next_id: PLAYER_ID + 1,
    }
}

// ── Per-frame tick (pure apart from the injected RNG) ──────────────────────────

/// Advance the simulation by one frame.
pub fn tick(state: &GameState, input: &PlayerInput, rng: &mut impl Rng) -> GameState {
    let mut next = state.clone();
    next.cues.clear();

    match next.status {
        GameStatus::GameOver => return next,
        GameStatus::Starting { ticks_left } => {
            next.frame += 1;
            next.status = if ticks_left <= 1 {
                GameStatus::Playing
            } else {
                GameStatus::Starting {
                    ticks_left: ticks_left - 1,
                }
            };
            return next;
        }
        GameStatus::Playing => {}
    }
    next.frame += 1;

    // ── 1. Post-boss hold, then progression ──────────────────────────────────
    director::advance_transition(&mut next);
    director::step(&mut next, rng);

    // ── 2. Player input ──────────────────────────────────────────────────────
    player::update(&mut next, input);

    // ── 3. Everything else moves ─────────────────────────────────────────────
    projectile::update_player_shots(&mut next);
    enemy::update_all(&mut next);
    boss::update(&mut next, rng);
    projectile::update_pickups(&mut next);
    projectile::update_asteroids(&mut next);
    projectile::update_hazards(&mut next);

    // ── 4. Power-up timers ───────────────────────────────────────────────────
    player::tick_power_ups(&mut next.player);

    // ── 5. Collisions, rewards, drops ────────────────────────────────────────
    collision::resolve(&mut next, rng);

    // ── 6. Housekeeping ──────────────────────────────────────────────────────
    sweep(&mut next);
    next.bomb_flash = next.bomb_flash.saturating_sub(1);
    next.high_score = next.high_score.max(next.score);
    next
}

/// Drop everything flagged as destroyed during the frame and forget missile
/// hits on enemies that no longer exist.
pub fn sweep(state: &mut GameState) {
    state.enemies.retain(|e| !e.destroyed);
    state.bullets.retain(|b| !b.destroyed);
    state.missiles.retain(|m| !m.destroyed);
    state.boss_bullets.retain(|b| !b.destroyed);
    state.enemy_bullets.retain(|b| !b.destroyed);
    state.bombs.retain(|b| !b.destroyed);
    state.artillery_shells.retain(|s| !s.destroyed);
    state.asteroids.retain(|a| !a.destroyed);
    state.pickups.retain(|p| !p.destroyed);
    if state.boss.as_ref().is_some_and(|b| b.destroyed) {
        state.boss = None;
    }

    let enemies = &state.enemies;
    state
        .missile_hits
        .retain(|id, _| enemies.iter().any(|e| e.id == *id));
}
