/// Player state machine: movement, firing, bombs, power-up timers, death.

use tracing::{debug, info};

use super::{boss, collision, projectile};
use crate::entities::{Body, Cue, GameState, GameStatus, Player, PlayerInput, Vec2, HEIGHT, WIDTH};

pub const PLAYER_SIZE: f32 = 50.0;
pub const BASE_SPEED: f32 = 7.0;
pub const SPEED_BOOST_FACTOR: f32 = 1.5;
pub const TETHER_SLOWDOWN: f32 = 0.5;
pub const MAX_HEALTH: i32 = 100;

pub const INVINCIBILITY_DURATION: u32 = 180;
pub const BLINK_INTERVAL: u32 = 20;
pub const POWER_UP_DURATION: u32 = 900;
pub const TETHER_DURATION: u32 = 180;

/// Ticks between automatic shots while fire is held.
pub const SHOOT_DELAY: u32 = 10;
pub const MISSILE_SHOOT_DELAY: u32 = 20;
pub const HELD_SHOT_DAMAGE: i32 = 10;
pub const TAPPED_SHOT_DAMAGE: i32 = 15;
pub const DOUBLE_SHOT_OFFSET: f32 = 10.0;

pub const MAX_BOMBS: u32 = 9;
pub const BOMB_COOLDOWN: u32 = 20;
pub const BOMB_FLASH: u32 = 10;
pub const BOMB_ENEMY_DAMAGE: i32 = 50;
pub const BOMB_BOSS_DAMAGE: i32 = 100;
/// Enemies at or below this health die to a bomb outright.
pub const BOMB_INSTANT_KILL_HEALTH: i32 = 20;

pub const HEALTH_PACK_HEAL: i32 = 25;

pub fn spawn_point() -> Vec2 {
    Vec2::new(WIDTH / 2.0, HEIGHT - 60.0)
}

pub fn new_player(lives: u32) -> Player {
    let spawn = spawn_point();
    Player {
        body: Body::new(spawn.x, spawn.y, PLAYER_SIZE, PLAYER_SIZE),
        health: MAX_HEALTH,
        lives,
        shield_ticks: 0,
        double_shot_ticks: 0,
        missile_ticks: 0,
        speed_boost_ticks: 0,
        invincible_ticks: 0,
        blink_ticks: 0,
        visible: true,
        tether_ticks: 0,
        tethered_by: None,
        bomb_count: 0,
        bomb_cooldown: 0,
        fire_hold_ticks: 0,
        missile_hold_ticks: 0,
    }
}

/// Respawn after losing a life: back to the spawn point with full health,
/// no power-ups and a grace period.  Lives are left untouched.
pub fn respawn(player: &mut Player) {
    *player = Player {
        invincible_ticks: INVINCIBILITY_DURATION,
        ..new_player(player.lives)
    };
}

pub fn effective_speed(player: &Player) -> f32 {
    let mut speed = BASE_SPEED;
    if player.has_speed_boost() {
        speed *= SPEED_BOOST_FACTOR;
    }
    if player.is_tethered() {
        speed *= TETHER_SLOWDOWN;
    }
    speed
}

pub fn take_damage(player: &mut Player, amount: i32) {
    player.health = (player.health - amount).clamp(0, MAX_HEALTH);
}

pub fn heal(player: &mut Player, amount: i32) {
    player.health = (player.health + amount).clamp(0, MAX_HEALTH);
}

pub fn release_tether(player: &mut Player) {
    player.tether_ticks = 0;
    player.tethered_by = None;
}

// ── Per-frame update ─────────────────────────────────────────────────────────

pub fn update(state: &mut GameState, input: &PlayerInput) {
    {
        let player = &mut state.player;
        if player.tether_ticks > 0 {
            player.tether_ticks -= 1;
            if player.tether_ticks == 0 {
                player.tethered_by = None;
            }
        }

        let speed = effective_speed(player);
        let mut dx = 0.0;
        let mut dy = 0.0;
        if input.left {
            dx -= speed;
        }
        if input.right {
            dx += speed;
        }
        if input.up {
            dy -= speed;
        }
        if input.down {
            dy += speed;
        }
        let body = &mut player.body;
        body.pos.x = (body.pos.x + dx).clamp(body.half.x, WIDTH - body.half.x);
        body.pos.y = (body.pos.y + dy).clamp(body.half.y, HEIGHT - body.half.y);

        if player.invincible_ticks > 0 {
            player.invincible_ticks -= 1;
            player.blink_ticks += 1;
            if player.blink_ticks >= BLINK_INTERVAL {
                player.visible = !player.visible;
                player.blink_ticks = 0;
            }
            if player.invincible_ticks == 0 {
                player.visible = true;
                player.blink_ticks = 0;
            }
        }
    }

    if input.fire_tap {
        shoot(state, TAPPED_SHOT_DAMAGE);
    }
    if input.fire {
        state.player.fire_hold_ticks += 1;
        if state.player.fire_hold_ticks >= SHOOT_DELAY {
            shoot(state, HELD_SHOT_DAMAGE);
            state.player.fire_hold_ticks = 0;
        }
    } else {
        state.player.fire_hold_ticks = 0;
    }

    if input.missile {
        if state.player.has_missiles() {
            state.player.missile_hold_ticks += 1;
            if state.player.missile_hold_ticks >= MISSILE_SHOOT_DELAY {
                fire_missile(state);
                state.player.missile_hold_ticks = 0;
            }
        }
    } else {
        state.player.missile_hold_ticks = 0;
    }

    state.player.bomb_cooldown = state.player.bomb_cooldown.saturating_sub(1);
    if input.bomb && state.player.bomb_count > 0 && state.player.bomb_cooldown == 0 {
        use_bomb(state);
        state.player.bomb_cooldown = BOMB_COOLDOWN;
    }
}

/// Fire one bullet, or a parallel pair under double-shot.
pub fn shoot(state: &mut GameState, damage: i32) {
    let x = state.player.body.pos.x;
    let y = state.player.body.top();
    if state.player.has_double_shot() {
        state
            .bullets
            .push(projectile::player_bullet(x - DOUBLE_SHOT_OFFSET, y, damage));
        state
            .bullets
            .push(projectile::player_bullet(x + DOUBLE_SHOT_OFFSET, y, damage));
    } else {
        state.bullets.push(projectile::player_bullet(x, y, damage));
    }
    state.cues.push(Cue::Shoot);
}

pub fn fire_missile(state: &mut GameState) {
    let origin = Vec2::new(state.player.body.pos.x, state.player.body.top());
    let missile = projectile::missile(state, origin);
    state.missiles.push(missile);
    state.cues.push(Cue::MissileShot);
}

/// Screen-clearing bomb.  Does nothing without a charge.
pub fn use_bomb(state: &mut GameState) {
    if state.player.bomb_count == 0 {
        return;
    }
    state.player.bomb_count -= 1;
    state.bomb_flash = BOMB_FLASH;
    state.cues.push(Cue::BombExplosion);
    for _ in state.asteroids.iter().filter(|a| !a.destroyed) {
        state.cues.push(Cue::Explosion);
    }

    for i in 0..state.enemies.len() {
        let enemy = &mut state.enemies[i];
        if enemy.destroyed {
            continue;
        }
        if enemy.health <= BOMB_INSTANT_KILL_HEALTH {
            enemy.health = 0;
        } else {
            enemy.health -= BOMB_ENEMY_DAMAGE;
        }
        if enemy.health <= 0 {
            collision::destroy_enemy(state, i, true);
        }
    }

    let boss_down = match state.boss.as_mut() {
        Some(b) if !b.destroyed => {
            b.health -= BOMB_BOSS_DAMAGE;
            b.health <= 0
        }
        _ => false,
    };
    if boss_down {
        boss::defeat(state);
    }

    clear_hostile_fire(state);
    state.asteroids.clear();
    debug!(bombs_left = state.player.bomb_count, "bomb detonated");
}

/// Remove every projectile aimed at the player.
pub fn clear_hostile_fire(state: &mut GameState) {
    state.enemy_bullets.clear();
    state.boss_bullets.clear();
    state.bombs.clear();
    state.artillery_shells.clear();
}

/// Count down the timed power-ups.
pub fn tick_power_ups(player: &mut Player) {
    player.double_shot_ticks = player.double_shot_ticks.saturating_sub(1);
    player.shield_ticks = player.shield_ticks.saturating_sub(1);
    player.missile_ticks = player.missile_ticks.saturating_sub(1);
    player.speed_boost_ticks = player.speed_boost_ticks.saturating_sub(1);
}

/// Handle a player at zero health.  Returns `true` when the game is over.
pub fn check_death(state: &mut GameState) -> bool {
    if state.player.health > 0 {
        return false;
    }
    state.cues.push(Cue::PlayerExplosion);
    state.player.lives = state.player.lives.saturating_sub(1);

    if state.player.lives == 0 {
        state.status = GameStatus::GameOver;
        state.cues.push(Cue::GameOver);
        info!(score = state.score, level = state.waves.level, "game over");
        return true;
    }

    respawn(&mut state.player);
    state.enemies.clear();
    clear_hostile_fire(state);
    state.asteroids.clear();
    state.missile_hits.clear();
    state.waves.enemies_spawned = 0;
    info!(lives = state.player.lives, "player lost a life");
    false
}
