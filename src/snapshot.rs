/// Read-only views of a [`GameState`] for the renderer: what to draw, where,
/// and the HUD numbers.

use crate::entities::{Archetype, Behavior, GameState, GameStatus, PickupKind, Vec2};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Player,
    Enemy(Archetype),
    Boss(u8),
    Bullet,
    Missile,
    BossBullet,
    EnemyBullet,
    SniperBeam,
    Bomb,
    Shell,
    Blast,
    Asteroid,
    Pickup(PickupKind),
    MuzzleFlash,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub sprite: Sprite,
    pub pos: Vec2,
    /// Half-transparent frame (aiming sniper blink).
    pub dimmed: bool,
    /// Sprite scale; only the leech pulse changes it.
    pub scale: f32,
}

impl DrawCall {
    fn at(sprite: Sprite, pos: Vec2) -> Self {
        Self {
            sprite,
            pos,
            dimmed: false,
            scale: 1.0,
        }
    }
}

/// A line from a leech to whatever it holds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TetherLink {
    pub from: Vec2,
    pub to: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Hud {
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub wave: u32,
    pub max_waves: u32,
    pub lives: u32,
    pub health: i32,
    pub shield_ticks: u32,
    pub double_shot_ticks: u32,
    pub missile_ticks: u32,
    pub speed_boost_ticks: u32,
    pub tether_ticks: u32,
    pub bombs: u32,
    /// `Some` while a boss is alive.
    pub boss_health: Option<f32>,
    pub bomb_flash: bool,
    /// Seconds left on the get-ready countdown.
    pub countdown: Option<u32>,
    pub background: usize,
}

/// Everything visible this frame, back to front.
pub fn draw_list(state: &GameState) -> Vec<DrawCall> {
    let mut calls = Vec::new();

    for pickup in state.pickups.iter().filter(|p| !p.destroyed) {
        calls.push(DrawCall::at(Sprite::Pickup(pickup.kind), pickup.body.pos));
    }
    for asteroid in state.asteroids.iter().filter(|a| !a.destroyed) {
        calls.push(DrawCall::at(Sprite::Asteroid, asteroid.body.pos));
    }

    for enemy in state.enemies.iter().filter(|e| !e.destroyed) {
        let mut call = DrawCall::at(Sprite::Enemy(enemy.archetype), enemy.body.pos);
        match enemy.behavior {
            Behavior::Sniper { dimmed, .. } => call.dimmed = dimmed,
            Behavior::Leech(leech) => call.scale = leech.pulse_scale,
            _ => {}
        }
        calls.push(call);
        if enemy.muzzle_flash > 0 {
            let muzzle = Vec2::new(enemy.body.pos.x, enemy.body.bottom());
            calls.push(DrawCall::at(Sprite::MuzzleFlash, muzzle));
        }
    }

    if let Some(boss) = state.live_boss() {
        calls.push(DrawCall::at(Sprite::Boss(boss.variant), boss.body.pos));
    }

    for bullet in state.bullets.iter().filter(|b| !b.destroyed) {
        calls.push(DrawCall::at(Sprite::Bullet, bullet.body.pos));
    }
    for missile in state.missiles.iter().filter(|m| !m.destroyed) {
        calls.push(DrawCall::at(Sprite::Missile, missile.body.pos));
    }
    for bullet in state.boss_bullets.iter().filter(|b| !b.destroyed) {
        calls.push(DrawCall::at(Sprite::BossBullet, bullet.body.pos));
    }
    for bullet in state.enemy_bullets.iter().filter(|b| !b.destroyed) {
        let sprite = if bullet.beam {
            Sprite::SniperBeam
        } else {
            Sprite::EnemyBullet
        };
        calls.push(DrawCall::at(sprite, bullet.body.pos));
    }
    for bomb in state.bombs.iter().filter(|b| !b.destroyed) {
        calls.push(DrawCall::at(Sprite::Bomb, bomb.body.pos));
    }
    for shell in state.artillery_shells.iter().filter(|s| !s.destroyed) {
        let sprite = if shell.exploded {
            Sprite::Blast
        } else {
            Sprite::Shell
        };
        calls.push(DrawCall::at(sprite, shell.body.pos));
    }

    if state.player.visible {
        calls.push(DrawCall::at(Sprite::Player, state.player.body.pos));
    }
    calls
}

/// Lines from each linked leech to the player.
pub fn tether_links(state: &GameState) -> Vec<TetherLink> {
    state
        .enemies
        .iter()
        .filter(|e| !e.destroyed)
        .filter(|e| e.tether_target().is_some() && state.player.tethered_by == Some(e.id))
        .map(|e| TetherLink {
            from: e.body.pos,
            to: state.player.body.pos,
        })
        .collect()
}

pub fn hud(state: &GameState) -> Hud {
    let p = &state.player;
    let countdown = match state.status {
        GameStatus::Starting { ticks_left } => Some(ticks_left.div_ceil(60)),
        _ => None,
    };
    Hud {
        score: state.score,
        high_score: state.high_score,
        level: state.waves.level,
        wave: state.waves.wave,
        max_waves: state.waves.max_waves,
        lives: p.lives,
        health: p.health,
        shield_ticks: p.shield_ticks,
        double_shot_ticks: p.double_shot_ticks,
        missile_ticks: p.missile_ticks,
        speed_boost_ticks: p.speed_boost_ticks,
        tether_ticks: p.tether_ticks,
        bombs: p.bomb_count,
        boss_health: state.live_boss().map(|b| b.health_ratio()),
        bomb_flash: state.bomb_flash > 0,
        countdown,
        background: state.background,
    }
}
