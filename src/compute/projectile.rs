/// Constructors and per-frame motion for projectiles, hazards and pickups.

use rand::Rng;

use super::player;
use crate::entities::{
    ArtilleryShell, Asteroid, Body, Bomb, BossBullet, Bullet, Cue, EnemyBullet, GameState,
    Missile, Pickup, PickupKind, TargetRef, Vec2, HEIGHT, WIDTH,
};

// ── Tuning ───────────────────────────────────────────────────────────────────

pub const BULLET_SPEED: f32 = 10.0;
pub const MISSILE_SPEED: f32 = 10.0;
/// Missile damage against a boss; enemies follow the armored rule instead.
pub const MISSILE_BOSS_DAMAGE: i32 = 20;

pub const BOSS_BULLET_SPEED: f32 = 7.0;
pub const BOSS_BULLET_DAMAGE: i32 = 10;

pub const ENEMY_BULLET_SPEED: f32 = 5.0;
pub const ENEMY_BULLET_DAMAGE: i32 = 10;
pub const SNIPER_BEAM_SPEED: f32 = 10.0;
pub const SNIPER_BEAM_DAMAGE: i32 = 15;

pub const BOMB_SPEED: f32 = 3.0;
pub const BOMB_DAMAGE: i32 = 15;

pub const ASTEROID_HEALTH: i32 = 3;
pub const ASTEROID_DAMAGE: i32 = 15;
/// Asteroids (and enemies) may wander this far past an edge before removal.
pub const OFFSCREEN_MARGIN: f32 = 40.0;

pub const SHELL_SPEED: f32 = 3.0;
pub const SHELL_CONTACT_DAMAGE: i32 = 20;
pub const SHELL_MAX_DISTANCE: f32 = 400.0;
pub const SHELL_BLAST_RADIUS: f32 = 50.0;
pub const SHELL_BLAST_DAMAGE: i32 = 10;
pub const SHELL_BLAST_TICKS: u32 = 10;

pub const PICKUP_FALL_SPEED: f32 = 3.0;

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn player_bullet(x: f32, y: f32, damage: i32) -> Bullet {
    Bullet {
        body: Body::new(x, y, 6.0, 16.0),
        damage,
        destroyed: false,
    }
}

/// A homing missile locked onto whatever is nearest at launch.
pub fn missile(state: &GameState, origin: Vec2) -> Missile {
    Missile {
        body: Body::new(origin.x, origin.y, 10.0, 20.0),
        target: nearest_target(state, origin),
        destroyed: false,
    }
}

/// `angle_deg` is measured from straight down; positive drifts right.
pub fn boss_bullet(x: f32, y: f32, angle_deg: f32) -> BossBullet {
    BossBullet {
        body: Body::new(x, y, 5.0, 15.0),
        velocity: from_vertical(BOSS_BULLET_SPEED, angle_deg),
        destroyed: false,
    }
}

/// Straight-down enemy bullet.
pub fn enemy_bullet(x: f32, y: f32) -> EnemyBullet {
    EnemyBullet {
        body: Body::new(x, y, 5.0, 10.0),
        velocity: Vec2::new(0.0, ENEMY_BULLET_SPEED),
        damage: ENEMY_BULLET_DAMAGE,
        beam: false,
        destroyed: false,
    }
}

pub fn sniper_beam(x: f32, y: f32) -> EnemyBullet {
    EnemyBullet {
        body: Body::new(x, y, 10.0, 144.0),
        velocity: Vec2::new(0.0, SNIPER_BEAM_SPEED),
        damage: SNIPER_BEAM_DAMAGE,
        beam: true,
        destroyed: false,
    }
}

/// `angle_deg` is measured from straight down.
pub fn bomb(x: f32, y: f32, angle_deg: f32) -> Bomb {
    Bomb {
        body: Body::new(x, y, 10.0, 10.0),
        velocity: from_vertical(BOMB_SPEED, angle_deg),
        damage: BOMB_DAMAGE,
        destroyed: false,
    }
}

/// A shell fired from `from` toward `target`, fixed at launch.
pub fn artillery_shell(from: Vec2, target: Vec2) -> ArtilleryShell {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    let distance = (dx * dx + dy * dy).sqrt().max(1.0);
    ArtilleryShell {
        body: Body::new(from.x, from.y, 10.0, 10.0),
        velocity: Vec2::new(SHELL_SPEED * dx / distance, SHELL_SPEED * dy / distance),
        origin: from,
        exploded: false,
        explosion_ticks: 0,
        destroyed: false,
    }
}

pub fn pickup(kind: PickupKind, at: Vec2) -> Pickup {
    Pickup {
        kind,
        body: Body::new(at.x, at.y, 30.0, 30.0),
        destroyed: false,
    }
}

/// Drop a new asteroid in from above the screen on a downward heading.
pub fn spawn_asteroid(state: &mut GameState, rng: &mut impl Rng) {
    let id = state.alloc_id();
    let x = rng.gen_range(20..=(WIDTH as i32 - 20)) as f32;
    let speed: f32 = rng.gen_range(4.0..8.0);
    let angle: f32 = rng.gen_range(45.0_f32..135.0).to_radians();
    state.asteroids.push(Asteroid {
        id,
        body: Body::new(x, -OFFSCREEN_MARGIN, 40.0, 40.0),
        velocity: Vec2::new(speed * angle.cos(), speed * angle.sin()),
        health: ASTEROID_HEALTH,
        destroyed: false,
    });
}

fn from_vertical(speed: f32, angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(speed * rad.sin(), speed * rad.cos())
}

// ── Homing ───────────────────────────────────────────────────────────────────

/// Centre of a live target, or `None` once it is gone.
pub fn target_position(state: &GameState, target: TargetRef) -> Option<Vec2> {
    match target {
        TargetRef::Enemy(id) => state.enemy(id).map(|e| e.body.pos),
        TargetRef::Boss(id) => state
            .live_boss()
            .filter(|b| b.id == id)
            .map(|b| b.body.pos),
        TargetRef::Asteroid(id) => state.asteroid(id).map(|a| a.body.pos),
    }
}

/// Closest live enemy, boss or asteroid to `from`.
pub fn nearest_target(state: &GameState, from: Vec2) -> Option<TargetRef> {
    let enemies = state
        .enemies
        .iter()
        .filter(|e| !e.destroyed)
        .map(|e| (TargetRef::Enemy(e.id), e.body.pos));
    let boss = state
        .live_boss()
        .map(|b| (TargetRef::Boss(b.id), b.body.pos));
    let asteroids = state
        .asteroids
        .iter()
        .filter(|a| !a.destroyed)
        .map(|a| (TargetRef::Asteroid(a.id), a.body.pos));

    enemies
        .chain(boss)
        .chain(asteroids)
        .min_by(|a, b| from.distance(a.1).total_cmp(&from.distance(b.1)))
        .map(|(target, _)| target)
}

// ── Motion ───────────────────────────────────────────────────────────────────

/// Move player bullets and missiles.  Missiles re-acquire a target whenever
/// theirs has gone and fly straight up when nothing is left.
pub fn update_player_shots(state: &mut GameState) {
    for bullet in state.bullets.iter_mut().filter(|b| !b.destroyed) {
        bullet.body.pos.y -= BULLET_SPEED;
        if bullet.body.bottom() < 0.0 {
            bullet.destroyed = true;
        }
    }

    for i in 0..state.missiles.len() {
        if state.missiles[i].destroyed {
            continue;
        }
        let pos = state.missiles[i].body.pos;
        let target = state.missiles[i]
            .target
            .filter(|t| target_position(state, *t).is_some())
            .or_else(|| nearest_target(state, pos));
        let aim = target.and_then(|t| target_position(state, t));

        let missile = &mut state.missiles[i];
        missile.target = target;
        match aim {
            Some(goal) => {
                let dist = pos.distance(goal);
                if dist > 0.0 {
                    missile.body.pos.x += (goal.x - pos.x) / dist * MISSILE_SPEED;
                    missile.body.pos.y += (goal.y - pos.y) / dist * MISSILE_SPEED;
                }
            }
            None => missile.body.pos.y -= MISSILE_SPEED,
        }
        if missile.body.bottom() < 0.0 {
            missile.destroyed = true;
        }
    }
}

pub fn update_pickups(state: &mut GameState) {
    for pickup in state.pickups.iter_mut().filter(|p| !p.destroyed) {
        pickup.body.pos.y += PICKUP_FALL_SPEED;
        if pickup.body.top() > HEIGHT {
            pickup.destroyed = true;
        }
    }
}

pub fn update_asteroids(state: &mut GameState) {
    for asteroid in state.asteroids.iter_mut().filter(|a| !a.destroyed) {
        asteroid.body.pos.x += asteroid.velocity.x;
        asteroid.body.pos.y += asteroid.velocity.y;
        let b = &asteroid.body;
        if b.top() > HEIGHT + OFFSCREEN_MARGIN
            || b.bottom() < -OFFSCREEN_MARGIN
            || b.left() > WIDTH + OFFSCREEN_MARGIN
            || b.right() < -OFFSCREEN_MARGIN
        {
            asteroid.destroyed = true;
        }
    }
}

/// Move every hostile projectile.  Exploded artillery shells damage the
/// player while the blast lasts.
pub fn update_hazards(state: &mut GameState) {
    for bullet in state.boss_bullets.iter_mut().filter(|b| !b.destroyed) {
        bullet.body.pos.x += bullet.velocity.x;
        bullet.body.pos.y += bullet.velocity.y;
        if bullet.body.off_screen() {
            bullet.destroyed = true;
        }
    }

    for bullet in state.enemy_bullets.iter_mut().filter(|b| !b.destroyed) {
        if bullet.body.off_screen() {
            bullet.destroyed = true;
            continue;
        }
        bullet.body.pos.x += bullet.velocity.x;
        bullet.body.pos.y += bullet.velocity.y;
    }

    for bomb in state.bombs.iter_mut().filter(|b| !b.destroyed) {
        bomb.body.pos.x += bomb.velocity.x;
        bomb.body.pos.y += bomb.velocity.y;
        if bomb.body.top() > HEIGHT {
            bomb.destroyed = true;
        }
    }

    let player_pos = state.player.body.pos;
    let exposed = state.player.is_vulnerable();
    let mut blast_damage = 0;
    for shell in state.artillery_shells.iter_mut().filter(|s| !s.destroyed) {
        if shell.exploded {
            if shell.explosion_ticks > 0 {
                if exposed && shell.body.pos.distance(player_pos) <= SHELL_BLAST_RADIUS {
                    blast_damage += SHELL_BLAST_DAMAGE;
                }
                shell.explosion_ticks -= 1;
            }
            if shell.explosion_ticks == 0 {
                shell.destroyed = true;
            }
            continue;
        }

        shell.body.pos.x += shell.velocity.x;
        shell.body.pos.y += shell.velocity.y;
        if shell.body.pos.distance(shell.origin) >= SHELL_MAX_DISTANCE || shell.body.off_screen() {
            detonate(shell, &mut state.cues);
        }
    }
    if blast_damage > 0 {
        player::take_damage(&mut state.player, blast_damage);
    }
}

/// Turn a travelling shell into a stationary blast.
pub fn detonate(shell: &mut ArtilleryShell, cues: &mut Vec<Cue>) {
    if shell.exploded {
        return;
    }
    shell.exploded = true;
    shell.explosion_ticks = SHELL_BLAST_TICKS;
    cues.push(Cue::Explosion);
}
