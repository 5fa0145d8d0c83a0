/// Collision and damage resolution, run once per tick after everything moved.

use rand::Rng;

use super::{boss, drops, player, projectile};
use crate::entities::{Cue, GameState, PickupKind, Vec2};

pub const ENEMY_CONTACT_DAMAGE: i32 = 20;
/// Missile hits an armored enemy absorbs before dying.
pub const ARMORED_MISSILE_HITS: u32 = 2;

pub fn resolve(state: &mut GameState, rng: &mut impl Rng) {
    // ── 1. Player vs hazards ─────────────────────────────────────────────────
    if state.player.is_vulnerable() {
        player_hazards(state);
    }

    // ── 2. Death ─────────────────────────────────────────────────────────────
    if player::check_death(state) {
        return;
    }

    // ── 3. Player fire ───────────────────────────────────────────────────────
    bullets_vs_targets(state, rng);
    missiles_vs_targets(state, rng);

    // ── 4. Asteroids vs enemies ──────────────────────────────────────────────
    asteroids_vs_enemies(state);

    // ── 5. Pickups ───────────────────────────────────────────────────────────
    collect_pickups(state);
}

fn player_hazards(state: &mut GameState) {
    let hull = state.player.body;
    let mut damage = 0;

    for i in 0..state.enemies.len() {
        let enemy = &state.enemies[i];
        if !enemy.destroyed && enemy.body.overlaps(&hull) {
            damage += ENEMY_CONTACT_DAMAGE;
            destroy_enemy(state, i, false);
            state.cues.push(Cue::PlayerCollision);
        }
    }

    if state.live_boss().is_some_and(|b| b.body.overlaps(&hull)) {
        damage += boss::CONTACT_DAMAGE;
        state.cues.push(Cue::PlayerCollision);
    }

    for bullet in state.boss_bullets.iter_mut().filter(|b| !b.destroyed) {
        if bullet.body.overlaps(&hull) {
            bullet.destroyed = true;
            damage += projectile::BOSS_BULLET_DAMAGE;
            state.cues.push(Cue::PlayerCollision);
        }
    }

    for bullet in state.enemy_bullets.iter_mut().filter(|b| !b.destroyed) {
        if bullet.body.overlaps(&hull) {
            bullet.destroyed = true;
            damage += bullet.damage;
            state.cues.push(Cue::PlayerCollision);
        }
    }

    for bomb in state.bombs.iter_mut().filter(|b| !b.destroyed) {
        if bomb.body.overlaps(&hull) {
            bomb.destroyed = true;
            damage += bomb.damage;
            state.cues.push(Cue::PlayerCollision);
        }
    }

    for shell in state.artillery_shells.iter_mut().filter(|s| !s.destroyed) {
        if !shell.exploded && shell.body.overlaps(&hull) {
            damage += projectile::SHELL_CONTACT_DAMAGE;
            state.cues.push(Cue::PlayerCollision);
            projectile::detonate(shell, &mut state.cues);
        }
    }

    for asteroid in state.asteroids.iter_mut().filter(|a| !a.destroyed) {
        if asteroid.body.overlaps(&hull) {
            asteroid.destroyed = true;
            damage += projectile::ASTEROID_DAMAGE;
            state.cues.push(Cue::AsteroidCollision);
        }
    }

    if damage > 0 {
        player::take_damage(&mut state.player, damage);
    }
}

/// Each bullet is spent on the first thing it touches: an enemy, then the
/// boss, then an asteroid.
fn bullets_vs_targets(state: &mut GameState, rng: &mut impl Rng) {
    for b in 0..state.bullets.len() {
        if state.bullets[b].destroyed {
            continue;
        }
        let body = state.bullets[b].body;
        let damage = state.bullets[b].damage;

        if let Some(i) = state
            .enemies
            .iter()
            .position(|e| !e.destroyed && e.body.overlaps(&body))
        {
            state.bullets[b].destroyed = true;
            state.enemies[i].health -= damage;
            if state.enemies[i].health <= 0 {
                let at = destroy_enemy(state, i, true);
                state.cues.push(Cue::Explosion);
                drops::drop_at(state, at, rng);
            }
            continue;
        }

        if state.live_boss().is_some_and(|boss| boss.body.overlaps(&body)) {
            state.bullets[b].destroyed = true;
            damage_boss(state, damage, rng);
            continue;
        }

        if let Some(a) = state
            .asteroids
            .iter()
            .position(|a| !a.destroyed && a.body.overlaps(&body))
        {
            state.bullets[b].destroyed = true;
            let asteroid = &mut state.asteroids[a];
            asteroid.health -= 1;
            if asteroid.health <= 0 {
                asteroid.destroyed = true;
                let at = asteroid.body.pos;
                state.cues.push(Cue::Explosion);
                drops::drop_at(state, at, rng);
            }
        }
    }
}

fn missiles_vs_targets(state: &mut GameState, rng: &mut impl Rng) {
    for m in 0..state.missiles.len() {
        if state.missiles[m].destroyed {
            continue;
        }
        let body = state.missiles[m].body;

        if let Some(i) = state
            .enemies
            .iter()
            .position(|e| !e.destroyed && e.body.overlaps(&body))
        {
            state.missiles[m].destroyed = true;
            let enemy = &state.enemies[i];
            let lethal = if enemy.archetype.is_armored() {
                let hits = state.missile_hits.entry(enemy.id).or_insert(0);
                *hits += 1;
                *hits >= ARMORED_MISSILE_HITS
            } else {
                true
            };
            if lethal {
                state.enemies[i].health = 0;
                let at = destroy_enemy(state, i, true);
                state.cues.push(Cue::Explosion);
                drops::drop_at(state, at, rng);
            }
            continue;
        }

        if state.live_boss().is_some_and(|boss| boss.body.overlaps(&body)) {
            state.missiles[m].destroyed = true;
            damage_boss(state, projectile::MISSILE_BOSS_DAMAGE, rng);
            continue;
        }

        if let Some(a) = state
            .asteroids
            .iter()
            .position(|a| !a.destroyed && a.body.overlaps(&body))
        {
            state.missiles[m].destroyed = true;
            let asteroid = &mut state.asteroids[a];
            asteroid.health = 0;
            asteroid.destroyed = true;
            let at = asteroid.body.pos;
            state.cues.push(Cue::Explosion);
            drops::drop_at(state, at, rng);
        }
    }
}

fn damage_boss(state: &mut GameState, amount: i32, rng: &mut impl Rng) {
    let Some(boss) = state.boss.as_mut().filter(|b| !b.destroyed) else {
        return;
    };
    boss.health -= amount;
    if boss.health <= 0 {
        if let Some(at) = boss::defeat(state) {
            drops::drop_at(state, at, rng);
        }
    }
}

fn asteroids_vs_enemies(state: &mut GameState) {
    for a in 0..state.asteroids.len() {
        if state.asteroids[a].destroyed {
            continue;
        }
        let rock = state.asteroids[a].body;
        let mut struck = false;
        for i in 0..state.enemies.len() {
            let enemy = &state.enemies[i];
            if !enemy.destroyed && enemy.body.overlaps(&rock) {
                destroy_enemy(state, i, true);
                state.cues.push(Cue::AsteroidCollision);
                state.cues.push(Cue::Explosion);
                struck = true;
            }
        }
        if struck {
            state.asteroids[a].destroyed = true;
        }
    }
}

fn collect_pickups(state: &mut GameState) {
    let hull = state.player.body;
    for p in 0..state.pickups.len() {
        let pickup = &mut state.pickups[p];
        if pickup.destroyed || !pickup.body.overlaps(&hull) {
            continue;
        }
        pickup.destroyed = true;
        let kind = pickup.kind;
        apply_pickup(state, kind);
    }
}

pub fn apply_pickup(state: &mut GameState, kind: PickupKind) {
    let player = &mut state.player;
    match kind {
        PickupKind::HealthPack => {
            player::heal(player, player::HEALTH_PACK_HEAL);
            state.cues.push(Cue::HealthPackCollect);
            return;
        }
        PickupKind::DoubleShot => player.double_shot_ticks = player::POWER_UP_DURATION,
        PickupKind::Shield => player.shield_ticks = player::POWER_UP_DURATION,
        PickupKind::Missile => player.missile_ticks = player::POWER_UP_DURATION,
        PickupKind::Speed => player.speed_boost_ticks = player::POWER_UP_DURATION,
        PickupKind::Bomb => player.bomb_count = (player.bomb_count + 1).min(player::MAX_BOMBS),
    }
    state.cues.push(Cue::PowerUpCollect);
}

/// Remove the enemy at `index`, crediting its score when `credit` is set.
/// A leech that held the player releases the tether on the spot.
pub(crate) fn destroy_enemy(state: &mut GameState, index: usize, credit: bool) -> Vec2 {
    let enemy = &mut state.enemies[index];
    enemy.destroyed = true;
    let id = enemy.id;
    let at = enemy.body.pos;
    if credit {
        state.score += enemy.score_value;
    }
    state.missile_hits.remove(&id);
    if state.player.tethered_by == Some(id) {
        player::release_tether(&mut state.player);
    }
    at
}
