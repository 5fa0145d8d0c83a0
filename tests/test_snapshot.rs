use star_fighter::compute::*;
use star_fighter::entities::*;
use star_fighter::snapshot::{self, Sprite, TetherLink};

use pretty_assertions::assert_eq;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn make_state() -> GameState {
    let mut s = init_state(3, 0, &mut seeded_rng());
    s.status = GameStatus::Playing;
    s
}

fn sprites(s: &GameState) -> Vec<Sprite> {
    snapshot::draw_list(s).iter().map(|c| c.sprite).collect()
}

// ── draw_list ─────────────────────────────────────────────────────────────────

#[test]
fn empty_field_draws_only_player() {
    let s = make_state();
    let calls = snapshot::draw_list(&s);
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].sprite, Sprite::Player);
    assert_eq!(calls[0].pos, s.player.body.pos);
}

#[test]
fn hidden_player_is_not_drawn() {
    let mut s = make_state();
    s.player.visible = false;
    assert!(snapshot::draw_list(&s).is_empty());
}

#[test]
fn player_is_drawn_last() {
    let mut s = make_state();
    let id = s.alloc_id();
    s.enemies.push(enemy::build_enemy(id, Archetype::Fighter, 1, 100.0, 0.0));
    s.pickups.push(projectile::pickup(PickupKind::Speed, Vec2::new(50.0, 50.0)));
    s.bullets.push(projectile::player_bullet(300.0, 500.0, 10));
    assert_eq!(
        sprites(&s),
        vec![
            Sprite::Pickup(PickupKind::Speed),
            Sprite::Enemy(Archetype::Fighter),
            Sprite::Bullet,
            Sprite::Player,
        ]
    );
}

#[test]
fn beams_and_blasts_get_their_own_sprites() {
    let mut s = make_state();
    s.enemy_bullets.push(projectile::sniper_beam(100.0, 100.0));
    s.enemy_bullets.push(projectile::enemy_bullet(200.0, 100.0));
    let mut shell = projectile::artillery_shell(Vec2::new(100.0, 100.0), Vec2::new(100.0, 400.0));
    projectile::detonate(&mut shell, &mut s.cues);
    s.artillery_shells.push(shell);
    let drawn = sprites(&s);
    assert!(drawn.contains(&Sprite::SniperBeam));
    assert!(drawn.contains(&Sprite::EnemyBullet));
    assert!(drawn.contains(&Sprite::Blast));
    assert!(!drawn.contains(&Sprite::Shell));
}

#[test]
fn muzzle_flash_follows_enemy() {
    let mut s = make_state();
    let id = s.alloc_id();
    let mut e = enemy::build_enemy(id, Archetype::Bomber, 3, 100.0, 0.0);
    e.muzzle_flash = 2;
    s.enemies.push(e);
    let drawn = sprites(&s);
    assert_eq!(drawn[0], Sprite::Enemy(Archetype::Bomber));
    assert_eq!(drawn[1], Sprite::MuzzleFlash);
}

#[test]
fn aiming_sniper_is_dimmed() {
    let mut s = make_state();
    let id = s.alloc_id();
    let mut e = enemy::build_enemy(id, Archetype::Sniper, 4, 100.0, 0.0);
    e.behavior = Behavior::Sniper {
        phase: SniperPhase::Aiming { remaining: 10, flash: 5 },
        dimmed: true,
    };
    s.enemies.push(e);
    assert!(snapshot::draw_list(&s)[0].dimmed);
}

#[test]
fn boss_uses_its_variant() {
    let mut s = make_state();
    s.boss = Some(boss::new_boss(s.alloc_id(), 1, 6));
    assert!(sprites(&s).contains(&Sprite::Boss(6)));
}

// ── tether_links ──────────────────────────────────────────────────────────────

#[test]
fn linked_leech_draws_tether() {
    let mut s = make_state();
    let id = s.alloc_id();
    let mut e = enemy::build_enemy(id, Archetype::Leech, 5, 250.0, 0.0);
    e.body.pos = Vec2::new(250.0, 700.0);
    if let Behavior::Leech(ref mut l) = e.behavior {
        l.tethered_to = Some(PLAYER_ID);
    }
    s.enemies.push(e);
    s.player.tether_ticks = 50;
    s.player.tethered_by = Some(id);

    assert_eq!(
        snapshot::tether_links(&s),
        vec![TetherLink {
            from: Vec2::new(250.0, 700.0),
            to: s.player.body.pos,
        }]
    );

    s.player.tethered_by = None;
    assert!(snapshot::tether_links(&s).is_empty());
}

// ── hud ───────────────────────────────────────────────────────────────────────

#[test]
fn hud_counts_down_whole_seconds() {
    let s = init_state(3, 0, &mut seeded_rng());
    assert_eq!(snapshot::hud(&s).countdown, Some(3));

    let mut s = s;
    s.status = GameStatus::Starting { ticks_left: 61 };
    assert_eq!(snapshot::hud(&s).countdown, Some(2));
    s.status = GameStatus::Playing;
    assert_eq!(snapshot::hud(&s).countdown, None);
}

#[test]
fn hud_reports_boss_health_ratio() {
    let mut s = make_state();
    assert_eq!(snapshot::hud(&s).boss_health, None);
    let mut b = boss::new_boss(s.alloc_id(), 1, 0);
    b.health = 150;
    s.boss = Some(b);
    assert_eq!(snapshot::hud(&s).boss_health, Some(0.4));
}

#[test]
fn hud_mirrors_player_and_progress() {
    let mut s = make_state();
    s.score = 1234;
    s.player.bomb_count = 3;
    s.player.shield_ticks = 120;
    s.bomb_flash = 4;
    let hud = snapshot::hud(&s);
    assert_eq!(hud.score, 1234);
    assert_eq!(hud.bombs, 3);
    assert_eq!(hud.shield_ticks, 120);
    assert_eq!(hud.lives, 3);
    assert_eq!(hud.level, 1);
    assert_eq!(hud.wave, 1);
    assert_eq!(hud.max_waves, 6);
    assert!(hud.bomb_flash);
}
