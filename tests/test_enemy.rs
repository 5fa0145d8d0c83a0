use star_fighter::compute::*;
use star_fighter::entities::*;

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

fn add_enemy(s: &mut GameState, archetype: Archetype, x: f32, y: f32, speed: f32) -> EntityId {
    let id = s.alloc_id();
    let mut e = enemy::build_enemy(id, archetype, s.waves.level, x, speed);
    e.body.pos = Vec2::new(x, y);
    s.enemies.push(e);
    id
}

fn sniper_phase(s: &GameState) -> SniperPhase {
    match s.enemies[0].behavior {
        Behavior::Sniper { phase, .. } => phase,
        other => panic!("not a sniper: {other:?}"),
    }
}

fn sniper_dimmed(s: &GameState) -> bool {
    matches!(s.enemies[0].behavior, Behavior::Sniper { dimmed: true, .. })
}

// ── Spawn rolls ───────────────────────────────────────────────────────────────

#[test]
fn level_one_rolls_basic_or_fighter() {
    assert_eq!(enemy::choose_archetype(1, 0.0), Archetype::Basic);
    assert_eq!(enemy::choose_archetype(1, 0.49), Archetype::Basic);
    assert_eq!(enemy::choose_archetype(1, 0.5), Archetype::Fighter);
    assert_eq!(enemy::choose_archetype(1, 0.999), Archetype::Fighter);
}

#[test]
fn pool_grows_with_level() {
    assert_eq!(enemy::eligible_archetypes(1).len(), 2);
    assert_eq!(enemy::eligible_archetypes(4).len(), 5);
    assert_eq!(enemy::eligible_archetypes(6).len(), 7);
    assert_eq!(enemy::eligible_archetypes(0), vec![Archetype::Basic, Archetype::Fighter]);
}

#[test]
fn top_of_range_picks_last_unlocked() {
    assert_eq!(enemy::choose_archetype(6, 0.9999), Archetype::Artillery);
}

#[test]
fn health_scales_ten_percent_per_level() {
    assert_eq!(enemy::scaled_health(Archetype::Basic, 1), 10);
    assert_eq!(enemy::scaled_health(Archetype::Basic, 5), 14);
    assert_eq!(enemy::scaled_health(Archetype::Bomber, 3), 40);
    assert_eq!(enemy::scaled_health(Archetype::Artillery, 10), 70);
}

#[test]
fn spawned_enemy_fits_level_one() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..50 {
        enemy::spawn_enemy(&mut s, &mut rng);
    }
    for e in &s.enemies {
        assert!(matches!(e.archetype, Archetype::Basic | Archetype::Fighter));
        assert!((20.0..=580.0).contains(&e.body.pos.x));
        assert_eq!(e.body.pos.y, enemy::SPAWN_Y);
        let (lo, hi) = e.archetype.speed_range();
        assert!((lo as f32..=hi as f32).contains(&e.base_speed));
    }
}

#[test]
fn artillery_sits_still_below_top() {
    let mut s = make_state();
    s.waves.level = 6;
    let mut rng = seeded_rng();
    for _ in 0..300 {
        enemy::spawn_enemy(&mut s, &mut rng);
    }
    let artillery: Vec<&Enemy> = s
        .enemies
        .iter()
        .filter(|e| e.archetype == Archetype::Artillery)
        .collect();
    assert!(!artillery.is_empty());
    for e in artillery {
        assert_eq!(e.base_speed, 0.0);
        assert_eq!(e.body.pos.y, enemy::ARTILLERY_SPAWN_Y);
    }
}

#[test]
fn sine_table_wraps() {
    assert_eq!(enemy::sine_offset(0), 0.0);
    assert_eq!(enemy::sine_offset(360), enemy::sine_offset(0));
    assert_eq!(enemy::sine_offset(361), enemy::sine_offset(1));
}

// ── Movement & despawn ────────────────────────────────────────────────────────

#[test]
fn straight_enemy_descends_at_speed() {
    let mut s = make_state();
    add_enemy(&mut s, Archetype::Basic, 300.0, 100.0, 5.0);
    enemy::update_all(&mut s);
    assert_eq!(s.enemies[0].body.pos, Vec2::new(300.0, 105.0));
}

#[test]
fn far_off_screen_enemy_is_frozen() {
    let mut s = make_state();
    add_enemy(&mut s, Archetype::Basic, 300.0, -200.0, 5.0);
    enemy::update_all(&mut s);
    assert_eq!(s.enemies[0].body.pos.y, -200.0);
    assert!(!s.enemies[0].destroyed);
}

#[test]
fn enemy_past_bottom_despawns() {
    let mut s = make_state();
    add_enemy(&mut s, Archetype::Basic, 300.0, 1000.0, 5.0);
    enemy::update_all(&mut s);
    assert!(s.enemies[0].destroyed);
}

#[test]
fn artillery_never_despawns() {
    let mut s = make_state();
    add_enemy(&mut s, Archetype::Artillery, 300.0, 1000.0, 0.0);
    enemy::update_all(&mut s);
    assert!(!s.enemies[0].destroyed);
}

// ── Firing ────────────────────────────────────────────────────────────────────

#[test]
fn basic_never_fires() {
    let mut s = make_state();
    add_enemy(&mut s, Archetype::Basic, 300.0, 300.0, 0.0);
    for _ in 0..500 {
        enemy::update_all(&mut s);
    }
    assert!(s.enemy_bullets.is_empty());
    assert!(s.bombs.is_empty());
}

#[test]
fn fighter_fires_straight_down() {
    let mut s = make_state();
    add_enemy(&mut s, Archetype::Fighter, 300.0, 300.0, 0.0);
    s.enemies[0].fire_timer = 119;
    enemy::update_all(&mut s);
    assert_eq!(s.enemy_bullets.len(), 1);
    assert_eq!(s.enemy_bullets[0].velocity, Vec2::new(0.0, projectile::ENEMY_BULLET_SPEED));
    assert_eq!(s.enemies[0].fire_timer, 0);
    assert!(s.cues.contains(&Cue::FighterShoot));
}

#[test]
fn tank_drops_single_bomb() {
    let mut s = make_state();
    s.waves.level = 2;
    add_enemy(&mut s, Archetype::Tank, 300.0, 300.0, 0.0);
    s.enemies[0].fire_timer = 119;
    enemy::update_all(&mut s);
    assert_eq!(s.bombs.len(), 1);
    assert_eq!(s.bombs[0].velocity.x, 0.0);
    assert!(s.cues.contains(&Cue::EnemyBomb));
}

#[test]
fn bomber_drops_three_way_spread() {
    let mut s = make_state();
    s.waves.level = 3;
    add_enemy(&mut s, Archetype::Bomber, 300.0, 300.0, 0.0);
    s.enemies[0].fire_timer = 179;
    enemy::update_all(&mut s);
    assert_eq!(s.bombs.len(), 3);
    assert!(s.bombs[0].velocity.x < 0.0);
    assert_eq!(s.bombs[1].velocity.x, 0.0);
    assert!(s.bombs[2].velocity.x > 0.0);
    assert!(s.bombs.iter().all(|b| b.velocity.y > 0.0));
    assert_eq!(s.enemies[0].muzzle_flash, 2);
}

#[test]
fn artillery_lobs_shell_at_player() {
    let mut s = make_state();
    s.waves.level = 6;
    add_enemy(&mut s, Archetype::Artillery, 300.0, 100.0, 0.0);
    s.enemies[0].fire_timer = 299;
    enemy::update_all(&mut s);
    assert_eq!(s.artillery_shells.len(), 1);
    let shell = &s.artillery_shells[0];
    assert!(shell.velocity.y > 0.0);
    assert!(shell.velocity.x.abs() < 1e-3);
    assert!(s.cues.contains(&Cue::ArtilleryShot));
}

// ── Sniper ────────────────────────────────────────────────────────────────────

#[test]
fn sniper_aims_recoils_then_fires_beam() {
    let mut s = make_state();
    s.waves.level = 4;
    add_enemy(&mut s, Archetype::Sniper, 300.0, 300.0, 2.0);
    s.enemies[0].fire_timer = 149;

    enemy::update_all(&mut s);
    assert_eq!(sniper_phase(&s), SniperPhase::Aiming { remaining: 30, flash: 0 });
    let aimed_from = s.enemies[0].body.pos.y;

    for _ in 0..5 {
        enemy::update_all(&mut s);
    }
    assert!(sniper_dimmed(&s));
    assert_eq!(s.enemies[0].body.pos.y, aimed_from);

    for _ in 0..30 {
        enemy::update_all(&mut s);
    }
    assert!(s.enemy_bullets.is_empty());
    assert_eq!(s.enemies[0].body.pos.y, aimed_from - 80.0);

    enemy::update_all(&mut s);
    assert_eq!(s.enemy_bullets.len(), 1);
    let beam = &s.enemy_bullets[0];
    assert!(beam.beam);
    assert_eq!(beam.damage, projectile::SNIPER_BEAM_DAMAGE);
    assert!(s.cues.contains(&Cue::SniperLaser));
    assert_eq!(sniper_phase(&s), SniperPhase::Cooldown { remaining: 30 });
    assert!(!sniper_dimmed(&s));
}

#[test]
fn sniper_returns_to_idle_after_cooldown() {
    let mut s = make_state();
    s.waves.level = 4;
    add_enemy(&mut s, Archetype::Sniper, 300.0, 300.0, 2.0);
    if let Behavior::Sniper { ref mut phase, .. } = s.enemies[0].behavior {
        *phase = SniperPhase::Cooldown { remaining: 2 };
    }
    enemy::update_all(&mut s);
    assert_eq!(s.enemies[0].body.pos.y, 300.0);
    enemy::update_all(&mut s);
    assert_eq!(sniper_phase(&s), SniperPhase::Idle);
    assert_eq!(s.enemies[0].body.pos.y, 302.0);
}

// ── Leech ─────────────────────────────────────────────────────────────────────

#[test]
fn leech_tethers_player_in_range() {
    let mut s = make_state();
    s.waves.level = 5;
    let id = add_enemy(&mut s, Archetype::Leech, 300.0, 700.0, 0.0);
    s.enemies[0].fire_timer = 119;
    enemy::update_all(&mut s);
    assert_eq!(s.player.tether_ticks, player::TETHER_DURATION);
    assert_eq!(s.player.tethered_by, Some(id));
    assert_eq!(s.enemies[0].tether_target(), Some(PLAYER_ID));
    assert!(s.cues.contains(&Cue::LeechTether));
}

#[test]
fn leech_attach_cue_plays_once() {
    let mut s = make_state();
    s.waves.level = 5;
    add_enemy(&mut s, Archetype::Leech, 300.0, 700.0, 0.0);
    s.enemies[0].fire_timer = 119;
    enemy::update_all(&mut s);

    player::release_tether(&mut s.player);
    s.cues.clear();
    s.enemies[0].fire_timer = 119;
    enemy::update_all(&mut s);
    assert!(s.player.is_tethered());
    assert!(!s.cues.contains(&Cue::LeechTether));
}

#[test]
fn leech_out_of_range_waits() {
    let mut s = make_state();
    s.waves.level = 5;
    add_enemy(&mut s, Archetype::Leech, 300.0, 100.0, 0.0);
    s.enemies[0].fire_timer = 119;
    enemy::update_all(&mut s);
    assert!(!s.player.is_tethered());
    assert_eq!(s.enemies[0].fire_timer, 120);
}

#[test]
fn second_leech_cannot_steal_tether() {
    let mut s = make_state();
    s.waves.level = 5;
    let first = add_enemy(&mut s, Archetype::Leech, 280.0, 700.0, 0.0);
    add_enemy(&mut s, Archetype::Leech, 320.0, 700.0, 0.0);
    s.enemies[0].fire_timer = 119;
    s.enemies[1].fire_timer = 119;
    enemy::update_all(&mut s);
    assert_eq!(s.player.tethered_by, Some(first));
    assert_eq!(s.enemies[1].tether_target(), None);
}

#[test]
fn leech_lets_go_when_tether_expires() {
    let mut s = make_state();
    s.waves.level = 5;
    add_enemy(&mut s, Archetype::Leech, 300.0, 300.0, 0.0);
    if let Behavior::Leech(ref mut l) = s.enemies[0].behavior {
        l.tethered_to = Some(PLAYER_ID);
    }
    enemy::update_all(&mut s);
    assert_eq!(s.enemies[0].tether_target(), None);
}

#[test]
fn leech_leaving_screen_releases_player() {
    let mut s = make_state();
    s.waves.level = 5;
    let id = add_enemy(&mut s, Archetype::Leech, 300.0, 1000.0, 0.0);
    s.player.tether_ticks = 100;
    s.player.tethered_by = Some(id);
    enemy::update_all(&mut s);
    assert!(s.enemies[0].destroyed);
    assert!(!s.player.is_tethered());
}

#[test]
fn leech_pulses() {
    let mut s = make_state();
    s.waves.level = 5;
    add_enemy(&mut s, Archetype::Leech, 300.0, 300.0, 0.0);
    enemy::update_all(&mut s);
    let Behavior::Leech(l) = s.enemies[0].behavior else {
        panic!("not a leech");
    };
    assert_eq!(l.pulse, 1);
    assert!(l.pulse_scale > 1.0 && l.pulse_scale <= 1.05);
}
