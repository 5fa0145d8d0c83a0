use star_fighter::compute::director::{self, DirectorAction};
use star_fighter::compute::*;
use star_fighter::entities::*;

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

fn add_enemy(s: &mut GameState, x: f32, y: f32) -> EntityId {
    let id = s.alloc_id();
    let mut e = enemy::build_enemy(id, Archetype::Basic, s.waves.level, x, 0.0);
    e.body.pos = Vec2::new(x, y);
    s.enemies.push(e);
    id
}

// ── Formulas ──────────────────────────────────────────────────────────────────

#[test]
fn waves_per_level_cap_at_ten() {
    assert_eq!(director::max_waves_for(1), 6);
    assert_eq!(director::max_waves_for(3), 8);
    assert_eq!(director::max_waves_for(5), 10);
    assert_eq!(director::max_waves_for(12), 10);
}

#[test]
fn enemies_per_wave_follow_multipliers() {
    let counts: Vec<u32> = (1..=8).map(|w| director::enemies_for_wave(4, w)).collect();
    assert_eq!(counts, vec![2, 3, 4, 5, 6, 7, 8, 8]);
}

#[test]
fn asteroid_cap_by_level() {
    assert_eq!(director::asteroid_cap(1), 0);
    assert_eq!(director::asteroid_cap(2), 5);
    assert_eq!(director::asteroid_cap(7), 6);
    assert_eq!(director::asteroid_cap(9), 8);
    assert_eq!(director::asteroid_cap(20), 8);
}

#[test]
fn counters_for_later_level() {
    let w = director::counters_for_level(3);
    assert_eq!(w.level, 3);
    assert_eq!(w.wave, 1);
    assert_eq!(w.max_waves, 8);
    assert_eq!(w.base_enemies, 6);
    assert_eq!(w.enemies_per_wave, 3);
    assert_eq!(w.max_asteroids, 5);
    assert_eq!(w.transition_delay, None);
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn enemy_spawns_every_thirty_ticks() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..director::SPAWN_DELAY - 1 {
        assert_eq!(director::step(&mut s, &mut rng), None);
    }
    assert_eq!(director::step(&mut s, &mut rng), Some(DirectorAction::SpawnEnemy));
    assert_eq!(s.enemies.len(), 1);
    assert_eq!(s.waves.enemies_spawned, 1);
    assert_eq!(s.waves.spawn_timer, 0);
}

#[test]
fn level_one_never_spawns_asteroids() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    for _ in 0..300 {
        director::step(&mut s, &mut rng);
    }
    assert!(s.asteroids.is_empty());
    assert_eq!(s.waves.asteroid_spawn_timer, 0);
}

#[test]
fn enemy_wins_a_simultaneous_spawn() {
    let mut s = make_state();
    s.waves = director::counters_for_level(2);
    s.waves.spawn_timer = director::SPAWN_DELAY - 1;
    s.waves.asteroid_spawn_timer = director::ASTEROID_SPAWN_DELAY - 1;
    let mut rng = seeded_rng();

    assert_eq!(director::step(&mut s, &mut rng), Some(DirectorAction::SpawnEnemy));
    assert!(s.asteroids.is_empty());
    assert_eq!(director::step(&mut s, &mut rng), Some(DirectorAction::SpawnAsteroid));
    assert_eq!(s.asteroids.len(), 1);
}

#[test]
fn asteroids_stop_at_cap() {
    let mut s = make_state();
    s.waves = director::counters_for_level(2);
    s.waves.enemies_spawned = s.waves.enemies_per_wave;
    add_enemy(&mut s, 300.0, 300.0);
    let mut rng = seeded_rng();
    for _ in 0..2_000 {
        director::step(&mut s, &mut rng);
    }
    assert_eq!(s.asteroids.len(), s.waves.max_asteroids);
}

// ── Wave progression ──────────────────────────────────────────────────────────

#[test]
fn wave_waits_for_last_enemy() {
    let mut s = make_state();
    s.waves.enemies_spawned = 2;
    add_enemy(&mut s, 300.0, 300.0);
    assert_eq!(director::step(&mut s, &mut seeded_rng()), None);
    assert_eq!(s.waves.wave, 1);
}

#[test]
fn wave_advances_once_cleared() {
    let mut s = make_state();
    s.waves.enemies_spawned = 2;
    assert_eq!(director::step(&mut s, &mut seeded_rng()), Some(DirectorAction::AdvanceWave));
    assert_eq!(s.waves.wave, 2);
    assert_eq!(s.waves.enemies_per_wave, 3);
    assert_eq!(s.waves.enemies_spawned, 0);
}

#[test]
fn first_wave_plays_through_to_second() {
    let mut s = make_state();
    let mut rng = seeded_rng();
    let input = PlayerInput::default();
    for _ in 0..200 {
        if s.waves.enemies_spawned == 2 {
            break;
        }
        s = tick(&s, &input, &mut rng);
    }
    assert_eq!(s.waves.enemies_spawned, 2);
    assert_eq!(s.waves.wave, 1);

    s.enemies.clear();
    s = tick(&s, &input, &mut rng);
    assert_eq!(s.waves.wave, 2);
    assert_eq!(s.waves.enemies_per_wave, 3);
}

#[test]
fn live_boss_blocks_wave_advance() {
    let mut s = make_state();
    s.waves.wave = 2;
    s.waves.enemies_spawned = s.waves.enemies_per_wave;
    let id = s.alloc_id();
    s.boss = Some(boss::new_boss(id, 1, 0));
    assert_eq!(director::step(&mut s, &mut seeded_rng()), None);
    assert_eq!(s.waves.wave, 2);
}

// ── Boss & level completion ───────────────────────────────────────────────────

#[test]
fn boss_arrives_on_final_wave() {
    let mut s = make_state();
    s.waves.wave = s.waves.max_waves;
    s.enemy_bullets.push(projectile::enemy_bullet(100.0, 100.0));
    s.bombs.push(projectile::bomb(100.0, 100.0, 0.0));

    assert_eq!(director::step(&mut s, &mut seeded_rng()), Some(DirectorAction::SpawnBoss));
    let b = s.boss.as_ref().expect("boss spawned");
    assert_eq!(b.body.pos, Vec2::new(300.0, boss::ENTRY_Y));
    assert_eq!(b.health, 375);
    assert!(b.variant < BOSS_VARIANTS);
    assert!(s.waves.boss_spawned);
    assert!(s.enemy_bullets.is_empty());
    assert!(s.bombs.is_empty());
}

#[test]
fn boss_waits_for_stragglers() {
    let mut s = make_state();
    s.waves.wave = s.waves.max_waves;
    add_enemy(&mut s, 300.0, 300.0);
    assert_eq!(director::step(&mut s, &mut seeded_rng()), None);
    assert!(s.boss.is_none());
}

#[test]
fn no_enemies_spawn_on_boss_wave() {
    let mut s = make_state();
    s.waves.wave = s.waves.max_waves;
    s.waves.boss_spawned = true;
    let mut rng = seeded_rng();
    for _ in 0..100 {
        director::step(&mut s, &mut rng);
    }
    assert!(s.enemies.is_empty());
}

#[test]
fn level_completes_after_final_wave() {
    let mut s = make_state();
    s.score = 500;
    s.waves.wave = s.waves.max_waves + 1;
    s.player.body.pos = Vec2::new(50.0, 400.0);
    s.player.tether_ticks = 50;
    s.player.tethered_by = Some(9);
    s.bullets.push(projectile::player_bullet(100.0, 100.0, 10));
    s.asteroids.push(Asteroid {
        id: 40,
        body: Body::new(100.0, 100.0, 40.0, 40.0),
        velocity: Vec2::new(0.0, 4.0),
        health: 3,
        destroyed: false,
    });
    let before = s.background;

    assert_eq!(director::step(&mut s, &mut seeded_rng()), Some(DirectorAction::CompleteLevel));
    assert_eq!(s.score, 600);
    assert_eq!(s.waves, director::counters_for_level(2));
    assert_ne!(s.background, before);
    assert!(s.bullets.is_empty());
    assert!(s.asteroids.is_empty());
    assert_eq!(s.player.body.pos, player::spawn_point());
    assert!(!s.player.is_tethered());
    assert!(s.cues.contains(&Cue::LevelComplete));
}

// ── Transition hold ───────────────────────────────────────────────────────────

#[test]
fn transition_hold_gates_director() {
    let mut s = make_state();
    s.waves.transition_delay = Some(5);
    s.waves.spawn_timer = director::SPAWN_DELAY - 1;
    assert_eq!(director::step(&mut s, &mut seeded_rng()), None);
    assert_eq!(s.waves.spawn_timer, director::SPAWN_DELAY - 1);
}

#[test]
fn transition_expiry_fades_and_refreshes_cap() {
    let mut s = make_state();
    s.waves.level = 4;
    s.waves.transition_delay = Some(1);
    director::advance_transition(&mut s);
    assert_eq!(s.waves.transition_delay, None);
    assert_eq!(s.waves.max_asteroids, 5);
    assert!(s.cues.contains(&Cue::TransitionFade));
}

#[test]
fn boss_defeat_leads_to_next_level_after_hold() {
    let mut s = make_state();
    s.waves.wave = s.waves.max_waves;
    s.waves.boss_spawned = true;
    let mut b = boss::new_boss(s.alloc_id(), 1, 0);
    b.body.pos = Vec2::new(300.0, 200.0);
    s.boss = Some(b);
    boss::defeat(&mut s);
    assert_eq!(s.waves.transition_delay, Some(boss::TRANSITION_DELAY));
    sweep(&mut s);

    let mut rng = seeded_rng();
    let input = PlayerInput::default();
    for _ in 0..boss::TRANSITION_DELAY - 1 {
        s = tick(&s, &input, &mut rng);
        assert_eq!(s.waves.level, 1);
    }
    s = tick(&s, &input, &mut rng);
    assert_eq!(s.waves.level, 2);
    assert!(s.cues.contains(&Cue::TransitionFade));
    assert!(s.cues.contains(&Cue::LevelComplete));
}

// ── Backgrounds ───────────────────────────────────────────────────────────────

#[test]
fn reroll_never_repeats_background() {
    let mut rng = seeded_rng();
    for current in 0..BACKGROUND_COUNT {
        for _ in 0..50 {
            let next = director::reroll_background(current, &mut rng);
            assert_ne!(next, current);
            assert!(next < BACKGROUND_COUNT);
        }
    }
}
