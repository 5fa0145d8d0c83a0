/// All game entity types: pure data plus a few geometry helpers.
///
/// Coordinates live in a fixed 600×900 world with y growing downward.
/// Every collection on [`GameState`] owns its entities outright; links
/// between entities (leech tether, missile target) are [`EntityId`]s that
/// the simulation re-validates each tick.

use std::collections::HashMap;

pub const WIDTH: f32 = 600.0;
pub const HEIGHT: f32 = 900.0;

/// Number of interchangeable background images the renderer may pick from.
pub const BACKGROUND_COUNT: usize = 10;
/// Number of boss sprite variants.
pub const BOSS_VARIANTS: u8 = 8;

pub type EntityId = u32;

/// The player always carries this id; spawned entities start at 1.
pub const PLAYER_ID: EntityId = 0;

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Vec2) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Axis-aligned bounding box stored as a centre and half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub half: Vec2,
}

impl Body {
    /// Build a body centred on `(x, y)` with full size `w × h`.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            half: Vec2::new(w / 2.0, h / 2.0),
        }
    }

    pub fn left(&self) -> f32 {
        self.pos.x - self.half.x
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.half.x
    }

    pub fn top(&self) -> f32 {
        self.pos.y - self.half.y
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.half.y
    }

    /// Boxes that merely share an edge do not overlap.
    pub fn overlaps(&self, other: &Body) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Fully outside the screen on any side.
    pub fn off_screen(&self) -> bool {
        self.top() > HEIGHT || self.bottom() < 0.0 || self.left() > WIDTH || self.right() < 0.0
    }

    /// Clamp horizontally so the box stays within `[min_left, max_right]`.
    pub fn clamp_x(&mut self, min_left: f32, max_right: f32) {
        if self.left() < min_left {
            self.pos.x = min_left + self.half.x;
        }
        if self.right() > max_right {
            self.pos.x = max_right - self.half.x;
        }
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

/// Unlock levels whose archetypes take two missile hits instead of one.
pub const ARMORED_UNLOCK_LEVELS: [u32; 3] = [3, 6, 7];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Archetype {
    /// Fast, unarmed, straight descent.
    Basic,
    /// Fires a single forward bullet.
    Fighter,
    /// Drops a single bomb straight down.
    Tank,
    /// Drops a three-way bomb spread.
    Bomber,
    /// Aims, recoils and fires a long vertical beam.
    Sniper,
    /// Tethers the player, halving their speed.
    Leech,
    /// Stationary; lobs shells that explode in place.
    Artillery,
}

impl Archetype {
    pub const ALL: [Archetype; 7] = [
        Archetype::Basic,
        Archetype::Fighter,
        Archetype::Tank,
        Archetype::Bomber,
        Archetype::Sniper,
        Archetype::Leech,
        Archetype::Artillery,
    ];

    pub const fn unlock_level(self) -> u32 {
        match self {
            Archetype::Basic | Archetype::Fighter => 1,
            Archetype::Tank => 2,
            Archetype::Bomber => 3,
            Archetype::Sniper => 4,
            Archetype::Leech => 5,
            Archetype::Artillery => 6,
        }
    }

    /// Inclusive descent speed range before the level bonus.
    pub const fn speed_range(self) -> (u32, u32) {
        match self {
            Archetype::Basic => (4, 7),
            Archetype::Fighter => (2, 5),
            Archetype::Tank | Archetype::Bomber => (1, 3),
            Archetype::Sniper => (2, 4),
            Archetype::Leech => (3, 6),
            Archetype::Artillery => (0, 0),
        }
    }

    pub const fn base_health(self) -> i32 {
        match self {
            Archetype::Basic => 10,
            Archetype::Fighter | Archetype::Sniper | Archetype::Leech => 20,
            Archetype::Tank => 30,
            Archetype::Bomber => 40,
            Archetype::Artillery => 50,
        }
    }

    pub const fn score_value(self) -> u32 {
        match self {
            Archetype::Basic | Archetype::Fighter => 10,
            Archetype::Bomber | Archetype::Sniper | Archetype::Leech => 15,
            Archetype::Tank | Archetype::Artillery => 20,
        }
    }

    /// Ticks between shots (or tether attempts for the leech).
    pub const fn fire_delay(self) -> Option<u32> {
        match self {
            Archetype::Basic => None,
            Archetype::Fighter | Archetype::Tank | Archetype::Leech => Some(120),
            Archetype::Sniper => Some(150),
            Archetype::Bomber => Some(180),
            Archetype::Artillery => Some(300),
        }
    }

    pub fn is_armored(self) -> bool {
        ARMORED_UNLOCK_LEVELS.contains(&self.unlock_level())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SniperPhase {
    Idle,
    Aiming { remaining: u32, flash: u32 },
    Recoil { step: u32 },
    Pause { remaining: u32 },
    Cooldown { remaining: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeechState {
    /// Entity currently held by the tether, if any.
    pub tethered_to: Option<EntityId>,
    pub attach_cue_played: bool,
    pub pulse: u32,
    pub pulse_scale: f32,
}

/// Archetype-specific state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Behavior {
    Straight,
    Sniper { phase: SniperPhase, dimmed: bool },
    Leech(LeechState),
    Artillery,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EntityId,
    pub archetype: Archetype,
    pub body: Body,
    pub health: i32,
    pub base_speed: f32,
    pub speed: f32,
    pub score_value: u32,
    pub fire_timer: u32,
    pub fire_delay: u32,
    /// Index into the shared sine table, wraps at 360.
    pub sine_phase: usize,
    pub muzzle_flash: u32,
    pub behavior: Behavior,
    pub destroyed: bool,
}

impl Enemy {
    /// The id this leech currently tethers, if it is a linked leech.
    pub fn tether_target(&self) -> Option<EntityId> {
        match self.behavior {
            Behavior::Leech(LeechState { tethered_to, .. }) => tethered_to,
            _ => None,
        }
    }
}

// ── Boss ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BossPhase {
    One,
    Two,
    Three,
}

impl BossPhase {
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio > 0.66 {
            BossPhase::One
        } else if ratio > 0.33 {
            BossPhase::Two
        } else {
            BossPhase::Three
        }
    }

    pub const fn number(self) -> u8 {
        match self {
            BossPhase::One => 1,
            BossPhase::Two => 2,
            BossPhase::Three => 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub id: EntityId,
    pub body: Body,
    pub health: i32,
    pub max_health: i32,
    /// +1 moving right, -1 moving left.
    pub direction: f32,
    pub fire_timer: u32,
    pub bomb_timer: u32,
    /// Last derived phase; only used to notice phase changes.
    pub phase: BossPhase,
    pub variant: u8,
    pub destroyed: bool,
}

impl Boss {
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health.max(0) as f32 / self.max_health as f32
    }

    pub fn current_phase(&self) -> BossPhase {
        BossPhase::from_ratio(self.health_ratio())
    }
}

// ── Projectiles & hazards ─────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Bullet {
    pub body: Body,
    pub damage: i32,
    pub destroyed: bool,
}

/// What a homing missile is chasing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetRef {
    Enemy(EntityId),
    Boss(EntityId),
    Asteroid(EntityId),
}

#[derive(Clone, Debug)]
pub struct Missile {
    pub body: Body,
    pub target: Option<TargetRef>,
    pub destroyed: bool,
}

#[derive(Clone, Debug)]
pub struct BossBullet {
    pub body: Body,
    pub velocity: Vec2,
    pub destroyed: bool,
}

#[derive(Clone, Debug)]
pub struct EnemyBullet {
    pub body: Body,
    pub velocity: Vec2,
    pub damage: i32,
    /// Sniper beam rather than a plain bullet.
    pub beam: bool,
    pub destroyed: bool,
}

#[derive(Clone, Debug)]
pub struct Bomb {
    pub body: Body,
    pub velocity: Vec2,
    pub damage: i32,
    pub destroyed: bool,
}

#[derive(Clone, Debug)]
pub struct Asteroid {
    pub id: EntityId,
    pub body: Body,
    pub velocity: Vec2,
    pub health: i32,
    pub destroyed: bool,
}

#[derive(Clone, Debug)]
pub struct ArtilleryShell {
    pub body: Body,
    pub velocity: Vec2,
    pub origin: Vec2,
    pub exploded: bool,
    /// Remaining blast ticks once exploded.
    pub explosion_ticks: u32,
    pub destroyed: bool,
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickupKind {
    /// Restores 25 health.
    HealthPack,
    /// Two parallel bullets per shot.
    DoubleShot,
    /// Full damage immunity.
    Shield,
    /// Enables homing missiles.
    Missile,
    /// ×1.5 movement speed.
    Speed,
    /// One screen-clearing bomb charge.
    Bomb,
}

#[derive(Clone, Debug)]
pub struct Pickup {
    pub kind: PickupKind,
    pub body: Body,
    pub destroyed: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub body: Body,
    pub health: i32,
    pub lives: u32,
    pub shield_ticks: u32,
    pub double_shot_ticks: u32,
    pub missile_ticks: u32,
    pub speed_boost_ticks: u32,
    pub invincible_ticks: u32,
    pub blink_ticks: u32,
    pub visible: bool,
    pub tether_ticks: u32,
    /// Leech holding the current tether.
    pub tethered_by: Option<EntityId>,
    pub bomb_count: u32,
    pub bomb_cooldown: u32,
    /// Ticks the fire key has been held since the last automatic shot.
    pub fire_hold_ticks: u32,
    pub missile_hold_ticks: u32,
}

impl Player {
    pub fn is_shielded(&self) -> bool {
        self.shield_ticks > 0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    pub fn is_tethered(&self) -> bool {
        self.tether_ticks > 0
    }

    pub fn has_double_shot(&self) -> bool {
        self.double_shot_ticks > 0
    }

    pub fn has_missiles(&self) -> bool {
        self.missile_ticks > 0
    }

    pub fn has_speed_boost(&self) -> bool {
        self.speed_boost_ticks > 0
    }

    /// Neither shielded nor in the respawn grace period.
    pub fn is_vulnerable(&self) -> bool {
        !self.is_shielded() && !self.is_invincible()
    }
}

// ── Input & cues ──────────────────────────────────────────────────────────────

/// Held-key state for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// Fire key went down this tick.
    pub fire_tap: bool,
    pub missile: bool,
    pub bomb: bool,
}

/// Fire-and-forget audio events produced by a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    Shoot,
    MissileShot,
    Explosion,
    AsteroidCollision,
    BombExplosion,
    PlayerExplosion,
    BossExplosion,
    BossShoot,
    BossPhase(u8),
    EnemyBomb,
    SniperLaser,
    FighterShoot,
    LeechTether,
    ArtilleryShot,
    PowerUpCollect,
    HealthPackCollect,
    PlayerCollision,
    LevelComplete,
    TransitionFade,
    GameOver,
}

// ── Progression ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct WaveCounters {
    pub level: u32,
    pub wave: u32,
    pub max_waves: u32,
    pub base_enemies: u32,
    pub enemies_per_wave: u32,
    pub enemies_spawned: u32,
    pub boss_spawned: bool,
    pub spawn_timer: u32,
    pub asteroid_spawn_timer: u32,
    pub max_asteroids: usize,
    /// Remaining ticks of the post-boss hold, if one is running.
    pub transition_delay: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Get-ready countdown before the first tick simulates.
    Starting { ticks_left: u32 },
    Playing,
    GameOver,
}

// ── Master game state ─────────────────────────────────────────────────────────

/// The entire simulation state.  Cloneable so the tick function can return
/// a new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct GameState {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub bullets: Vec<Bullet>,
    pub missiles: Vec<Missile>,
    pub boss_bullets: Vec<BossBullet>,
    pub enemy_bullets: Vec<EnemyBullet>,
    pub bombs: Vec<Bomb>,
    pub artillery_shells: Vec<ArtilleryShell>,
    pub asteroids: Vec<Asteroid>,
    pub pickups: Vec<Pickup>,
    pub waves: WaveCounters,
    pub score: u32,
    /// Best score on record when this game started, raised live.
    pub high_score: u32,
    pub status: GameStatus,
    pub frame: u64,
    pub background: usize,
    /// Remaining ticks of the white bomb flash.
    pub bomb_flash: u32,
    /// Missile hits landed on armored enemies, keyed by enemy id.
    pub missile_hits: HashMap<EntityId, u32>,
    /// Cues emitted by the most recent tick.
    pub cues: Vec<Cue>,
    pub next_id: EntityId,
}

impl GameState {
    pub fn alloc_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id && !e.destroyed)
    }

    pub fn asteroid(&self, id: EntityId) -> Option<&Asteroid> {
        self.asteroids.iter().find(|a| a.id == id && !a.destroyed)
    }

    pub fn live_boss(&self) -> Option<&Boss> {
        self.boss.as_ref().filter(|b| !b.destroyed)
    }
}
