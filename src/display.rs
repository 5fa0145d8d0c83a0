/// Rendering layer.  All terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// game state.  No game logic is performed; this module only translates
/// snapshots into terminal commands.  The 600×900 world is squeezed onto
/// whatever grid the terminal offers.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use star_fighter::entities::{Archetype, GameState, GameStatus, PickupKind, Vec2, HEIGHT, WIDTH};
use star_fighter::highscore::HighScoreTable;
use star_fighter::snapshot::{self, DrawCall, Hud, Sprite};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_FLASH: Color = Color::White;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HEALTH_OK: Color = Color::Green;
const C_HEALTH_LOW: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_BOSS: Color = Color::Red;
const C_BULLET_PLAYER: Color = Color::Cyan;
const C_MISSILE: Color = Color::Yellow;
const C_BULLET_HOSTILE: Color = Color::Magenta;
const C_BEAM: Color = Color::Red;
const C_BOMB: Color = Color::DarkYellow;
const C_ASTEROID: Color = Color::Grey;
const C_TETHER: Color = Color::Magenta;
const C_DIMMED: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;
const C_POWERUP_ACTIVE: Color = Color::Yellow;

/// Front-end toggles drawn on top of the game.
#[derive(Clone, Copy, Debug, Default)]
pub struct Overlay {
    pub paused: bool,
    pub fps: Option<f32>,
    pub debug: bool,
}

// ── World → grid mapping ──────────────────────────────────────────────────────

/// The bordered play field: rows 2..h-2, columns 1..w-1.
#[derive(Clone, Copy, Debug)]
struct Field {
    left: u16,
    top: u16,
    cols: u16,
    rows: u16,
}

impl Field {
    fn for_terminal(width: u16, height: u16) -> Self {
        Field {
            left: 1,
            top: 2,
            cols: width.saturating_sub(2).max(1),
            rows: height.saturating_sub(4).max(1),
        }
    }

    /// Grid cell for a world point, or `None` when it is off the field.
    fn cell(&self, p: Vec2) -> Option<(u16, u16)> {
        if !(0.0..WIDTH).contains(&p.x) || !(0.0..HEIGHT).contains(&p.y) {
            return None;
        }
        let col = (p.x / WIDTH * self.cols as f32) as u16;
        let row = (p.y / HEIGHT * self.rows as f32) as u16;
        Some((self.left + col, self.top + row))
    }

    fn rows_for(&self, world_height: f32) -> u16 {
        ((world_height / HEIGHT * self.rows as f32).round() as u16).max(1)
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &GameState, overlay: &Overlay) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    let field = Field::for_terminal(width, height);
    let hud = snapshot::hud(state);

    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height, hud.bomb_flash)?;
    draw_hud(out, &hud, width)?;
    draw_status_bar(out, &hud, height)?;

    for link in snapshot::tether_links(state) {
        draw_tether(out, &field, link.from, link.to)?;
    }
    for call in snapshot::draw_list(state) {
        draw_sprite(out, &field, &call)?;
    }
    if let Some(ratio) = hud.boss_health {
        draw_boss_bar(out, ratio, width)?;
    }

    if let Some(secs) = hud.countdown {
        let line = format!("GET READY  {secs}");
        draw_centered(out, width, height, &[(line.as_str(), Color::Yellow)])?;
    }
    if overlay.paused {
        draw_pause(out, width, height)?;
    }
    if let Some(fps) = overlay.fps {
        out.queue(cursor::MoveTo(width.saturating_sub(12), 2))?;
        out.queue(style::SetForegroundColor(C_HINT))?;
        out.queue(Print(format!("FPS {fps:>5.1}")))?;
    }
    if overlay.debug {
        draw_debug(out, state)?;
    }
    if state.status == GameStatus::GameOver {
        let score_line = format!("Final Score: {:>6}", state.score);
        draw_centered(
            out,
            width,
            height,
            &[
                ("╔════════════════════╗", Color::Red),
                ("║    GAME  OVER      ║", Color::Red),
                ("╚════════════════════╝", Color::Red),
                (score_line.as_str(), Color::Yellow),
            ],
        )?;
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, w: u16, h: u16, flash: bool) -> std::io::Result<()> {
    let inner = (w as usize).saturating_sub(2);
    out.queue(style::SetForegroundColor(if flash { C_FLASH } else { C_BORDER }))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(inner))))?;
    out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(inner))))?;

    for row in 2..h.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(w.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    // A bomb whites out the whole field for its flash.
    if flash {
        let fill = "░".repeat(inner);
        for row in 2..h.saturating_sub(2) {
            out.queue(cursor::MoveTo(1, row))?;
            out.queue(Print(&fill))?;
        }
    }
    Ok(())
}

// ── HUD (row 0 and last row) ──────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, hud: &Hud, width: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(format!("Score:{:>7}  Hi:{:>7}", hud.score, hud.high_score)))?;

    let level_str = format!("[ LEVEL {}  WAVE {}/{} ]", hud.level, hud.wave.min(hud.max_waves), hud.max_waves);
    let lx = (width / 2).saturating_sub(level_str.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(lx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LEVEL))?;
    out.queue(Print(&level_str))?;

    let lives_str = format!("Lives:{}", "♥".repeat(hud.lives as usize));
    let rx = width.saturating_sub(lives_str.chars().count() as u16 + 1);
    out.queue(cursor::MoveTo(rx, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(&lives_str))?;
    Ok(())
}

/// Health bar, active power-ups and bomb charges along the bottom row.
fn draw_status_bar<W: Write>(out: &mut W, hud: &Hud, height: u16) -> std::io::Result<()> {
    let row = height.saturating_sub(1);
    out.queue(cursor::MoveTo(1, row))?;

    let filled = (hud.health.clamp(0, 100) / 10) as usize;
    let health_color = if hud.health > 30 { C_HEALTH_OK } else { C_HEALTH_LOW };
    out.queue(style::SetForegroundColor(health_color))?;
    out.queue(Print(format!(
        "HP {}{} {:>3} ",
        "█".repeat(filled),
        "·".repeat(10 - filled),
        hud.health
    )))?;

    let timers = [
        ("SHIELD", hud.shield_ticks),
        ("DOUBLE", hud.double_shot_ticks),
        ("MISSILE", hud.missile_ticks),
        ("SPEED", hud.speed_boost_ticks),
    ];
    out.queue(style::SetForegroundColor(C_POWERUP_ACTIVE))?;
    for (label, ticks) in timers.iter().filter(|(_, t)| *t > 0) {
        out.queue(Print(format!("[{label} {:>2}s] ", ticks / 60 + 1)))?;
    }
    if hud.tether_ticks > 0 {
        out.queue(style::SetForegroundColor(C_TETHER))?;
        out.queue(Print("[TETHERED] "))?;
    }
    out.queue(style::SetForegroundColor(C_BOMB))?;
    out.queue(Print(format!("Bombs:{}", hud.bombs)))?;
    Ok(())
}

fn draw_boss_bar<W: Write>(out: &mut W, ratio: f32, width: u16) -> std::io::Result<()> {
    let span = width.saturating_sub(10).min(40) as usize;
    let filled = ((ratio.clamp(0.0, 1.0) * span as f32).round() as usize).min(span);
    let bar = format!("BOSS {}{}", "█".repeat(filled), "░".repeat(span - filled));
    let x = (width / 2).saturating_sub(bar.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(x, 2))?;
    out.queue(style::SetForegroundColor(C_BOSS))?;
    out.queue(Print(bar))?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

/// Glyph rows for a sprite, centred on its cell.
fn glyph_rows(call: &DrawCall) -> &'static [&'static str] {
    match call.sprite {
        Sprite::Player => &["▲", "/█\\"],
        Sprite::Enemy(Archetype::Basic) => &["«▼»"],
        Sprite::Enemy(Archetype::Fighter) => &["«▼»", "╚═╝"],
        Sprite::Enemy(Archetype::Tank) => &["[█]", "╚═╝"],
        Sprite::Enemy(Archetype::Bomber) => &["<◆>", "╰┬╯"],
        Sprite::Enemy(Archetype::Sniper) => &["-◎-", " ┃ "],
        Sprite::Enemy(Archetype::Leech) if call.scale > 1.025 => &["{§}"],
        Sprite::Enemy(Archetype::Leech) => &["(§)"],
        Sprite::Enemy(Archetype::Artillery) => &["▄█▄", "███"],
        Sprite::Boss(_) => &["╔═▼═▼═╗", "╚╦═◎═╦╝", " ▼   ▼ "],
        Sprite::Bullet => &["║"],
        Sprite::Missile => &["↑"],
        Sprite::BossBullet => &["●"],
        Sprite::EnemyBullet => &["↓"],
        Sprite::SniperBeam => &["┃"],
        Sprite::Bomb => &["o"],
        Sprite::Shell => &["•"],
        Sprite::Blast => &["✺✺✺"],
        Sprite::Asteroid => &["@"],
        Sprite::MuzzleFlash => &["*"],
        Sprite::Pickup(PickupKind::HealthPack) => &["+"],
        Sprite::Pickup(PickupKind::DoubleShot) => &["D"],
        Sprite::Pickup(PickupKind::Shield) => &["S"],
        Sprite::Pickup(PickupKind::Missile) => &["M"],
        Sprite::Pickup(PickupKind::Speed) => &[">"],
        Sprite::Pickup(PickupKind::Bomb) => &["B"],
    }
}

fn glyph_color(sprite: Sprite) -> Color {
    match sprite {
        Sprite::Player => C_PLAYER,
        Sprite::Enemy(Archetype::Basic | Archetype::Fighter) => Color::Green,
        Sprite::Enemy(Archetype::Tank) => Color::DarkGreen,
        Sprite::Enemy(Archetype::Bomber | Archetype::Leech) => Color::Magenta,
        Sprite::Enemy(Archetype::Sniper) => Color::Red,
        Sprite::Enemy(Archetype::Artillery) => Color::DarkYellow,
        Sprite::Boss(_) => C_BOSS,
        Sprite::Bullet => C_BULLET_PLAYER,
        Sprite::Missile => C_MISSILE,
        Sprite::BossBullet | Sprite::EnemyBullet => C_BULLET_HOSTILE,
        Sprite::SniperBeam | Sprite::Blast => C_BEAM,
        Sprite::Bomb | Sprite::Shell => C_BOMB,
        Sprite::Asteroid => C_ASTEROID,
        Sprite::MuzzleFlash => Color::Yellow,
        Sprite::Pickup(PickupKind::HealthPack) => Color::Green,
        Sprite::Pickup(PickupKind::DoubleShot | PickupKind::Missile) => Color::Yellow,
        Sprite::Pickup(PickupKind::Shield) => Color::Cyan,
        Sprite::Pickup(PickupKind::Speed) => Color::Blue,
        Sprite::Pickup(PickupKind::Bomb) => Color::DarkYellow,
    }
}

fn draw_sprite<W: Write>(out: &mut W, field: &Field, call: &DrawCall) -> std::io::Result<()> {
    let Some((col, row)) = field.cell(call.pos) else {
        return Ok(());
    };
    let rows = glyph_rows(call);
    let color = if call.dimmed {
        C_DIMMED
    } else {
        glyph_color(call.sprite)
    };
    out.queue(style::SetForegroundColor(color))?;

    // Beams are long enough to span several rows.
    let repeat = if call.sprite == Sprite::SniperBeam {
        field.rows_for(144.0)
    } else {
        1
    };
    let bottom = field.top + field.rows;
    let mut r = row;
    for line in rows.iter().cycle().take(rows.len() * repeat as usize) {
        if r >= bottom {
            break;
        }
        let half = line.chars().count() as u16 / 2;
        let c = col.saturating_sub(half).max(field.left);
        out.queue(cursor::MoveTo(c, r))?;
        out.queue(Print(*line))?;
        r += 1;
    }
    Ok(())
}

/// Dotted line from a leech to the player.
fn draw_tether<W: Write>(out: &mut W, field: &Field, from: Vec2, to: Vec2) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_TETHER))?;
    const STEPS: u16 = 12;
    for i in 1..STEPS {
        let t = i as f32 / STEPS as f32;
        let p = Vec2::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
        if let Some((c, r)) = field.cell(p) {
            out.queue(cursor::MoveTo(c, r))?;
            out.queue(Print("·"))?;
        }
    }
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_centered<W: Write>(
    out: &mut W,
    width: u16,
    height: u16,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = width / 2;
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}

fn draw_pause<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    draw_centered(
        out,
        width,
        height,
        &[
            ("╔════════════════════╗", Color::Cyan),
            ("║       PAUSED       ║", Color::Cyan),
            ("╚════════════════════╝", Color::Cyan),
            ("P/Esc - Resume   R - Restart", Color::White),
            ("M - Main Menu    Q - Quit", Color::White),
        ],
    )
}

fn draw_debug<W: Write>(out: &mut W, state: &GameState) -> std::io::Result<()> {
    let w = &state.waves;
    let lines = [
        format!("frame {}", state.frame),
        format!("enemies {}  spawned {}/{}", state.enemies.len(), w.enemies_spawned, w.enemies_per_wave),
        format!("asteroids {}/{}", state.asteroids.len(), w.max_asteroids),
        format!("boss spawned {}", w.boss_spawned),
        format!("transition {:?}", w.transition_delay),
        format!("tethered {}", state.player.is_tethered()),
        format!("invincible {}", state.player.invincible_ticks),
    ];
    out.queue(style::SetForegroundColor(C_HINT))?;
    for (i, line) in lines.iter().enumerate() {
        out.queue(cursor::MoveTo(2, 3 + i as u16))?;
        out.queue(Print(line))?;
    }
    Ok(())
}

// ── Menu screens ──────────────────────────────────────────────────────────────

pub const MENU_ITEMS: [&str; 4] = ["New Game", "High Scores", "Controls", "Quit"];

pub fn draw_menu<W: Write>(out: &mut W, selected: usize, best: u32) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  STAR  FIGHTER  ★";
    out.queue(cursor::MoveTo(cx.saturating_sub(title.chars().count() as u16 / 2), cy.saturating_sub(6)))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    if best > 0 {
        let hs_str = format!("Best Score: {best}");
        out.queue(cursor::MoveTo(cx.saturating_sub(hs_str.chars().count() as u16 / 2), cy.saturating_sub(5)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(&hs_str))?;
    }

    for (i, item) in MENU_ITEMS.iter().enumerate() {
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(7), row))?;
        if i == selected {
            out.queue(style::SetForegroundColor(Color::Yellow))?;
            out.queue(Print(format!("▶ {item}")))?;
        } else {
            out.queue(style::SetForegroundColor(Color::White))?;
            out.queue(Print(format!("  {item}")))?;
        }
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(12), cy + 4))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ ↓ : Select   ENTER : Confirm"))?;
    out.queue(style::ResetColor)?;
    out.flush()
}

pub fn draw_high_scores<W: Write>(out: &mut W, table: &HighScoreTable) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    let mut lines: Vec<(String, Color)> = vec![("HIGH SCORES".to_string(), Color::Cyan), (String::new(), Color::Reset)];
    if table.entries().is_empty() {
        lines.push(("no scores yet".to_string(), C_HINT));
    }
    for (rank, entry) in table.entries().iter().enumerate() {
        lines.push((format!("{}. {}  {:>7}", rank + 1, entry.initials, entry.score), Color::Yellow));
    }
    lines.push((String::new(), Color::Reset));
    lines.push(("any key - back".to_string(), C_HINT));
    let borrowed: Vec<(&str, Color)> = lines.iter().map(|(s, c)| (s.as_str(), *c)).collect();
    draw_centered(out, width, height, &borrowed)?;
    out.queue(style::ResetColor)?;
    out.flush()
}

pub fn draw_controls<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    draw_centered(
        out,
        width,
        height,
        &[
            ("CONTROLS", Color::Cyan),
            ("", Color::Reset),
            ("← → ↑ ↓ / W A S D : Move", Color::White),
            ("SPACE : Fire (tap for a heavy shot)", Color::White),
            ("M : Missiles (with power-up)", Color::White),
            ("B : Bomb", Color::White),
            ("P / Esc : Pause", Color::White),
            ("F1 : FPS   F2 : Debug", Color::White),
            ("", Color::Reset),
            ("any key - back", C_HINT),
        ],
    )?;
    out.queue(style::ResetColor)?;
    out.flush()
}

/// Game-over screen; `initials` is `Some` while a new high score is entered.
pub fn draw_game_over_screen<W: Write>(
    out: &mut W,
    score: u32,
    level: u32,
    initials: Option<&str>,
) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let (width, height) = terminal::size()?;
    let score_line = format!("Final Score: {score:>6}   Level {level}");
    let entry_line = initials.map(|s| format!("NEW HIGH SCORE!  Initials: {s:_<3}"));
    let mut lines: Vec<(&str, Color)> = vec![
        ("╔════════════════════╗", Color::Red),
        ("║    GAME  OVER      ║", Color::Red),
        ("╚════════════════════╝", Color::Red),
        (score_line.as_str(), Color::Yellow),
    ];
    match &entry_line {
        Some(line) => {
            lines.push((line.as_str(), Color::Cyan));
            lines.push(("type 3 letters, ENTER to save", C_HINT));
        }
        None => lines.push(("R - Play Again   M - Menu   Q - Quit", Color::White)),
    }
    draw_centered(out, width, height, &lines)?;
    out.queue(style::ResetColor)?;
    out.flush()
}
