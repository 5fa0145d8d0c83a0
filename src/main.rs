mod audio;
mod display;

use std::collections::HashMap;
use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::Context;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::{info, warn};

use star_fighter::compute::{init_state, tick};
use star_fighter::config::GameConfig;
use star_fighter::entities::{GameState, GameStatus, PlayerInput};
use star_fighter::highscore::{self, HighScoreTable};

use audio::Audio;
use display::{Overlay, MENU_ITEMS};

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// A key is considered "held" if its last press/repeat event arrived within
/// this many ticks.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 ticks at 60 Hz
/// (≈133 ms) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` ticks.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

/// Held-key map → this tick's input record.
fn read_input(key_frame: &HashMap<KeyCode, u64>, frame: u64, fire_tap: bool) -> PlayerInput {
    use KeyCode::{Char, Down, Left, Right, Up};
    PlayerInput {
        left: any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        right: any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
        up: any_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        down: any_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        fire: is_held(key_frame, &Char(' '), frame),
        fire_tap,
        missile: any_held(key_frame, &[Char('m'), Char('M')], frame),
        bomb: any_held(key_frame, &[Char('b'), Char('B')], frame),
    }
}

// ── Logging ───────────────────────────────────────────────────────────────────

/// The terminal belongs to the renderer, so tracing only goes to a file.
fn init_tracing(config: &GameConfig) -> anyhow::Result<()> {
    let Some(path) = &config.log_file else {
        return Ok(());
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuChoice {
    NewGame,
    HighScores,
    Controls,
    Quit,
}

/// Block until a key goes down.
fn wait_key(rx: &mpsc::Receiver<Event>) -> Option<KeyEvent> {
    loop {
        match rx.recv() {
            Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => return Some(key),
            Ok(_) => {}
            Err(_) => return None,
        }
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    best: u32,
) -> std::io::Result<MenuChoice> {
    let mut selected = 0;
    loop {
        display::draw_menu(out, selected, best)?;
        let Some(key) = wait_key(rx) else {
            return Ok(MenuChoice::Quit);
        };
        if is_ctrl_c(&key) {
            return Ok(MenuChoice::Quit);
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                selected = (selected + MENU_ITEMS.len() - 1) % MENU_ITEMS.len();
            }
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
                selected = (selected + 1) % MENU_ITEMS.len();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                return Ok(match selected {
                    0 => MenuChoice::NewGame,
                    1 => MenuChoice::HighScores,
                    2 => MenuChoice::Controls,
                    _ => MenuChoice::Quit,
                });
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                return Ok(MenuChoice::Quit);
            }
            _ => {}
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

enum GameOutcome {
    Over(GameState),
    Restart,
    Menu,
    Quit,
}

/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the tick of the last press/repeat event for
/// every key.  Each tick the still-fresh keys become one [`PlayerInput`], so
/// fire, movement and bomb keys combine freely.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` ticks of
///   silence.
fn game_loop<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
    best: u32,
) -> std::io::Result<GameOutcome> {
    let mut rng = thread_rng();
    let mut state = init_state(config.starting_lives, best, &mut rng);
    let audio = Audio::new(config.bell);
    let frame_len = config.frame_duration();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut overlay = Overlay::default();
    let mut show_fps = false;
    let mut frame: u64 = 0;
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;
        let mut fire_tap = false;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(key) = ev else {
                continue;
            };
            match key.kind {
                KeyEventKind::Press => {
                    if is_ctrl_c(&key) {
                        return Ok(GameOutcome::Quit);
                    }
                    if key.code == KeyCode::Char(' ') && !is_held(&key_frame, &key.code, frame) {
                        fire_tap = true;
                    }
                    key_frame.insert(key.code, frame);
                    match key.code {
                        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => {
                            overlay.paused = !overlay.paused;
                        }
                        KeyCode::F(1) => show_fps = !show_fps,
                        KeyCode::F(2) => overlay.debug = !overlay.debug,
                        KeyCode::Char('r') | KeyCode::Char('R') if overlay.paused => {
                            return Ok(GameOutcome::Restart);
                        }
                        KeyCode::Char('m') | KeyCode::Char('M') if overlay.paused => {
                            return Ok(GameOutcome::Menu);
                        }
                        KeyCode::Char('q') | KeyCode::Char('Q') if overlay.paused => {
                            return Ok(GameOutcome::Quit);
                        }
                        _ => {}
                    }
                }
                // Repeat: refresh timestamp so key stays "held"
                KeyEventKind::Repeat => {
                    key_frame.insert(key.code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&key.code);
                }
            }
        }

        // ── Simulate ─────────────────────────────────────────────────────────
        if !overlay.paused {
            let input = read_input(&key_frame, frame, fire_tap);
            state = tick(&state, &input, &mut rng);
            audio.play(out, &state.cues)?;
        }

        let now = Instant::now();
        let dt = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;
        overlay.fps = (show_fps && dt > 0.0).then(|| 1.0 / dt);
        display::render(out, &state, &overlay)?;

        if state.status == GameStatus::GameOver {
            return Ok(GameOutcome::Over(state));
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_len {
            thread::sleep(frame_len - elapsed);
        }
    }
}

// ── Game over & initials ──────────────────────────────────────────────────────

enum AfterGame {
    Retry,
    Menu,
    Quit,
}

#[derive(Debug, PartialEq, Eq)]
enum InitialsStep {
    Editing,
    Submit,
    Skip,
    Quit,
}

/// Apply one key press to the initials being typed.
fn edit_initials(initials: &mut String, key: &KeyEvent) -> InitialsStep {
    if is_ctrl_c(key) {
        return InitialsStep::Quit;
    }
    match key.code {
        KeyCode::Char(c) if c.is_ascii_alphabetic() && initials.len() < 3 => {
            initials.push(c.to_ascii_uppercase());
        }
        KeyCode::Backspace => {
            initials.pop();
        }
        KeyCode::Enter if initials.len() == 3 => return InitialsStep::Submit,
        KeyCode::Esc => return InitialsStep::Skip,
        _ => {}
    }
    InitialsStep::Editing
}

fn game_over<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    state: &GameState,
    table: &mut HighScoreTable,
    config: &GameConfig,
) -> std::io::Result<AfterGame> {
    let score = state.score;
    let level = state.waves.level;
    info!(score, level, "game finished");

    if table.qualifies(score) {
        let mut initials = String::new();
        loop {
            display::draw_game_over_screen(out, score, level, Some(initials.as_str()))?;
            let Some(key) = wait_key(rx) else {
                return Ok(AfterGame::Quit);
            };
            match edit_initials(&mut initials, &key) {
                InitialsStep::Editing => {}
                InitialsStep::Skip => break,
                InitialsStep::Quit => return Ok(AfterGame::Quit),
                InitialsStep::Submit => {
                    if table.insert(&initials, score).is_some() {
                        if let Err(e) = highscore::save(&config.high_score_path, table) {
                            warn!(error = %e, "cannot save high scores");
                        }
                    }
                    break;
                }
            }
        }
    }

    loop {
        display::draw_game_over_screen(out, score, level, None)?;
        let Some(key) = wait_key(rx) else {
            return Ok(AfterGame::Quit);
        };
        if is_ctrl_c(&key) {
            return Ok(AfterGame::Quit);
        }
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') => return Ok(AfterGame::Retry),
            KeyCode::Char('m') | KeyCode::Char('M') | KeyCode::Esc => return Ok(AfterGame::Menu),
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(AfterGame::Quit),
            _ => {}
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load().context("loading configuration")?;
    init_tracing(&config)?;
    info!(?config, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result.context("terminal I/O failed")
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let mut table = highscore::load(&config.high_score_path);

    loop {
        match show_menu(out, rx, table.best())? {
            MenuChoice::Quit => return Ok(()),
            MenuChoice::HighScores => {
                display::draw_high_scores(out, &table)?;
                wait_key(rx);
            }
            MenuChoice::Controls => {
                display::draw_controls(out)?;
                wait_key(rx);
            }
            MenuChoice::NewGame => loop {
                match game_loop(out, rx, config, table.best())? {
                    GameOutcome::Quit => return Ok(()),
                    GameOutcome::Menu => break,
                    GameOutcome::Restart => continue,
                    GameOutcome::Over(state) => {
                        match game_over(out, rx, &state, &mut table, config)? {
                            AfterGame::Retry => continue,
                            AfterGame::Menu => break,
                            AfterGame::Quit => return Ok(()),
                        }
                    }
                }
            },
        }
    }
}
