//! Interactive terminal front end.
//!
//! Drives the engine on a fixed tick from two key stimuli and renders a
//! textual speedometer. Hold Up to accelerate and Down to brake (terminal
//! key repeat keeps the stimulus asserted while held); Esc or `q` quits.
//!
//! The loop is strictly tick-paced: each frame drains pending key events for
//! the remainder of the tick window, then calls `step` with the fixed tick
//! duration, so simulation time advances at the same rate regardless of how
//! many key events arrived.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor, execute,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{self, ClearType},
};

use crate::config::ConsoleConfig;
use crate::gearbox::{GearboxEngine, GEAR_WINDOWS, MAX_SPEED, NUM_GEARS};

/// Width of the speedometer bar in cells.
const BAR_WIDTH: usize = 40;

/// Render the proportional speedometer bar for a given speed.
pub fn speedometer_bar(speed: f64) -> String {
    let filled = ((speed / MAX_SPEED) * BAR_WIDTH as f64) as usize;
    let filled = filled.min(BAR_WIDTH);

    let mut bar = String::with_capacity(BAR_WIDTH + 32);
    bar.push('[');
    for i in 0..BAR_WIDTH {
        bar.push(if i < filled { '#' } else { ' ' });
    }
    bar.push(']');
    bar.push_str(&format!(" {:.1} km/h", speed));
    bar
}

fn render_frame(engine: &mut GearboxEngine, accelerating: bool, braking: bool) -> String {
    let mut frame = String::new();
    frame.push_str("Interactive Gearbox Simulator\r\n");
    frame.push_str("[UP] Accelerate  [DOWN] Brake  [ESC] Quit\r\n\r\n");
    frame.push_str(&format!("Speedometer: {}\r\n", speedometer_bar(engine.speed())));
    frame.push_str(&format!("Current Gear: {}\r\n", engine.gear()));
    frame.push_str(&format!(
        "Accelerating: {}\r\n",
        if accelerating { "YES" } else { "NO" }
    ));
    frame.push_str(&format!("Braking: {}\r\n", if braking { "YES" } else { "NO" }));
    frame.push_str("\r\nGear ranges:\r\n");
    for (i, window) in GEAR_WINDOWS.iter().enumerate() {
        frame.push_str(&format!(
            "G{:<2}: {:3.0} - {:3.0} km/h\r\n",
            i + 1,
            window.min_speed,
            window.max_speed
        ));
    }
    frame
}

/// Run the interactive loop until the user quits.
///
/// Takes over the terminal (raw mode + alternate screen) and restores it
/// before returning, also on error.
pub fn run_console(config: &ConsoleConfig) -> io::Result<()> {
    let mut stdout = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, terminal::EnterAlternateScreen, cursor::Hide)?;

    let result = run_loop(&mut stdout, config);

    execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    result
}

fn run_loop(stdout: &mut io::Stdout, config: &ConsoleConfig) -> io::Result<()> {
    let tick = Duration::from_millis(config.tick_ms);
    let dt = config.tick_seconds();

    let mut engine = GearboxEngine::new();
    let mut accelerating = false;
    let mut braking = false;

    loop {
        execute!(stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        stdout.write_all(render_frame(&mut engine, accelerating, braking).as_bytes())?;
        stdout.flush()?;

        // Drain key events for the rest of this tick window.
        accelerating = false;
        braking = false;
        let deadline = Instant::now() + tick;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() || !event::poll(remaining)? {
                break;
            }
            if let Event::Key(key) = event::read()? {
                if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
                    continue;
                }
                match key.code {
                    KeyCode::Up => accelerating = true,
                    KeyCode::Down => braking = true,
                    KeyCode::Esc | KeyCode::Char('q') => return Ok(()),
                    _ => {}
                }
            }
        }

        engine.step(accelerating, braking, dt);
    }
}
