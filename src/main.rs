#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

use std::fs::File;
use std::io;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use forager_rust::simulation::{config::ArenaConfig, environment::Arena};
use forager_rust::ui::{
    field::{compute_arena_grid, compute_belief_grid},
    hud_line,
    render::draw_ui,
};

/// Environment variable naming an optional JSON arena configuration.
const CONFIG_ENV: &str = "FORAGER_CONFIG";
/// Log file; the terminal is taken over by the UI.
const LOG_FILE: &str = "forager.log";

fn main() -> Result<()> {
    init_tracing()?;
    let config = load_config()?;
    info!(?config, "starting forager sandbox");

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut arena = Arena::new(config);
    let tick_rate = Duration::from_millis(80);

    let res = run_app(&mut terminal, &mut arena, tick_rate);

    // Restore Terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }
    info!(
        ticks = arena.tick,
        delivered = arena.delivered,
        "forager sandbox stopped"
    );

    Ok(())
}

fn init_tracing() -> Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("creating {LOG_FILE}"))?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn load_config() -> Result<ArenaConfig> {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return Ok(ArenaConfig::default());
    };
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    ArenaConfig::from_json_str(&json).with_context(|| format!("parsing {path}"))
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    arena: &mut Arena,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    let mut halted: Option<String> = None;
    loop {
        // 1. Update
        if halted.is_none() && last_tick.elapsed() >= tick_rate {
            if let Err(err) = arena.step() {
                error!(%err, "arena halted");
                halted = Some(err.to_string().lines().next().unwrap_or_default().to_owned());
            }
            last_tick = Instant::now();
        }

        // 2. Render
        terminal.draw(|f| {
            let area = f.area();
            let rows = area.height.saturating_sub(3) as usize; // HUD + borders
            let cols = (area.width / 2).saturating_sub(2) as usize;

            let arena_lines = compute_arena_grid(arena, rows, cols);
            let belief_lines = arena.ants.first().map_or_else(Vec::new, |ant| {
                compute_belief_grid(
                    ant.agent.grid(),
                    ant.agent.position(),
                    ant.agent.tick(),
                    rows,
                    cols,
                )
            });

            draw_ui(f, arena_lines, belief_lines, &hud_line(arena, halted.as_deref()));
        })?;

        // 3. Input
        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q') {
                    return Ok(());
                }
            }
        }
    }
}
