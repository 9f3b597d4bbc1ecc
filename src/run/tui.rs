use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

use crate::api::worker::Worker;
use crate::api::{CachedBackend, MockBackend};
use crate::config::Settings;
use crate::db::Database;
use crate::ui::app::{App, InputMode, Outbound, Ticket};
use crate::ui::commands;
use crate::ui::render::CHROME_ROWS;

const TICK: Duration = Duration::from_millis(50);

pub(crate) fn as_tui(settings: &Settings) -> Result<()> {
    let db = Database::open(&settings.db_path)?;
    let backend = CachedBackend::new(MockBackend::new(db, settings.page_size, settings.latency));
    let worker = Worker::<Ticket>::spawn(backend)?;
    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &worker);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        tracing::error!(error = ?e, "tui exited with error");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    worker: &Worker<Ticket>,
) -> Result<()> {
    app.on_mount();

    while app.running {
        dispatch(app, worker);
        drain(app, worker);

        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(CHROME_ROWS) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if !event::poll(TICK)? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app),
                InputMode::Command => handle_command_input(key, app)?,
                InputMode::Select => handle_select_input(key, app),
            }
        }
    }
    Ok(())
}

// ── Worker plumbing ──────────────────────────────────────────

fn dispatch(app: &mut App, worker: &Worker<Ticket>) {
    for outbound in app.take_outbound() {
        match outbound {
            Outbound::Fetch(ticket, request) => {
                if let Err(e) = worker.submit(ticket.clone(), request) {
                    app.handle_delivery(ticket, Err(e));
                }
            }
            Outbound::ClearCache => {
                if let Err(e) = worker.clear_cache() {
                    tracing::warn!(error = %e, "could not clear request cache");
                }
            }
        }
    }
}

fn drain(app: &mut App, worker: &Worker<Ticket>) {
    loop {
        match worker.try_recv() {
            Ok(Some(delivery)) => app.handle_delivery(delivery.tag, delivery.result),
            Ok(None) => break,
            Err(e) => {
                app.worker_lost(e);
                break;
            }
        }
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('f') | KeyCode::Enter => {
            if app.employee_select.open() {
                app.input_mode = InputMode::Select;
            } else if app.is_loading_dropdown {
                app.set_status("Employees are still loading");
            } else if app.employee_select.items().is_empty() {
                app.set_status("No employees to filter by");
            }
        }
        KeyCode::Char('j') | KeyCode::Down => app.move_down(),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(),
        KeyCode::Char('g') | KeyCode::Home => app.goto_top(),
        KeyCode::Char('G') | KeyCode::End => app.goto_bottom(),
        KeyCode::Char('m') => {
            if app.can_view_more() {
                app.view_more();
            }
        }
        KeyCode::Char(' ') => app.toggle_selected_approval(),
        KeyCode::Char('r') => app.reload(),
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
}

fn handle_select_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            let picked = app.employee_select.confirm();
            app.select_employee(picked);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.employee_select.close();
        }
        KeyCode::Down | KeyCode::Tab => app.employee_select.highlight_next(),
        KeyCode::Up | KeyCode::BackTab => app.employee_select.highlight_prev(),
        KeyCode::Backspace => app.employee_select.pop_filter(),
        KeyCode::Char(c) => app.employee_select.push_filter(c),
        _ => {}
    }
}

fn handle_command_input(key: event::KeyEvent, app: &mut App) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}
