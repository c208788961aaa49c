mod app;
mod event;
mod ui;

use std::fs;
use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use env_logger::{Env, Target};
use log::info;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use typecoach::config::Config;
use typecoach::session::SessionEngine;
use typecoach::session::sampler::WordSampler;

use app::{App, AppScreen};
use event::{AppEvent, CLOCK_INTERVAL, ClockDriver, EventHandler};
use ui::components::dashboard::Dashboard;
use ui::components::typing_area::TypingArea;
use ui::layout::{AppLayout, centered_rect};

#[derive(Parser)]
#[command(name = "typecoach", version, about = "Timed terminal typing test with coaching feedback")]
struct Cli {
    #[arg(short, long, help = "Number of words sampled per session")]
    words: Option<usize>,

    #[arg(
        short,
        long,
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Session length in seconds"
    )]
    duration: Option<u32>,

    #[arg(long, value_parser = parse_positive, help = "Number of upcoming words shown")]
    window: Option<usize>,

    #[arg(short, long, help = "Bundled vocabulary name")]
    vocabulary: Option<String>,

    #[arg(long, help = "Word list file (JSON array or one word per line)")]
    word_file: Option<String>,

    #[arg(long, help = "Seed the word sampler for a reproducible session")]
    seed: Option<u64>,

    #[arg(long, help = "Disable coaching feedback")]
    no_coach: bool,

    #[arg(long, help = "Print the last session's stats as JSON on exit")]
    print_stats: bool,

    #[arg(long, help = "Write the effective settings back to the config file")]
    save_config: bool,
}

impl Cli {
    fn apply_to(&self, config: &mut Config) {
        if let Some(words) = self.words {
            config.word_count = words;
        }
        if let Some(duration) = self.duration {
            config.duration_secs = duration;
        }
        if let Some(window) = self.window {
            config.window_size = window;
        }
        if let Some(name) = &self.vocabulary {
            config.vocabulary = name.clone();
            config.vocabulary_path = None;
        }
        if let Some(path) = &self.word_file {
            config.vocabulary_path = Some(path.clone());
        }
        if self.no_coach {
            config.coach = "off".to_string();
        }
    }
}

fn parse_positive(value: &str) -> std::result::Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}

fn init_logging() -> Result<()> {
    let dir = dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("typecoach");
    fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
    let path = dir.join("typecoach.log");
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening {}", path.display()))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("warn"))
        .target(Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging is best effort; the typing test runs without it.
    if let Err(err) = init_logging() {
        eprintln!("Warning: logging disabled: {err:#}");
    }

    let mut config = Config::load()?;
    cli.apply_to(&mut config);
    if cli.save_config {
        config.save()?;
        info!("saved config to {}", Config::config_path().display());
    }

    // Bad settings are reported before the terminal is taken over.
    let vocabulary = config.load_vocabulary()?;
    let sampler = match cli.seed {
        Some(seed) => WordSampler::seeded(vocabulary, seed)?,
        None => WordSampler::new(vocabulary)?,
    };
    let engine = SessionEngine::new(config.session_config(), sampler)?;

    let events = EventHandler::new(Duration::from_millis(250));
    let clock = ClockDriver::new(events.sender(), CLOCK_INTERVAL);
    let mut app = App::new(config, engine, clock);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    if cli.print_stats {
        match app.export_json() {
            Some(json) => println!("{json}"),
            None => eprintln!("No finished session with submitted words."),
        }
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::ClockTick(id) => app.on_clock_tick(id),
            AppEvent::Idle | AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Repeat and Release would double-count input.
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Typing => handle_typing_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
    }
}

fn handle_typing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => app.restart(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter => app.submit(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('r') | KeyCode::Enter => app.restart(),
        KeyCode::Char('f') => app.request_feedback(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);

    let header_text = format!(
        " typecoach | Time left: {}s | Words: {}/{} ",
        app.engine.time_remaining(),
        app.engine.stats().len(),
        app.engine.state().words.len(),
    );
    let header = Paragraph::new(Line::from(Span::styled(
        header_text,
        Style::default()
            .fg(colors.header_fg())
            .bg(colors.header_bg())
            .add_modifier(Modifier::BOLD),
    )))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, layout.header);

    let footer_text = match app.screen {
        AppScreen::Typing => " [Space/Enter] Next word  [Tab] Restart  [Esc] Quit ",
        AppScreen::Result => " Session finished ",
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        footer_text,
        Style::default().fg(colors.text_pending()),
    )));
    frame.render_widget(footer, layout.footer);

    match app.screen {
        AppScreen::Typing => {
            let typing = TypingArea::new(&app.engine, app.config.window_size, &app.theme);
            frame.render_widget(typing, layout.main);
        }
        AppScreen::Result => {
            let dashboard = Dashboard::new(
                app.last_report.as_ref(),
                &app.feedback,
                app.can_request_feedback(),
                &app.theme,
            );
            frame.render_widget(dashboard, centered_rect(70, 80, layout.main));
        }
    }
}
