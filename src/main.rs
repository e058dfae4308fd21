use std::io;
use std::process::ExitCode;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Gauge, Paragraph, Tabs};

use lineup_ratings::config::ScanConfig;
use lineup_ratings::feed::spawn_scan_worker;
use lineup_ratings::model::{PositionGroup, group_label};
use lineup_ratings::state::{AppState, Delta, ExportState, ProviderCommand, ScanPhase, apply_delta};

const DEFAULT_EXPORT_PATH: &str = "player_ratings.xlsx";

struct App {
    state: AppState,
    should_quit: bool,
    cmd_tx: Option<mpsc::Sender<ProviderCommand>>,
    export_path: String,
}

impl App {
    fn new(cmd_tx: Option<mpsc::Sender<ProviderCommand>>, export_path: String) -> Self {
        Self {
            state: AppState::new(),
            should_quit: false,
            cmd_tx,
            export_path,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => self.state.cycle_group_next(),
            KeyCode::BackTab | KeyCode::Left | KeyCode::Char('h') => self.state.cycle_group_prev(),
            KeyCode::Char('1') => self.select_group(PositionGroup::Goalkeeper),
            KeyCode::Char('2') => self.select_group(PositionGroup::Defender),
            KeyCode::Char('3') => self.select_group(PositionGroup::Midfielder),
            KeyCode::Char('4') => self.select_group(PositionGroup::Forward),
            KeyCode::Char('j') | KeyCode::Down => self.state.scroll_down(),
            KeyCode::Char('k') | KeyCode::Up => self.state.scroll_up(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.request_rescan(),
            KeyCode::Char('e') | KeyCode::Char('E') => self.request_export(),
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Esc => self.state.help_overlay = false,
            _ => {}
        }
    }

    fn select_group(&mut self, group: PositionGroup) {
        self.state.group = group;
        self.state.scroll = 0;
    }

    fn request_rescan(&mut self) {
        match self.state.phase {
            ScanPhase::Running => {
                self.state.push_log("[INFO] Scan already running");
                return;
            }
            ScanPhase::Failed => {
                self.state.push_log("[WARN] Scanner is not running; fix the setup and restart");
                return;
            }
            _ => {}
        }
        self.send(ProviderCommand::Rescan, "Rescan");
    }

    fn request_export(&mut self) {
        if self.state.report.is_none() {
            self.state.push_log("[INFO] Nothing to export yet");
            return;
        }
        let path = self.export_path.clone();
        self.send(ProviderCommand::Export { path }, "Export");
    }

    fn send(&mut self, cmd: ProviderCommand, label: &str) {
        let Some(tx) = &self.cmd_tx else {
            self.state.push_log(format!("[INFO] {label} unavailable"));
            return;
        };
        if tx.send(cmd).is_err() {
            self.state.push_log(format!("[WARN] {label} request failed"));
        }
    }
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match ScanConfig::load(&args) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::from(2);
        }
    };

    match run_dashboard(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run_dashboard(config: ScanConfig) -> io::Result<()> {
    let export_path = config
        .export_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| DEFAULT_EXPORT_PATH.to_string());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let (tx, rx) = mpsc::channel();
    let (cmd_tx, cmd_rx) = mpsc::channel();
    spawn_scan_worker(config, tx, cmd_rx);

    let mut app = App::new(Some(cmd_tx), export_path);
    let res = run_app(&mut terminal, &mut app, rx);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: mpsc::Receiver<Delta>,
) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        while let Ok(delta) = rx.try_recv() {
            apply_delta(&mut app.state, delta);
        }

        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    render_progress(frame, chunks[1], &app.state);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(60), Constraint::Length(44)])
        .split(chunks[2]);
    render_rankings(frame, body[0], &app.state);
    render_sidebar(frame, body[1], &app.state);

    let footer = Paragraph::new(footer_text())
        .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let competition = if state.competition.is_empty() {
        "-"
    } else {
        state.competition.as_str()
    };
    let phase = match state.phase {
        ScanPhase::Idle => "waiting",
        ScanPhase::Running => "scanning",
        ScanPhase::Done => "done",
        ScanPhase::Failed => "failed",
    };
    format!("LINEUP RATINGS | {competition} | {phase}")
}

fn footer_text() -> String {
    "Tab/←/→ Group | 1-4 Jump | j/k/↑/↓ Scroll | r Rescan | e Export | ? Help | q Quit".to_string()
}

fn render_progress(frame: &mut Frame, area: Rect, state: &AppState) {
    let p = &state.progress;
    let label = match p.date {
        Some(date) => format!("{}/{} {date}", p.current, p.total),
        None => format!("{}/{}", p.current, p.total),
    };
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
        .ratio(p.ratio())
        .label(label);
    frame.render_widget(gauge, area);
}

fn render_rankings(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(1)])
        .split(area);

    let titles: Vec<String> = PositionGroup::ALL
        .iter()
        .map(|g| group_label(*g).to_string())
        .collect();
    let tabs = Tabs::new(titles)
        .select(state.group.index())
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Yellow));
    frame.render_widget(tabs, sections[0]);

    let widths = ranking_columns();
    render_ranking_header(frame, sections[1], &widths);

    let list_area = sections[2];
    let rows = state.current_rows();
    if rows.is_empty() {
        let msg = match state.phase {
            ScanPhase::Done if state.report.as_ref().is_some_and(|r| r.is_empty()) => {
                if state.counters().schedules_fetched == 0 && state.issue_count > 0 {
                    "API unreachable: every schedule request failed".to_string()
                } else {
                    "No players above the minutes threshold".to_string()
                }
            }
            ScanPhase::Done => "No players in this group".to_string(),
            ScanPhase::Failed => format!(
                "Scan failed: {}",
                state.failure.as_deref().unwrap_or("unknown error")
            ),
            _ => "Waiting for scan to finish".to_string(),
        };
        let empty = Paragraph::new(msg).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let start = state.scroll.min(rows.len().saturating_sub(1));
    let end = (start + visible).min(rows.len());
    for (i, row) in rows[start..end].iter().enumerate() {
        let row_area = Rect {
            x: list_area.x,
            y: list_area.y + i as u16,
            width: list_area.width,
            height: 1,
        };
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(widths)
            .split(row_area);
        let style = Style::default();
        render_cell_text(frame, cols[0], &row.rank.to_string(), style);
        render_cell_text(frame, cols[1], &row.name, style);
        render_cell_text(frame, cols[2], &row.team, style);
        render_cell_text(frame, cols[3], &row.raw_position, style);
        render_cell_text(
            frame,
            cols[4],
            &format!("{:.2}", row.average_rating),
            Style::default().fg(rating_color(row.average_rating)),
        );
        render_cell_text(frame, cols[5], &row.total_minutes.to_string(), style);
        render_cell_text(frame, cols[6], &row.match_count.to_string(), style);
    }
}

fn ranking_columns() -> [Constraint; 7] {
    [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Length(20),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(5),
    ]
}

fn render_ranking_header(frame: &mut Frame, area: Rect, widths: &[Constraint]) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(widths)
        .split(area);
    let style = Style::default().add_modifier(Modifier::BOLD);

    render_cell_text(frame, cols[0], "#", style);
    render_cell_text(frame, cols[1], "Player", style);
    render_cell_text(frame, cols[2], "Team", style);
    render_cell_text(frame, cols[3], "Pos", style);
    render_cell_text(frame, cols[4], "Rating", style);
    render_cell_text(frame, cols[5], "Minutes", style);
    render_cell_text(frame, cols[6], "Apps", style);
}

fn rating_color(rating: f64) -> Color {
    if rating >= 7.5 {
        Color::Green
    } else if rating >= 7.0 {
        Color::Yellow
    } else {
        Color::White
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(3)])
        .split(area);

    let c = state.counters();
    let export = match &state.export {
        ExportState::None => "-".to_string(),
        ExportState::Running { path } => format!("writing {path}"),
        ExportState::Done { path, rows } => format!("{rows} rows -> {path}"),
        ExportState::Failed { error, .. } => format!("failed: {error}"),
    };
    let stats = [
        format!("Dates scanned     {}", c.dates_scanned.max(state.progress.current)),
        format!("Schedule entries  {}", c.entries_scanned),
        format!("Target matches    {}", c.target_matches),
        format!("Matches analyzed  {}", c.matches_inspected),
        format!("Players tracked   {}", c.players_tracked),
        format!("Players ranked    {}", c.players_ranked),
        format!("Errors            {}", state.issue_count),
        format!("Export            {export}"),
    ]
    .join("\n");
    let stats = Paragraph::new(stats).block(Block::default().title("Run").borders(Borders::ALL));
    frame.render_widget(stats, sections[0]);

    let log_height = sections[1].height.saturating_sub(2) as usize;
    let skip = state.logs.len().saturating_sub(log_height);
    let lines: Vec<Line> = state
        .logs
        .iter()
        .skip(skip)
        .map(|line| {
            let style = if line.starts_with("[WARN]") {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Line::styled(line.clone(), style)
        })
        .collect();
    let logs = Paragraph::new(lines).block(Block::default().title("Log").borders(Borders::ALL));
    frame.render_widget(logs, sections[1]);
}

fn render_cell_text(frame: &mut Frame, area: Rect, text: &str, style: Style) {
    let text_area = Rect {
        x: area.x,
        y: area.y + (area.height / 2),
        width: area.width,
        height: 1,
    };
    let paragraph = Paragraph::new(text).style(style);
    frame.render_widget(paragraph, text_area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Lineup Ratings - Help",
        "",
        "Rankings:",
        "  Tab / → / l  Next position group",
        "  ⇧Tab / ← / h Previous position group",
        "  1-4          GK / DEF / MID / FWD",
        "  j/k or ↑/↓   Scroll",
        "",
        "Run:",
        "  r            Rescan the date range",
        "  e            Export tables to .xlsx",
        "  ?            Toggle help",
        "  q            Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
