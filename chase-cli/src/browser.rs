//! Interactive category / merchant / transaction browser.
//!
//! Reads a category-merchant report built with detail leaves. Navigation
//! lives in [`BrowserState`] so it can be driven without a terminal.

use anyhow::Result;
use chase_core::{AggregateNode, NodeKind, Report};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use std::io::{self, Stdout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Categories,
    Merchants,
    Transactions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Up,
    Down,
    Enter,
    Back,
    Quit,
}

impl Action {
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Char('k') | KeyCode::Up => Some(Action::Up),
            KeyCode::Char('j') | KeyCode::Down => Some(Action::Down),
            KeyCode::Char('l') | KeyCode::Enter => Some(Action::Enter),
            KeyCode::Char('h') | KeyCode::Esc => Some(Action::Back),
            KeyCode::Char('q') => Some(Action::Quit),
            _ => None,
        }
    }
}

pub struct BrowserState<'r> {
    report: &'r Report,
    focus: Panel,
    category: usize,
    merchant: usize,
    transaction: usize,
}

impl<'r> BrowserState<'r> {
    pub fn new(report: &'r Report) -> Self {
        Self {
            report,
            focus: Panel::Categories,
            category: 0,
            merchant: 0,
            transaction: 0,
        }
    }

    pub fn focus(&self) -> Panel {
        self.focus
    }

    pub fn categories(&self) -> &'r [AggregateNode] {
        self.report.categories()
    }

    pub fn merchants(&self) -> &'r [AggregateNode] {
        self.selected_category()
            .map(|c| c.children.as_slice())
            .unwrap_or_default()
    }

    /// Leaves of the selected merchant, newest first.
    pub fn transactions(&self) -> Vec<&'r AggregateNode> {
        let mut leaves: Vec<&AggregateNode> = self
            .selected_merchant()
            .map(|m| m.children.iter().collect())
            .unwrap_or_default();
        leaves.sort_by_key(|n| std::cmp::Reverse(leaf_date(n)));
        leaves
    }

    pub fn selected_category(&self) -> Option<&'r AggregateNode> {
        self.categories().get(self.category)
    }

    pub fn selected_merchant(&self) -> Option<&'r AggregateNode> {
        self.merchants().get(self.merchant)
    }

    pub fn selection(&self, panel: Panel) -> usize {
        match panel {
            Panel::Categories => self.category,
            Panel::Merchants => self.merchant,
            Panel::Transactions => self.transaction,
        }
    }

    fn focused_len(&self) -> usize {
        match self.focus {
            Panel::Categories => self.categories().len(),
            Panel::Merchants => self.merchants().len(),
            Panel::Transactions => self.transactions().len(),
        }
    }

    fn move_by(&mut self, down: bool) {
        let len = self.focused_len();
        if len == 0 {
            return;
        }
        let cursor = match self.focus {
            Panel::Categories => &mut self.category,
            Panel::Merchants => &mut self.merchant,
            Panel::Transactions => &mut self.transaction,
        };
        let next = if down {
            (*cursor + 1).min(len - 1)
        } else {
            cursor.saturating_sub(1)
        };
        if next == *cursor {
            return;
        }
        *cursor = next;
        // A new parent selection restarts the panels to its right.
        match self.focus {
            Panel::Categories => {
                self.merchant = 0;
                self.transaction = 0;
            }
            Panel::Merchants => self.transaction = 0,
            Panel::Transactions => {}
        }
    }

    /// Apply one action; returns `false` when the browser should close.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Up => self.move_by(false),
            Action::Down => self.move_by(true),
            Action::Enter => match self.focus {
                Panel::Categories if !self.merchants().is_empty() => self.focus = Panel::Merchants,
                Panel::Merchants if !self.transactions().is_empty() => {
                    self.focus = Panel::Transactions
                }
                _ => {}
            },
            Action::Back => match self.focus {
                Panel::Transactions => self.focus = Panel::Merchants,
                Panel::Merchants => self.focus = Panel::Categories,
                Panel::Categories => {}
            },
            Action::Quit => return false,
        }
        true
    }

    pub fn header(&self) -> String {
        let fmt = |d: Option<chrono::NaiveDate>, fallback: &str| {
            d.map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| fallback.to_string())
        };
        format!(
            "Chase Transactions | {} to {} | Total: ${}",
            fmt(self.report.summary.span_start, "Start"),
            fmt(self.report.summary.span_end, "End"),
            self.report.summary.total
        )
    }
}

fn leaf_date(node: &AggregateNode) -> Option<chrono::NaiveDate> {
    match node.kind {
        NodeKind::Transaction { date } => Some(date),
        _ => None,
    }
}

fn clip(s: &str, width: usize) -> String {
    s.chars().take(width).collect()
}

pub fn run_browser(report: &Report) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = browser_loop(&mut terminal, report);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn browser_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, report: &Report) -> Result<()> {
    let mut state = BrowserState::new(report);

    loop {
        terminal.draw(|f| draw(f, &state))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = Action::from_key(key.code) {
                    if !state.apply(action) {
                        break;
                    }
                }
            }
        }
    }

    Ok(())
}

fn panel_block(title: &str, focused: bool) -> Block<'_> {
    let border = if focused { Color::Yellow } else { Color::DarkGray };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title)
}

fn render_list(f: &mut Frame, area: Rect, title: &str, items: Vec<ListItem>, selected: usize, focused: bool) {
    let mut list_state = ListState::default();
    if !items.is_empty() {
        list_state.select(Some(selected));
    }
    let list = List::new(items)
        .block(panel_block(title, focused))
        .highlight_style(
            Style::default()
                .bg(if focused { Color::Blue } else { Color::DarkGray })
                .add_modifier(Modifier::BOLD),
        );
    f.render_stateful_widget(list, area, &mut list_state);
}

pub fn draw(f: &mut Frame, state: &BrowserState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(Span::styled(
        state.header(),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, rows[0]);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 4),
            Constraint::Ratio(1, 4),
            Constraint::Ratio(2, 4),
        ])
        .split(rows[1]);

    let categories = state
        .categories()
        .iter()
        .map(|c| ListItem::new(format!("{:<18} {:>11}", clip(&c.key, 18), format!("${}", c.total))))
        .collect();
    render_list(
        f,
        cols[0],
        "Categories",
        categories,
        state.selection(Panel::Categories),
        state.focus() == Panel::Categories,
    );

    let merchants = state
        .merchants()
        .iter()
        .map(|m| {
            ListItem::new(format!(
                "{:<18} {:>10} ({})",
                clip(&m.key, 18),
                format!("${}", m.total),
                m.count
            ))
        })
        .collect();
    render_list(
        f,
        cols[1],
        "Merchants",
        merchants,
        state.selection(Panel::Merchants),
        state.focus() == Panel::Merchants,
    );

    let transactions = state
        .transactions()
        .into_iter()
        .map(|t| {
            let date = leaf_date(t)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "N/A".to_string());
            ListItem::new(format!(
                "{date}  {:>11}  {}",
                format!("${}", t.total),
                clip(&t.key, 30)
            ))
        })
        .collect();
    render_list(
        f,
        cols[2],
        "Transactions",
        transactions,
        state.selection(Panel::Transactions),
        state.focus() == Panel::Transactions,
    );

    let footer = Paragraph::new(Line::from(Span::styled(
        "j/k move  l/Enter select  h/Esc back  q quit",
        Style::default().fg(Color::Gray),
    )));
    f.render_widget(footer, rows[2]);
}
