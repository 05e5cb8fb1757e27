use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use super::app::{App, Focus, Mode};
use crate::application::todo_service::TodoService;

const HELP: &str = "Tab: switch pane  n: new list  r: rename  D: delete list  a: add task  e: edit  d: delete  Enter/Space: toggle  q: quit";

pub fn draw<S: TodoService>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    let header = Paragraph::new(HELP).block(Block::default().borders(Borders::ALL).title("Simple Todo List"));
    f.render_widget(header, chunks[0]);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(chunks[1]);
    draw_lists(f, app, middle[0]);
    draw_tasks(f, app, middle[1]);
    draw_footer(f, app, chunks[2]);
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let style = if focused { Style::default().fg(Color::Cyan) } else { Style::default() };
    Block::default().borders(Borders::ALL).border_style(style).title(title)
}

fn highlight() -> Style { Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD | Modifier::REVERSED) }

fn draw_lists<S: TodoService>(f: &mut Frame, app: &App<S>, area: Rect) {
    let items: Vec<ListItem> = app
        .service()
        .lists()
        .iter()
        .map(|list| {
            let (done, total) = list.progress();
            let mut spans = vec![Span::raw(list.name.clone())];
            if total > 0 {
                spans.push(Span::styled(format!("  {done}/{total}"), Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(app.list_cursor));
    }
    let list = List::new(items)
        .block(pane_block("Lists".into(), app.focus == Focus::Lists))
        .highlight_style(highlight())
        .highlight_symbol(">> ");
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_tasks<S: TodoService>(f: &mut Frame, app: &App<S>, area: Rect) {
    let focused = app.focus == Focus::Tasks;
    let Some(list) = app.selected_list() else {
        let placeholder = Paragraph::new("No List Selected\n\nPress n to create a list.")
            .block(pane_block("Tasks".into(), focused));
        f.render_widget(placeholder, area);
        return;
    };

    let section = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let mut items = Vec::new();
    let mut selected_row = None;
    let mut index = 0;

    let pending: Vec<_> = list.pending_tasks().collect();
    if !pending.is_empty() {
        items.push(ListItem::new(Span::styled("To Do", section)));
        for task in pending {
            if index == app.task_cursor {
                selected_row = Some(items.len());
            }
            items.push(ListItem::new(format!("[ ] {}", task.title)));
            index += 1;
        }
    }

    let completed: Vec<_> = list.completed_tasks().collect();
    if !completed.is_empty() {
        items.push(ListItem::new(Span::styled("Completed", section)));
        let done = Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT);
        for task in completed {
            if index == app.task_cursor {
                selected_row = Some(items.len());
            }
            items.push(ListItem::new(Span::styled(format!("[x] {}", task.title), done)));
            index += 1;
        }
    }

    if items.is_empty() {
        items.push(ListItem::new(Span::styled("No tasks yet. Press a to add one.", Style::default().fg(Color::DarkGray))));
    }

    let mut state = ListState::default();
    if focused {
        state.select(selected_row);
    }
    let tasks = List::new(items)
        .block(pane_block(list.name.clone(), focused))
        .highlight_style(highlight())
        .highlight_symbol(">> ");
    f.render_stateful_widget(tasks, area, &mut state);
}

fn draw_footer<S: TodoService>(f: &mut Frame, app: &App<S>, area: Rect) {
    let (title, line) = match &app.mode {
        Mode::Browse => ("info", Line::from(app.status.clone().unwrap_or_default())),
        Mode::Input { prompt, buffer, error } => {
            let mut spans = vec![Span::raw(format!("{}: {buffer}_", prompt.label()))];
            if let Some(reason) = error {
                spans.push(Span::styled(format!("  ({reason})"), Style::default().fg(Color::Red)));
            }
            ("Enter to save, Esc to cancel", Line::from(spans))
        }
        Mode::ConfirmDelete(id) => {
            let name = app.service().list(id).map(|l| l.name.clone()).unwrap_or_default();
            let text = format!("Delete \"{name}\" and all of its tasks? This cannot be undone. (y/N)");
            ("confirm", Line::from(Span::styled(text, Style::default().fg(Color::Yellow))))
        }
    };
    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(footer, area);
}
