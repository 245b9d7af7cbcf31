use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{App, AppState, Level};

use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Picker panes
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);
    render_panes(frame, app, chunks[1]);
    render_status_bar(frame, app, chunks[2]);

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  regioncache";
    let help_hint = "[?] Help";

    // Breadcrumb of the pick so far
    let mut crumbs = Vec::new();
    if let Some(p) = app.selected_province() {
        crumbs.push(p.name.clone());
    }
    if app.level != Level::Province {
        if let Some(c) = app.selected_city() {
            crumbs.push(c.name.clone());
        }
    }
    if app.level == Level::Region {
        if let Some(r) = app.selected_region() {
            crumbs.push(r.name.clone());
        }
    }
    let breadcrumb = crumbs.join(" › ");

    let used = title.chars().count() + breadcrumb.chars().count() + help_hint.len() + 6;
    let padding = (area.width as usize).saturating_sub(used);

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw("  "),
        Span::styled(breadcrumb, styles::muted_style()),
        Span::raw(" ".repeat(padding)),
        Span::styled(help_hint, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

fn render_panes(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(area);

    let provinces: Vec<String> = app.visible_provinces().iter().map(|p| p.name.clone()).collect();
    let cities: Vec<String> = app.visible_cities().iter().map(|c| c.name.clone()).collect();
    let regions: Vec<String> = app.visible_regions().iter().map(|r| r.name.clone()).collect();

    render_pane(
        frame, app, chunks[0], Level::Province, &provinces, app.province_cursor,
    );
    render_pane(frame, app, chunks[1], Level::City, &cities, app.city_cursor);
    render_pane(
        frame, app, chunks[2], Level::Region, &regions, app.region_cursor,
    );
}

fn render_pane(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    level: Level,
    names: &[String],
    cursor: usize,
) {
    let focused = app.level == level;

    let items: Vec<ListItem> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if i == cursor && focused {
                styles::selected_style()
            } else if i == cursor {
                styles::muted_style()
            } else {
                styles::list_item_style()
            };
            ListItem::new(Line::from(format!(" {}", name))).style(style)
        })
        .collect();

    let title = if focused && matches!(app.state, AppState::Filtering) {
        format!(" {} /{}_ ", level.title(), app.filter)
    } else if focused && !app.filter.is_empty() {
        format!(" {} /{} ({}) ", level.title(), app.filter, names.len())
    } else {
        format!(" {} ({}) ", level.title(), names.len())
    };

    let block = Block::default()
        .title(title)
        .title_style(if focused && !app.filter.is_empty() {
            styles::filter_style()
        } else {
            styles::title_style()
        })
        .borders(Borders::ALL)
        .border_style(styles::border_style(focused));

    let list = List::new(items).block(block);

    let mut state = ListState::default();
    if !names.is_empty() {
        state.select(Some(cursor.min(names.len() - 1)));
    }

    frame.render_stateful_widget(list, area, &mut state);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1)])
        .split(area);

    let left_text = if let Some(ref msg) = app.status_message {
        format!(" {} ", msg)
    } else {
        format!(" Updated {} ", app.list_ages.last_updated())
    };
    let status = Paragraph::new(Line::from(Span::raw(left_text))).style(styles::status_bar_style());
    frame.render_widget(status, chunks[0]);

    let hints = Line::from(vec![
        Span::styled(" j/k", styles::help_key_style()),
        Span::styled(" move ", styles::muted_style()),
        Span::styled("h/l", styles::help_key_style()),
        Span::styled(" level ", styles::muted_style()),
        Span::styled("Enter", styles::help_key_style()),
        Span::styled(" select ", styles::muted_style()),
        Span::styled("/", styles::help_key_style()),
        Span::styled(" filter ", styles::muted_style()),
        Span::styled("r", styles::help_key_style()),
        Span::styled(" reload ", styles::muted_style()),
        Span::styled("q", styles::help_key_style()),
        Span::styled(" quit", styles::muted_style()),
    ]);
    frame.render_widget(Paragraph::new(hints), chunks[1]);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let rows = [
        ("↑/↓, j/k", "Move within the focused pane"),
        ("PgUp/PgDn", "Move ten entries at a time"),
        ("←/→, h/l", "Focus the previous/next pane"),
        ("Enter", "Descend, or confirm on the region pane"),
        ("Esc", "Go back up one pane"),
        ("/", "Filter the focused pane"),
        ("r", "Re-read the lists from disk"),
        ("?", "Toggle this help"),
        ("q", "Quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, desc) in rows {
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<12}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .title_style(styles::title_style())
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// A centered rect of the given percentage size within `r`.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
