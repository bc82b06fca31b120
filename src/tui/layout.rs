use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::tui::app::{ActivePane, Screen, TuiApp};

pub fn render(frame: &mut Frame, app: &mut TuiApp, colors: &ColorConfig) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    if app.maximized {
        render_detail_pane(frame, app, rows[0], colors);
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(18), Constraint::Min(30)])
            .split(rows[0]);

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(45), Constraint::Min(8)])
            .split(columns[1]);

        render_sections_pane(frame, app, columns[0], colors);
        render_articles_pane(frame, app, right[0], colors);
        render_detail_pane(frame, app, right[1], colors);
    }

    render_status_bar(frame, app, rows[1], colors);
}

fn border_style(app: &TuiApp, pane: ActivePane, colors: &ColorConfig) -> Style {
    if app.active_pane == pane {
        Style::default().fg(colors.active_border)
    } else {
        Style::default().fg(colors.inactive_border)
    }
}

fn highlight_style(app: &TuiApp, pane: ActivePane, colors: &ColorConfig) -> Style {
    let style = Style::default().bg(colors.selection_bg).fg(colors.selection_fg);
    if app.active_pane == pane {
        style.add_modifier(Modifier::BOLD)
    } else {
        style.add_modifier(Modifier::DIM)
    }
}

fn render_sections_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let items: Vec<ListItem> = app
        .sections
        .iter()
        .map(|section| ListItem::new(section.label()))
        .collect();

    let block = Block::default()
        .title(" Sections ")
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Sections, colors));

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(app, ActivePane::Sections, colors))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.section_list_state);
}

fn render_articles_pane(frame: &mut Frame, app: &mut TuiApp, area: Rect, colors: &ColorConfig) {
    let block = Block::default()
        .title(format!(
            " {} ({}) [{}/{}] ",
            app.list_title(),
            app.articles().len(),
            app.article_index + 1,
            app.articles().len().max(1)
        ))
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Articles, colors));

    if app.articles().is_empty() {
        let placeholder = empty_list_text(app, colors);
        frame.render_widget(
            Paragraph::new(placeholder)
                .block(block)
                .wrap(Wrap { trim: false }),
            area,
        );
        return;
    }

    let items: Vec<ListItem> = app
        .articles()
        .iter()
        .map(|article| {
            let marker = if article.is_favorite {
                Span::styled("♥ ", Style::default().fg(colors.favorite_marker))
            } else {
                Span::raw("  ")
            };

            let date = article
                .published_timestamp()
                .map(|d| d.format("%m/%d").to_string())
                .unwrap_or_else(|| "     ".to_string());

            ListItem::new(Line::from(vec![
                marker,
                Span::styled(date, Style::default().fg(colors.date)),
                Span::raw(" "),
                Span::styled(
                    format!("[{}]", article.display_category()),
                    Style::default().fg(colors.category_tag),
                ),
                Span::raw(" "),
                Span::raw(article.display_title()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(highlight_style(app, ActivePane::Articles, colors))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.article_list_state);
}

/// What an empty list shows: progress, the failure, or a settled empty state.
fn empty_list_text(app: &TuiApp, colors: &ColorConfig) -> Text<'static> {
    if app.screen == Screen::Favorites {
        return Text::from("No favorites yet");
    }
    if app.news.is_loading {
        return Text::from("Loading...");
    }
    if let Some(error) = &app.news.error {
        let style = Style::default().fg(colors.error);
        return Text::from(
            error
                .lines()
                .map(|line| Line::from(Span::styled(line.to_string(), style)))
                .collect::<Vec<_>>(),
        );
    }
    Text::from(app.news.empty_message().unwrap_or_default())
}

fn render_detail_pane(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let (title, content) = if let Some(article) = app.selected_article() {
        let mut lines = vec![
            Line::from(Span::styled(
                article.display_title(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        if let Some(source) = article.source_name() {
            lines.push(Line::from(Span::styled(
                format!("Source: {}", source),
                Style::default().fg(colors.source),
            )));
        }
        lines.push(Line::from(format!("By: {}", article.display_author())));
        if article.is_favorite {
            lines.push(Line::from(Span::styled(
                "♥ Favorite",
                Style::default().fg(colors.favorite_marker),
            )));
        }
        let date = article.display_date();
        if !date.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("Date: {}", date),
                Style::default().fg(colors.date),
            )));
        }
        if let Some(link) = article.key() {
            lines.push(Line::from(Span::styled(
                format!("Link: {}", link),
                Style::default().fg(colors.link),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(
            "─".repeat(area.width.saturating_sub(2) as usize),
        ));
        lines.push(Line::from(""));

        let description = article.display_description();
        if !description.is_empty() {
            lines.push(Line::from(Span::styled(
                description,
                Style::default().add_modifier(Modifier::ITALIC),
            )));
            lines.push(Line::from(""));
        }
        for line in article.display_content().lines() {
            lines.push(Line::from(line.to_string()));
        }

        (" Article ", Text::from(lines))
    } else {
        (" Article ", Text::from("No article selected"))
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style(app, ActivePane::Detail, colors));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let base = Style::default().fg(colors.status_fg).bg(colors.status_bg);

    let (status, style) = if let Some(input) = &app.search_input {
        (format!("Search: {}_  (Enter:Go  Esc:Close)", input), base)
    } else if let Some(msg) = &app.status_message {
        (msg.clone(), base)
    } else if app.screen == Screen::Headlines && app.news.is_loading {
        ("Loading...".to_string(), base)
    } else if let Some(error) = app.news.error.as_ref().filter(|_| app.screen == Screen::Headlines) {
        (error.lines().collect::<Vec<_>>().join("; "), base.fg(colors.error))
    } else if app.maximized {
        ("j/k:Scroll  n/p:Page  m:Exit maximize  q:Quit".to_string(), base)
    } else if app.screen == Screen::Favorites {
        ("j/k:Nav  f:Remove  o:Open  Esc:Back  q:Quit".to_string(), base)
    } else {
        (
            "j/k:Nav  Tab:Pane  Enter:Select  f:Fav  o:Open  /:Search  R:Refresh  F:Favorites  q:Quit"
                .to_string(),
            base,
        )
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}
