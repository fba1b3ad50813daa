use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, List, ListItem, Paragraph, Wrap},
};
use sharetree_remote_api::{EntryKind, IndexState};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::time::Instant;
use unicode_width::UnicodeWidthStr;

use super::format::{fmt_size, match_ranges, truncate};
use super::state::{App, Focus};
use super::theme::Theme;
use crate::browser::BrowserState;
use crate::preview::{PreviewContent, PreviewKind, PreviewState, TextEncoding};
use crate::search::{ResultsView, SearchView};
use crate::session::ConnectionStatus;
use crate::tree::{ExpansionState, TreeRow};

const BREADCRUMB_SEPARATOR: &str = " › ";

impl<'a> App<'a> {
    pub(crate) fn draw(&mut self, frame: &mut Frame) {
        let now = Instant::now();
        let browser = self.browser.clone();
        let state = browser.state();
        let theme = self.theme;

        let mut constraints = vec![Constraint::Length(1), Constraint::Min(3)];
        if self.show_logs {
            constraints.push(Constraint::Percentage(35));
        }
        constraints.push(Constraint::Length(1));
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(frame.area());

        self.render_header(frame, layout[0], &state, now);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(layout[1]);
        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(body[0]);

        self.render_input(frame, left[0]);
        render_filter_bar(frame, left[1], &state, &theme);
        match state.search().view() {
            SearchView::Tree | SearchView::LocalFilter(_) => {
                self.render_tree(frame, left[2], &state, now);
            }
            SearchView::Loading { query } => {
                let line = Line::from(vec![
                    spinner_span(&self.throbber_state, &theme),
                    Span::styled(format!("Searching for \"{query}\"..."), theme.muted_style()),
                ]);
                let block = self.list_block("Results", Focus::Results);
                frame.render_widget(Paragraph::new(line).block(block), left[2]);
            }
            SearchView::Results(results) => self.render_results(frame, left[2], results),
            SearchView::Failed { message, .. } => {
                let text = vec![
                    Line::styled(format!("Search failed: {message}"), theme.error_style()),
                    Line::styled("Press Enter or r to retry", theme.muted_style()),
                ];
                let block = self.list_block("Results", Focus::Results);
                let widget = Paragraph::new(text).block(block).wrap(Wrap { trim: true });
                frame.render_widget(widget, left[2]);
            }
        }

        self.render_preview(frame, body[1], state.preview().state());

        if self.show_logs {
            self.logs.render(frame, layout[2], &theme);
        }
        self.render_status(frame, layout[layout.len() - 1], &state);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect, state: &BrowserState, now: Instant) {
        let theme = &self.theme;
        let mut line = Line::from(Span::styled(" sharetree ", theme.header_style()));
        line.spans.push(Span::raw(" "));
        match state.session().status() {
            ConnectionStatus::Disconnected => {
                line.spans.push(Span::styled("Not connected", theme.muted_style()));
            }
            ConnectionStatus::Connecting => {
                line.spans.push(spinner_span(&self.throbber_state, theme));
                line.spans.push(Span::styled("Connecting...", theme.muted_style()));
            }
            ConnectionStatus::Connected => {
                let label = state
                    .session()
                    .context()
                    .map(|context| context.label())
                    .unwrap_or_default();
                let count = state.session().collections().len();
                let noun = if count == 1 { "collection" } else { "collections" };
                line.spans.push(Span::raw(label));
                line.spans.push(Span::styled(
                    format!("  {count} {noun}"),
                    theme.muted_style(),
                ));
            }
            ConnectionStatus::Failed(message) => {
                line.spans.push(Span::styled(
                    format!("Connection failed: {message}"),
                    theme.error_style(),
                ));
            }
        }
        let Some(badge) = state.index().badge(now, self.browser.options().ready_fade) else {
            frame.render_widget(Paragraph::new(line), area);
            return;
        };
        let mut badge_line = Line::default();
        let style = match badge.state {
            IndexState::Indexing => {
                badge_line.spans.push(spinner_span(&self.throbber_state, theme));
                theme.muted_style()
            }
            IndexState::Ready => theme.success_style(),
            IndexState::Error => theme.error_style(),
            IndexState::Idle => theme.muted_style(),
        };
        badge_line.spans.push(Span::styled(format!("{} ", badge.text), style));
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(badge_line.width() as u16)])
            .split(area);
        frame.render_widget(Paragraph::new(line), columns[0]);
        frame.render_widget(
            Paragraph::new(badge_line).alignment(Alignment::Right),
            columns[1],
        );
    }

    fn render_input(&mut self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Search;
        let block = Block::bordered()
            .title("Search")
            .border_style(self.theme.border_style(focused));
        self.input.set_block(block);
        let cursor = if focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        self.input.set_cursor_style(cursor);
        self.input.set_style(self.theme.prompt_style());
        frame.render_widget(&self.input, area);
    }

    fn list_block(&self, title: impl Into<Line<'static>>, pane: Focus) -> Block<'static> {
        Block::bordered()
            .title(title)
            .border_style(self.theme.border_style(self.focus == pane))
    }

    fn render_tree(&mut self, frame: &mut Frame, area: Rect, state: &BrowserState, now: Instant) {
        let theme = self.theme;
        let title = match state.search().view() {
            SearchView::LocalFilter(matches) => {
                format!("Loaded matches: {}", matches.match_count())
            }
            _ => "Tree".to_string(),
        };
        let block = self.list_block(title, Focus::Tree);

        let filter = match state.search().view() {
            SearchView::LocalFilter(matches) => Some(matches),
            _ => None,
        };
        let rows = state.tree().rows(filter);
        if rows.is_empty() {
            let message = match (state.session().status(), filter) {
                (ConnectionStatus::Connected, Some(_)) => "No loaded entries match",
                (ConnectionStatus::Connected, None) => "No collections",
                _ => "",
            };
            let widget = Paragraph::new(Line::styled(message, theme.muted_style()))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(widget, area);
            return;
        }

        let active = state.highlighted(now);
        let width = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| {
                let is_active = active == Some(&row.path);
                ListItem::new(tree_line(row, is_active, width, &self.throbber_state, &theme))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(self.highlight_for(Focus::Tree));
        frame.render_stateful_widget(list, area, &mut self.tree_state);
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect, results: &ResultsView) {
        let theme = self.theme;
        let block = self.list_block(results.summary(), Focus::Results);
        if results.hits.is_empty() {
            let widget = Paragraph::new(Line::styled("No results", theme.muted_style()))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(widget, area);
            return;
        }

        let width = area.width.saturating_sub(2) as usize;
        let terms = results.query.terms();
        let items: Vec<ListItem> = results
            .hits
            .iter()
            .map(|hit| {
                let glyph = match hit.kind {
                    EntryKind::Container => "▸ ",
                    EntryKind::Leaf => "  ",
                };
                let name = truncate(&hit.name, width.saturating_sub(2));
                let mut spans = vec![Span::raw(glyph)];
                spans.extend(highlighted(&name, &terms, &theme));
                let room = width.saturating_sub(2 + name.width() + 2);
                if !hit.parent().is_empty() && room > 0 {
                    spans.push(Span::styled(
                        format!("  {}", truncate(hit.parent(), room)),
                        theme.muted_style(),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(self.highlight_for(Focus::Results));
        frame.render_stateful_widget(list, area, &mut self.results_state);
    }

    fn highlight_for(&self, pane: Focus) -> Style {
        if self.focus == pane {
            self.theme.row_highlight_style()
        } else {
            Style::default().add_modifier(Modifier::UNDERLINED)
        }
    }

    fn render_preview(&self, frame: &mut Frame, area: Rect, preview: &PreviewState) {
        let theme = &self.theme;
        let title = match preview {
            PreviewState::Empty => "Preview".to_string(),
            PreviewState::Ready(content) => content.breadcrumbs().join(BREADCRUMB_SEPARATOR),
            PreviewState::Loading { path } | PreviewState::Failed { path, .. } => {
                std::iter::once(path.collection())
                    .chain(path.segments().iter().map(String::as_str))
                    .collect::<Vec<_>>()
                    .join(BREADCRUMB_SEPARATOR)
            }
        };
        let block = Block::bordered()
            .title(truncate(&title, area.width.saturating_sub(4) as usize))
            .border_style(theme.muted_style());

        let widget = match preview {
            PreviewState::Empty => Paragraph::new(Line::styled(
                "Select a file to preview",
                theme.muted_style(),
            ))
            .alignment(Alignment::Center),
            PreviewState::Loading { path } => Paragraph::new(Line::from(vec![
                spinner_span(&self.throbber_state, theme),
                Span::styled(format!("Loading {}...", path.name()), theme.muted_style()),
            ])),
            PreviewState::Failed { message, .. } => {
                Paragraph::new(Line::styled(format!("Error: {message}"), theme.error_style()))
                    .wrap(Wrap { trim: true })
            }
            PreviewState::Ready(content) => match &content.kind {
                PreviewKind::Text { text, .. } => Paragraph::new(text.as_str())
                    .wrap(Wrap { trim: false })
                    .scroll((self.preview_scroll, 0)),
                _ => Paragraph::new(self.preview_summary(content)),
            },
        };
        let block = match preview {
            PreviewState::Ready(content) => {
                block.title_bottom(Line::styled(details(content), theme.muted_style()))
            }
            _ => block,
        };
        frame.render_widget(widget.block(block), area);
    }

    fn preview_summary(&self, content: &PreviewContent) -> Vec<Line<'static>> {
        let theme = &self.theme;
        let label = match content.kind {
            PreviewKind::Image => "Image",
            PreviewKind::Pdf => "PDF document",
            PreviewKind::Document => "Word document",
            PreviewKind::Binary | PreviewKind::Text { .. } => "Binary file",
        };
        let mut lines = vec![
            Line::raw(format!("{label}, {}", fmt_size(content.size()))),
            Line::styled(content.content_type.clone(), theme.muted_style()),
            Line::raw(""),
        ];
        match &self.downloads {
            Some(dir) => lines.push(Line::styled(
                format!("Press s to save a copy to {}", dir.display()),
                theme.muted_style(),
            )),
            None => lines.push(Line::styled(
                "No preview available for this file type",
                theme.muted_style(),
            )),
        }
        lines
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, state: &BrowserState) {
        let theme = &self.theme;
        let line = match state.notice() {
            Some(notice) if notice.is_error => {
                Line::styled(notice.message.clone(), theme.error_style())
            }
            Some(notice) => Line::raw(notice.message.clone()),
            None => Line::styled(self.key_hints(), theme.muted_style()),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn key_hints(&self) -> &'static str {
        match self.focus {
            Focus::Tree => {
                "↑↓ move  ⏎ open  ← collapse  / search  R reconnect  C reindex  s save  F2 logs  q quit"
            }
            Focus::Search => "Esc clear  ⏎ results  ^N name  ^P path  ^T kind  ^E exact",
            Focus::Results => "↑↓ move  ⏎ open  l locate  r retry  s save  Esc clear  / edit",
            Focus::Logs => "Tab back  F2 close  h hide  f focus  +/- level",
        }
    }
}

fn render_filter_bar(frame: &mut Frame, area: Rect, state: &BrowserState, theme: &Theme) {
    let filters = state.search().filters();
    let exact = if filters.exact { "on" } else { "off" };
    let line = Line::from(vec![
        Span::styled(" Match ", theme.muted_style()),
        Span::styled(filters.scope.label(), theme.prompt_style()),
        Span::styled("  Kind ", theme.muted_style()),
        Span::styled(filters.kind.label(), theme.prompt_style()),
        Span::styled("  Exact ", theme.muted_style()),
        Span::styled(exact, theme.prompt_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn tree_line(
    row: &TreeRow,
    is_active: bool,
    width: usize,
    throbber_state: &ThrobberState,
    theme: &Theme,
) -> Line<'static> {
    let mut spans = vec![Span::raw("  ".repeat(row.depth))];
    match (row.kind, row.state) {
        (EntryKind::Container, ExpansionState::Expanding) => {
            spans.push(spinner_span(throbber_state, theme));
        }
        (EntryKind::Container, ExpansionState::Expanded) => spans.push(Span::raw("▾ ")),
        (EntryKind::Container, ExpansionState::Collapsed) => spans.push(Span::raw("▸ ")),
        (EntryKind::Leaf, _) => spans.push(Span::raw("  ")),
    }

    let size = row.size.map(fmt_size).unwrap_or_default();
    let used = row.depth * 2 + 2;
    let room = width.saturating_sub(used + size.chars().count() + 1);
    let name = truncate(&row.name, room);
    let name_style = if is_active {
        theme.active_style()
    } else if row.matched {
        theme.matched_style()
    } else {
        Style::default()
    };
    let padding = room.saturating_sub(name.width()) + 1;
    spans.push(Span::styled(name, name_style));
    if !size.is_empty() {
        spans.push(Span::raw(" ".repeat(padding)));
        spans.push(Span::styled(size, theme.muted_style()));
    }
    Line::from(spans)
}

/// Split `text` into plain and matched spans.
fn highlighted(text: &str, terms: &[String], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for range in match_ranges(text, terms) {
        if range.start > cursor {
            spans.push(Span::raw(text[cursor..range.start].to_string()));
        }
        spans.push(Span::styled(
            text[range.clone()].to_string(),
            theme.matched_style(),
        ));
        cursor = range.end;
    }
    if cursor < text.len() {
        spans.push(Span::raw(text[cursor..].to_string()));
    }
    spans
}

fn details(content: &PreviewContent) -> String {
    let mut details = format!(" {}  {} ", content.content_type, fmt_size(content.size()));
    if let PreviewKind::Text {
        encoding: TextEncoding::Latin1,
        ..
    } = content.kind
    {
        details.push_str(" latin-1 ");
    }
    details
}

fn spinner_span(state: &ThrobberState, theme: &Theme) -> Span<'static> {
    Throbber::default()
        .style(theme.muted_style())
        .throbber_style(theme.muted_style())
        .to_symbol_span(state)
}
