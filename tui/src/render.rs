use crossterm::event::KeyCode;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Stylize as _;
use ratatui::text::Line;
use ratatui::text::Span;
use ratatui::widgets::Clear;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Widget;
use ratatui::widgets::WidgetRef;
use unicode_width::UnicodeWidthStr;

use crate::key_hint;
use crate::picker::AppPicker;
use crate::picker::Focus;
use crate::picker::RowVariant;
use crate::picker::StatusMessage;
use crate::picker::VisibleRow;

const SEARCH_LABEL: &str = "Search  ";
const SEARCH_ROW: u16 = 2;
const PLACEHOLDER_LABEL: &str = "Select application";

impl AppPicker {
    /// Terminal cursor position inside `area` while the search box has focus.
    pub fn cursor_pos(&self, area: Rect) -> Option<(u16, u16)> {
        if self.focus != Focus::Search || area.height <= SEARCH_ROW {
            return None;
        }
        let (before, _) = self.query.split_at_cursor();
        let offset = (SEARCH_LABEL.width() + before.width()) as u16;
        let x = area.x.saturating_add(offset).min(area.right().saturating_sub(1));
        Some((x, area.y + SEARCH_ROW))
    }

    fn header_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let label: Span<'static> = match &self.current_app {
            Some(name) => Span::from(name.clone()).bold(),
            None => PLACEHOLDER_LABEL.dim(),
        };
        lines.push(Line::from(vec![
            "Applications".bold().cyan(),
            "   ".into(),
            label,
        ]));

        let mut spans = vec![
            "Showing".dim(),
            format!(" {}/{}", self.tree.leaf_count(), self.apps.descriptors().len()).into(),
        ];
        if self.apps.is_loading() {
            spans.push("   ".into());
            spans.push("loading…".magenta());
        }
        lines.push(Line::from(spans));

        lines.push(self.search_line());
        lines.push(facet_line(
            "Spy     ",
            self.facets.source_kinds(),
            self.selection.active_source_kind.as_deref(),
            (self.focus == Focus::SourceKinds).then_some(self.source_cursor),
        ));
        lines.push(facet_line(
            "Type    ",
            self.facets.profile_types(),
            self.selection.active_profile_type.as_deref(),
            (self.focus == Focus::ProfileTypes).then_some(self.profile_cursor),
        ));

        if let Some(message) = &self.status {
            let span = match message {
                StatusMessage::Info(text) => Span::from(text.clone()).cyan(),
                StatusMessage::Error(text) => Span::from(text.clone()).red().bold(),
            };
            lines.push(Line::from(vec![span]));
        }

        lines.push(Line::from(""));
        lines
    }

    fn search_line(&self) -> Line<'static> {
        let label = if self.focus == Focus::Search {
            SEARCH_LABEL.bold().cyan()
        } else {
            SEARCH_LABEL.dim()
        };
        if self.query.as_str().is_empty() && self.focus != Focus::Search {
            return Line::from(vec![label, "type to filter".dim()]);
        }
        Line::from(vec![label, self.query.as_str().to_string().into()])
    }

    fn footer_lines(&self) -> [Line<'static>; 2] {
        let hint_spans = vec![
            "  ".into(),
            key_hint::plain(KeyCode::Enter),
            " select / expand  ".dim(),
            key_hint::plain(KeyCode::Tab),
            "/".into(),
            key_hint::plain(KeyCode::BackTab),
            " focus  ".dim(),
            key_hint::plain(KeyCode::Char(' ')),
            " toggle filter  ".dim(),
            key_hint::ctrl(KeyCode::Char('u')),
            " clear search  ".dim(),
            key_hint::ctrl(KeyCode::Char('r')),
            " refresh  ".dim(),
            key_hint::plain(KeyCode::Esc),
            " cancel".dim(),
        ];
        [Line::from(""), Line::from(hint_spans)]
    }

    fn entry_lines(&self) -> Vec<Line<'static>> {
        if self.visible.is_empty() {
            let message = if self.apps.is_loading() {
                "  Loading applications…".magenta()
            } else if self.apps.error().is_some() {
                "  No applications (refresh failed)".red()
            } else if self.apps.descriptors().is_empty() {
                "  No applications loaded yet".dim()
            } else {
                "  No applications match.".dim()
            };
            return vec![Line::from(message)];
        }

        let list_focused = self.focus == Focus::List;
        self.visible
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let highlighted = list_focused && index == self.highlight;
                let current = row.is_leaf()
                    && self.current_app.as_deref() == Some(row.display_name.as_str());
                format_row(row, highlighted, current)
            })
            .collect()
    }
}

fn facet_line<'a>(
    label: &'static str,
    values: impl Iterator<Item = &'a str>,
    active: Option<&str>,
    cursor: Option<usize>,
) -> Line<'static> {
    let mut spans: Vec<Span<'static>> = vec![if cursor.is_some() {
        label.bold().cyan()
    } else {
        label.dim()
    }];
    let mut any = false;
    for (index, value) in values.enumerate() {
        any = true;
        if index > 0 {
            spans.push(" ".into());
        }
        let mut chip: Span<'static> = if active == Some(value) {
            format!("[{value}]").cyan().bold()
        } else {
            format!(" {value} ").into()
        };
        if cursor == Some(index) {
            chip = chip.reversed();
        }
        spans.push(chip);
    }
    if !any {
        spans.push("none".dim());
    }
    Line::from(spans)
}

fn format_row(row: &VisibleRow, highlighted: bool, current: bool) -> Line<'static> {
    let marker = if highlighted { "›".cyan() } else { " ".into() };
    let indent = "  ".repeat(row.depth);
    let mut spans = vec![marker, " ".into(), indent.into()];
    match &row.variant {
        RowVariant::Group { open, children } => {
            spans.push(if *open { "▾".into() } else { "▸".into() });
            spans.push(" ".into());
            spans.push(format!("{}/", row.display_name).bold());
            spans.push(format!(" ({children})").dim());
        }
        RowVariant::Leaf { source_kind } => {
            spans.push("  ".into());
            let name = Span::from(row.display_name.clone());
            spans.push(if highlighted { name.bold() } else { name });
            spans.push("  ".into());
            spans.push(source_kind.clone().dim());
        }
    }
    if current {
        spans.push(" ✓".green());
    }
    Line::from(spans)
}

impl WidgetRef for &AppPicker {
    fn render_ref(&self, area: Rect, buf: &mut Buffer) {
        Clear.render(area, buf);
        let total_height = area.height as usize;
        if total_height == 0 {
            return;
        }
        let header = self.header_lines();
        let footer = self.footer_lines();
        let entries = self.entry_lines();

        let header_height = header.len().min(total_height);
        let footer_height = footer
            .len()
            .min(total_height.saturating_sub(header_height));
        let entries_capacity = total_height
            .saturating_sub(header_height)
            .saturating_sub(footer_height)
            .max(1);

        self.viewport_rows
            .set(entries_capacity.min(entries.len().max(1)));
        self.ensure_highlight_visible();

        let offset = self
            .scroll_offset
            .get()
            .min(entries.len().saturating_sub(self.viewport_rows.get()));
        let mut lines: Vec<Line<'static>> = Vec::with_capacity(total_height);
        lines.extend(header.into_iter().take(total_height));

        let entry_take = total_height
            .saturating_sub(lines.len())
            .min(self.viewport_rows.get());
        lines.extend(entries.into_iter().skip(offset).take(entry_take));

        for line in footer {
            if lines.len() == total_height {
                break;
            }
            lines.push(line);
        }

        Paragraph::new(lines).render_ref(area, buf);
    }
}
