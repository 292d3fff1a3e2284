use crossterm::event::KeyCode;
use ratatui::style::Stylize;
use ratatui::text::Span;

pub(crate) fn plain(key: KeyCode) -> Span<'static> {
    Span::from(key_label(key)).bold()
}

pub(crate) fn ctrl(key: KeyCode) -> Span<'static> {
    Span::from(format!("ctrl+{}", key_label(key))).bold()
}

fn key_label(key: KeyCode) -> String {
    match key {
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::BackTab => "shift+tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(ch) => ch.to_string(),
        other => format!("{other:?}").to_lowercase(),
    }
}
