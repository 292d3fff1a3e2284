use std::io::Result;

use crossterm::event::Event;
use crossterm::event::EventStream;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio_stream::StreamExt;
use tracing::debug;

use crate::picker::AppPicker;
use crate::picker::PickerOutcome;

/// Drive `picker` from terminal events until the user selects an
/// application or cancels.
///
/// A picker whose inventory was never loaded is refreshed before the first
/// frame. Closing the event stream counts as cancelling.
pub async fn run_app_picker<B: Backend>(
    terminal: &mut Terminal<B>,
    picker: &mut AppPicker,
) -> Result<PickerOutcome> {
    draw(terminal, picker)?;
    if picker.is_pristine() {
        picker.refresh();
        draw(terminal, picker)?;
    }

    let mut events = EventStream::new();
    while !picker.is_done() {
        let Some(event) = events.next().await else {
            debug!("terminal event stream closed");
            break;
        };
        match event? {
            Event::Key(key) => picker.handle_key(key),
            Event::Paste(text) => picker.handle_paste(&text),
            Event::Resize(..) => {}
            _ => continue,
        }
        draw(terminal, picker)?;

        if picker.take_refresh_request() {
            picker.complete_refresh();
            draw(terminal, picker)?;
        }
    }

    Ok(picker
        .outcome()
        .cloned()
        .unwrap_or(PickerOutcome::Cancelled))
}

fn draw<B: Backend>(terminal: &mut Terminal<B>, picker: &AppPicker) -> Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        frame.render_widget_ref(picker, area);
        if let Some(position) = picker.cursor_pos(area) {
            frame.set_cursor_position(position);
        }
    })?;
    Ok(())
}
