use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::core::dashboard::SurfaceEvent;

/// Translate a terminal event into a dashboard event.
///
/// Anything the dashboard does not react to maps to `None`.
pub fn map_event(event: Event) -> Option<SurfaceEvent> {
    match event {
        Event::Key(key) => map_key(key),
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(width, height) => Some(SurfaceEvent::Resize { width, height }),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<SurfaceEvent> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(SurfaceEvent::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(SurfaceEvent::Quit),
        KeyCode::Char('+') | KeyCode::Char('=') => Some(SurfaceEvent::TickerFaster),
        KeyCode::Char('-') => Some(SurfaceEvent::TickerSlower),
        _ => None,
    }
}

fn map_mouse(mouse: MouseEvent) -> Option<SurfaceEvent> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(SurfaceEvent::Click {
            column: mouse.column,
            row: mouse.row,
        }),
        _ => None,
    }
}
