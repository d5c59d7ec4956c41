//! Translation of winit window events into canvas input.

use exray_core::{InputState, Key, KeyEvent, MouseButton, PointerEvent};
use kurbo::{Point, Vec2};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key as WinitKey, NamedKey};

/// Map a winit mouse button to a canvas button.
pub fn map_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Map a logical key to one the canvas reacts to.
pub fn map_key(key: &WinitKey) -> Option<Key> {
    match key {
        WinitKey::Named(NamedKey::Escape) => Some(Key::Escape),
        WinitKey::Character(c) => match c.as_str() {
            "1" => Some(Key::Digit1),
            "2" => Some(Key::Digit2),
            "3" => Some(Key::Digit3),
            "4" => Some(Key::Digit4),
            "5" => Some(Key::Digit5),
            "6" => Some(Key::Digit6),
            _ => None,
        },
        _ => None,
    }
}

/// Vertical wheel movement, positive away from the user.
pub fn wheel_delta(delta: MouseScrollDelta) -> Vec2 {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => Vec2::new(f64::from(x), f64::from(y)),
        MouseScrollDelta::PixelDelta(pos) => Vec2::new(pos.x, pos.y),
    }
}

fn key_event(key: Key, state: ElementState) -> KeyEvent {
    match state {
        ElementState::Pressed => KeyEvent::Pressed(key),
        ElementState::Released => KeyEvent::Released(key),
    }
}

fn button_event(button: MouseButton, state: ElementState, position: Point) -> PointerEvent {
    match state {
        ElementState::Pressed => PointerEvent::Down { position, button },
        ElementState::Released => PointerEvent::Up { position, button },
    }
}

/// Feed a window event into the input state. Returns `true` if it was an
/// input event the canvas cares about.
pub fn process_window_event(input: &mut InputState, event: &WindowEvent) -> bool {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            input.handle_pointer_event(PointerEvent::Move {
                position: Point::new(position.x, position.y),
            });
            true
        }
        WindowEvent::MouseInput { state, button, .. } => {
            let Some(button) = map_button(*button) else {
                return false;
            };
            let position = input.pointer_position;
            input.handle_pointer_event(button_event(button, *state, position));
            true
        }
        WindowEvent::MouseWheel { delta, .. } => {
            let position = input.pointer_position;
            input.handle_pointer_event(PointerEvent::Scroll {
                position,
                delta: wheel_delta(*delta),
            });
            true
        }
        WindowEvent::KeyboardInput { event, .. } => {
            if event.repeat {
                return false;
            }
            let Some(key) = map_key(&event.logical_key) else {
                return false;
            };
            input.handle_key_event(key_event(key, event.state));
            true
        }
        _ => false,
    }
}
