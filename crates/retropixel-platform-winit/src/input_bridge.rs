use std::time::{Duration, Instant};

use retropixel_core::{ButtonState, KeyCode, Modifiers, MouseButton};
use winit::{
    event::{ElementState, MouseScrollDelta},
    keyboard::{self, ModifiersState, PhysicalKey},
};

/// Two presses of the same button within this window count as a multi-click.
pub const MULTI_CLICK_WINDOW: Duration = Duration::from_millis(500);

/// Pixel scroll deltas are reported in lines of this many pixels.
pub const PIXELS_PER_LINE: f64 = 40.0;

#[inline]
pub fn map_state(s: ElementState) -> ButtonState {
    match s {
        ElementState::Pressed => ButtonState::Pressed,
        ElementState::Released => ButtonState::Released,
    }
}

#[inline]
pub fn map_mouse_button(btn: winit::event::MouseButton) -> MouseButton {
    match btn {
        winit::event::MouseButton::Left => MouseButton::Left,
        winit::event::MouseButton::Right => MouseButton::Right,
        winit::event::MouseButton::Middle => MouseButton::Middle,
        winit::event::MouseButton::Back => MouseButton::Back,
        winit::event::MouseButton::Forward => MouseButton::Forward,
        winit::event::MouseButton::Other(v) => MouseButton::Other(v),
    }
}

#[inline]
pub fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        logo: m.super_key(),
    }
}

/// Platform-independent key index; 0 for keys winit cannot identify.
#[inline]
pub fn key_index(k: &PhysicalKey) -> u32 {
    match k {
        PhysicalKey::Code(c) => *c as u32,
        PhysicalKey::Unidentified(_) => 0,
    }
}

/// Wheel movement in lines, positive `dy` away from the user.
#[inline]
pub fn scroll_lines(delta: MouseScrollDelta) -> (f64, f64) {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => (f64::from(x), f64::from(y)),
        MouseScrollDelta::PixelDelta(p) => (p.x / PIXELS_PER_LINE, p.y / PIXELS_PER_LINE),
    }
}

pub fn map_key(k: &PhysicalKey) -> KeyCode {
    use keyboard::KeyCode as W;

    let PhysicalKey::Code(code) = k else {
        return KeyCode::Unknown;
    };

    match code {
        W::Escape => KeyCode::Escape,
        W::Enter | W::NumpadEnter => KeyCode::Enter,
        W::Space => KeyCode::Space,
        W::Tab => KeyCode::Tab,
        W::Backspace => KeyCode::Backspace,

        W::ArrowUp => KeyCode::ArrowUp,
        W::ArrowDown => KeyCode::ArrowDown,
        W::ArrowLeft => KeyCode::ArrowLeft,
        W::ArrowRight => KeyCode::ArrowRight,

        W::KeyA => KeyCode::A,
        W::KeyB => KeyCode::B,
        W::KeyC => KeyCode::C,
        W::KeyD => KeyCode::D,
        W::KeyE => KeyCode::E,
        W::KeyF => KeyCode::F,
        W::KeyG => KeyCode::G,
        W::KeyH => KeyCode::H,
        W::KeyI => KeyCode::I,
        W::KeyJ => KeyCode::J,
        W::KeyK => KeyCode::K,
        W::KeyL => KeyCode::L,
        W::KeyM => KeyCode::M,
        W::KeyN => KeyCode::N,
        W::KeyO => KeyCode::O,
        W::KeyP => KeyCode::P,
        W::KeyQ => KeyCode::Q,
        W::KeyR => KeyCode::R,
        W::KeyS => KeyCode::S,
        W::KeyT => KeyCode::T,
        W::KeyU => KeyCode::U,
        W::KeyV => KeyCode::V,
        W::KeyW => KeyCode::W,
        W::KeyX => KeyCode::X,
        W::KeyY => KeyCode::Y,
        W::KeyZ => KeyCode::Z,

        W::Digit0 => KeyCode::Digit0,
        W::Digit1 => KeyCode::Digit1,
        W::Digit2 => KeyCode::Digit2,
        W::Digit3 => KeyCode::Digit3,
        W::Digit4 => KeyCode::Digit4,
        W::Digit5 => KeyCode::Digit5,
        W::Digit6 => KeyCode::Digit6,
        W::Digit7 => KeyCode::Digit7,
        W::Digit8 => KeyCode::Digit8,
        W::Digit9 => KeyCode::Digit9,

        W::F1 => KeyCode::F1,
        W::F2 => KeyCode::F2,
        W::F3 => KeyCode::F3,
        W::F4 => KeyCode::F4,
        W::F5 => KeyCode::F5,
        W::F6 => KeyCode::F6,
        W::F7 => KeyCode::F7,
        W::F8 => KeyCode::F8,
        W::F9 => KeyCode::F9,
        W::F10 => KeyCode::F10,
        W::F11 => KeyCode::F11,
        W::F12 => KeyCode::F12,

        _ => KeyCode::Unknown,
    }
}

/// Counts consecutive presses of one button for `MouseButtonEvent::clicks`.
#[derive(Debug, Default)]
pub struct ClickCounter {
    last: Option<(MouseButton, Instant)>,
    count: u8,
}

impl ClickCounter {
    /// Register a button transition. Releases report the count of the press they end.
    pub fn register(&mut self, button: MouseButton, state: ButtonState, now: Instant) -> u8 {
        if state == ButtonState::Released {
            return self.count.max(1);
        }

        let chained = matches!(
            self.last,
            Some((prev, at)) if prev == button && now.saturating_duration_since(at) <= MULTI_CLICK_WINDOW
        );

        self.count = if chained { self.count.saturating_add(1) } else { 1 };
        self.last = Some((button, now));
        self.count
    }
}
