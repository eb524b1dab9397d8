use crossbeam_channel::{Receiver, TryRecvError};

/// One event from the platform input source.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Window closed or the process was interrupted.
    Quit,
    Key(KeyEvent),
    MouseButton(MouseButtonEvent),
    /// Pointer position in window coordinates.
    MouseMove { x: f64, y: f64 },
    MouseWheel { dx: f64, dy: f64 },
    /// Anything the engine does not dispatch.
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonState {
    Pressed,
    Released,
}

impl ButtonState {
    #[inline]
    pub fn is_pressed(self) -> bool {
        matches!(self, ButtonState::Pressed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub logo: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    /// Platform scancode, 0 when unknown.
    pub scancode: u32,
    pub state: ButtonState,
    pub modifiers: Modifiers,
    pub repeat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MouseButtonEvent {
    pub button: MouseButton,
    pub state: ButtonState,
    /// 1 for a single click, 2 for a double click, ...
    pub clicks: u8,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Escape,
    Enter,
    Space,
    Tab,
    Backspace,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    F1, F2, F3, F4, F5, F6, F7, F8, F9,
    F10, F11, F12,

    Unknown,
}

/// Non-blocking event source polled by the input worker.
pub trait InputSource {
    /// Next pending event, or `None` when nothing is queued.
    fn poll(&mut self) -> Option<InputEvent>;
}

impl InputSource for Receiver<InputEvent> {
    fn poll(&mut self) -> Option<InputEvent> {
        match self.try_recv() {
            Ok(ev) => Some(ev),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                // Nobody can deliver a quit any more.
                log::warn!("input channel disconnected, treating as quit");
                Some(InputEvent::Quit)
            }
        }
    }
}
