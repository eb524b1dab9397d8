use std::{sync::Arc, time::Instant};

use crossbeam_channel::Sender;
use retropixel_core::{InputEvent, KeyEvent, Modifiers, MouseButtonEvent};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::{
    config::WindowRequest,
    input_bridge::{
        key_index, map_key, map_modifiers, map_mouse_button, map_state, scroll_lines, ClickCounter,
    },
};

/// Event-loop side of the platform: opens requested windows and forwards
/// events of the active one to the engine's input channel.
#[derive(Default)]
pub(crate) struct Host {
    pending: Option<WindowRequest>,
    created: Option<Result<Arc<Window>, String>>,
    active: Option<WindowId>,
    events: Option<Sender<InputEvent>>,

    modifiers: Modifiers,
    cursor: (f64, f64),
    clicks: ClickCounter,
}

impl Host {
    /// Open a window on the next pump and route its events to `events`.
    pub(crate) fn request_window(&mut self, request: WindowRequest, events: Sender<InputEvent>) {
        self.pending = Some(request);
        self.created = None;
        self.active = None;
        self.events = Some(events);
        self.modifiers = Modifiers::default();
        self.cursor = (0.0, 0.0);
        self.clicks = ClickCounter::default();
    }

    pub(crate) fn take_created(&mut self) -> Option<Result<Arc<Window>, String>> {
        self.created.take()
    }

    pub(crate) fn send(&self, ev: InputEvent) {
        if let Some(tx) = &self.events {
            // The receiver is gone once the engine's input worker finished.
            let _ = tx.send(ev);
        }
    }

    fn create_pending(&mut self, event_loop: &ActiveEventLoop) {
        let Some(request) = self.pending.take() else {
            return;
        };

        let result = event_loop
            .create_window(request.attributes())
            .map(|w| {
                log::info!(
                    "window '{}' opened ({}x{})",
                    request.title,
                    request.size.0,
                    request.size.1
                );
                Arc::new(w)
            })
            .map_err(|e| format!("create_window failed: {e}"));

        if let Ok(w) = &result {
            self.active = Some(w.id());
        }
        self.created = Some(result);
    }

    /// Forward an event of the active window to the run's input channel.
    fn route(&mut self, window_id: WindowId, event: WindowEvent) {
        if self.active != Some(window_id) {
            return;
        }

        if let Some(ev) = self.translate(event) {
            self.send(ev);
        }
    }

    fn translate(&mut self, event: WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::CloseRequested => Some(InputEvent::Quit),

            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = map_modifiers(m.state());
                None
            }

            WindowEvent::KeyboardInput { event, .. } => Some(InputEvent::Key(KeyEvent {
                code: map_key(&event.physical_key),
                scancode: key_index(&event.physical_key),
                state: map_state(event.state),
                modifiers: self.modifiers,
                repeat: event.repeat,
            })),

            WindowEvent::MouseInput { state, button, .. } => {
                let button = map_mouse_button(button);
                let state = map_state(state);
                let clicks = self.clicks.register(button, state, Instant::now());
                let (x, y) = self.cursor;

                Some(InputEvent::MouseButton(MouseButtonEvent {
                    button,
                    state,
                    clicks,
                    x,
                    y,
                }))
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x, position.y);
                Some(InputEvent::MouseMove {
                    x: position.x,
                    y: position.y,
                })
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = scroll_lines(delta);
                Some(InputEvent::MouseWheel { dx, dy })
            }

            _ => None,
        }
    }
}

impl ApplicationHandler for Host {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        self.create_pending(event_loop);
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        self.route(window_id, event);
    }
}
