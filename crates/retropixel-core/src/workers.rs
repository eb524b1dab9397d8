use std::{
    thread,
    time::{Duration, Instant},
};

use crate::{
    game::Game,
    input::{InputEvent, InputSource},
    runtime::RuntimeState,
    signals::StopReason,
};

/// Idle sleep of the input-poll worker when the source has nothing queued.
pub const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Fixed-update worker body.
///
/// `interval` is the value snapshotted when the run started.
pub(crate) fn run_fixed_update<G: Game + ?Sized>(game: &G, runtime: &RuntimeState, interval: Duration) {
    let _trip = runtime.signal.trip_on_unwind();
    log::debug!("fixed update worker started (interval {}ms)", interval.as_millis());

    let mut last = Instant::now();
    while runtime.signal.is_running() {
        let start = Instant::now();
        game.on_fixed_update(start.duration_since(last).as_secs_f64());
        runtime.fixed_update_completed();
        last = start;

        if !runtime.signal.wait_timeout(interval) {
            break;
        }
    }

    log::debug!("fixed update worker stopped");
}

/// Input-poll worker body. The only place a normal run is ended from.
pub(crate) fn run_input_poll<G, I>(game: &G, runtime: &RuntimeState, input: &mut I)
where
    G: Game + ?Sized,
    I: InputSource + ?Sized,
{
    let _trip = runtime.signal.trip_on_unwind();
    log::debug!("input poll worker started");

    while runtime.signal.is_running() {
        match input.poll() {
            Some(InputEvent::Quit) => {
                if runtime.signal.request(StopReason::Quit) {
                    log::info!("quit requested");
                }
                break;
            }
            Some(event) => {
                dispatch_input(game, &event);
            }
            None => thread::sleep(INPUT_POLL_INTERVAL),
        }
    }

    log::debug!("input poll worker stopped");
}

/// Route one non-quit event to its hook. Returns `false` for events no hook takes.
pub fn dispatch_input<G: Game + ?Sized>(game: &G, event: &InputEvent) -> bool {
    match event {
        InputEvent::Key(key) => game.on_key(key),
        InputEvent::MouseButton(button) => game.on_mouse_click(button),
        InputEvent::MouseMove { x, y } => game.on_mouse_move(*x, *y),
        InputEvent::MouseWheel { dx, dy } => game.on_mouse_scroll(*dx, *dy),
        InputEvent::Quit | InputEvent::Other => return false,
    }
    true
}
