use std::sync::Once;

use crossbeam_channel::Sender;
use parking_lot::{const_mutex, Mutex};
use retropixel_core::InputEvent;

static ROUTE: Mutex<Option<Sender<InputEvent>>> = const_mutex(None);
static INSTALL: Once = Once::new();

/// Deliver Ctrl-C as [`InputEvent::Quit`] on `tx` until the next call replaces it.
///
/// The process-wide handler is installed on first use.
pub(crate) fn route_interrupts_to(tx: Sender<InputEvent>) {
    *ROUTE.lock() = Some(tx);

    INSTALL.call_once(|| {
        let installed = ctrlc::set_handler(|| {
            log::info!("interrupt received");
            if let Some(tx) = ROUTE.lock().as_ref() {
                let _ = tx.send(InputEvent::Quit);
            }
        });

        if let Err(e) = installed {
            log::warn!("ctrl-c handler not installed: {e}");
        }
    });
}
