mod support;

use std::{
    panic::{self, AssertUnwindSafe},
    thread,
    time::Duration,
};

use retropixel_core::{
    ButtonState, EngineConfig, EngineError, EngineResult, EngineState, Frame, Game,
    HeadlessPlatform, HookStage, InputEvent, KeyCode, KeyEvent, Modifiers, MouseButton,
    MouseButtonEvent, StopReason, Engine, EXIT_CLEAN,
};
use support::{Recorder, RED};

fn config() -> EngineConfig {
    EngineConfig::new(64, 32, 8, "test").with_fixed_update_interval_ms(20)
}

#[test_log::test]
fn window_is_upscaled_logical_buffer() {
    let mut platform = HeadlessPlatform::new();
    let engine = Engine::new(config(), &mut platform, Recorder::default()).unwrap();
    assert_eq!(engine.window_size(), (512, 256));
    assert_eq!(engine.state(), EngineState::Uninitialized);
}

#[test_log::test]
fn invalid_config_is_a_construction_error() {
    let mut platform = HeadlessPlatform::new();
    let err = Engine::new(EngineConfig::new(0, 32, 8, "t"), &mut platform, Recorder::default())
        .err()
        .unwrap();
    assert!(matches!(err, EngineError::InvalidConfig(_)));
}

#[test_log::test]
fn quit_returns_clean_status_and_no_hook_runs_afterwards() {
    let mut platform = HeadlessPlatform::new();
    let probe = platform.probe();
    let quitter = platform.quit_after(Duration::from_millis(150));

    let mut engine = Engine::new(config(), &mut platform, Recorder::default()).unwrap();
    let status = engine.run().unwrap();
    quitter.join().unwrap();

    assert_eq!(status, EXIT_CLEAN);
    assert_eq!(engine.state(), EngineState::Stopped);
    assert_eq!(engine.runtime().stop_reason(), Some(StopReason::Quit));
    assert!(!engine.runtime().is_running());

    let calls = engine.game().hook_calls();
    assert!(engine.game().draw_count() > 0);
    assert!(engine.game().fixed_count() > 0);

    thread::sleep(Duration::from_millis(100));
    assert_eq!(engine.game().hook_calls(), calls);

    assert_eq!(probe.presented_frames(), engine.frame_count());
    assert_eq!(engine.game().draw_count(), engine.frame_count());
    assert_eq!(probe.lock_count(), probe.unlock_count());
}

#[test_log::test]
fn drawn_pixels_reach_the_presented_frame() {
    let mut platform = HeadlessPlatform::new();
    let probe = platform.probe();
    platform.quit_after(Duration::from_millis(50));

    let mut engine = Engine::new(config(), &mut platform, Recorder::default()).unwrap();
    engine.run().unwrap();

    let frame = probe.last_frame();
    assert_eq!(frame.len(), 64 * 32);
    assert_eq!(frame[32 + 16 * 64], RED);
    assert_eq!(frame.iter().filter(|&&p| p == RED).count(), 1);
}

#[test_log::test]
fn input_events_reach_hooks_in_order() {
    let mut platform = HeadlessPlatform::new();
    let tx = platform.input_sender();

    let key = |state| {
        InputEvent::Key(KeyEvent {
            code: KeyCode::A,
            scancode: 4,
            state,
            modifiers: Modifiers::default(),
            repeat: false,
        })
    };
    tx.send(key(ButtonState::Pressed)).unwrap();
    tx.send(key(ButtonState::Released)).unwrap();
    tx.send(InputEvent::Other).unwrap();
    tx.send(InputEvent::MouseButton(MouseButtonEvent {
        button: MouseButton::Left,
        state: ButtonState::Pressed,
        clicks: 1,
        x: 10.0,
        y: 20.0,
    }))
    .unwrap();
    tx.send(InputEvent::MouseMove { x: 1.5, y: 2.5 }).unwrap();
    tx.send(InputEvent::MouseWheel { dx: 0.0, dy: 1.0 }).unwrap();
    tx.send(InputEvent::Quit).unwrap();
    // Never delivered: the input worker stops at the quit.
    tx.send(InputEvent::MouseMove { x: 9.0, y: 9.0 }).unwrap();

    let mut engine = Engine::new(config(), &mut platform, Recorder::default()).unwrap();
    assert_eq!(engine.run().unwrap(), EXIT_CLEAN);

    assert_eq!(
        *engine.game().input.lock(),
        vec![
            "key A Pressed".to_string(),
            "key A Released".to_string(),
            "click Left Pressed".to_string(),
            "move 1.5 2.5".to_string(),
            "scroll 0 1".to_string(),
        ]
    );
}

#[test_log::test]
fn back_to_back_runs_release_everything() {
    let mut platform = HeadlessPlatform::new();
    let probe = platform.probe();

    for round in 1..=2 {
        platform.quit_after(Duration::from_millis(60));
        {
            let mut engine = Engine::new(config(), &mut platform, Recorder::default()).unwrap();
            assert_eq!(engine.run().unwrap(), EXIT_CLEAN);
            assert_eq!(engine.state(), EngineState::Stopped);
            assert_eq!(probe.live_windows(), 1);
        }
        assert_eq!(probe.live_windows(), 0, "round {round}");
    }

    assert_eq!(
        probe.teardown_order(),
        vec!["surface", "window", "surface", "window"]
    );
}

#[test_log::test]
fn events_left_after_a_quit_do_not_reach_the_next_run() {
    let mut platform = HeadlessPlatform::new();
    let tx = platform.input_sender();

    tx.send(InputEvent::Quit).unwrap();
    tx.send(InputEvent::MouseMove { x: 9.0, y: 9.0 }).unwrap();
    {
        let mut first = Engine::new(config(), &mut platform, Recorder::default()).unwrap();
        assert_eq!(first.run().unwrap(), EXIT_CLEAN);
        assert!(first.game().input.lock().is_empty());
    }

    platform.quit_after(Duration::from_millis(60));
    let mut second = Engine::new(config(), &mut platform, Recorder::default()).unwrap();
    assert_eq!(second.run().unwrap(), EXIT_CLEAN);
    assert!(
        second.game().input.lock().is_empty(),
        "stale input: {:?}",
        second.game().input.lock()
    );
}

#[test_log::test]
fn run_after_stop_is_rejected() {
    let mut platform = HeadlessPlatform::new();
    platform.quit_after(Duration::from_millis(30));

    let mut engine = Engine::new(config(), &mut platform, Recorder::default()).unwrap();
    engine.run().unwrap();

    let err = engine.run().unwrap_err();
    assert!(matches!(
        err,
        EngineError::InvalidState {
            op: "run",
            state: EngineState::Stopped
        }
    ));
}

#[test_log::test]
fn preload_is_one_shot() {
    let mut platform = HeadlessPlatform::new();
    let mut engine = Engine::new(config(), &mut platform, Recorder::default()).unwrap();

    engine.preload().unwrap();
    assert_eq!(engine.state(), EngineState::Ready);
    assert!(matches!(
        engine.preload(),
        Err(EngineError::InvalidState { op: "preload", .. })
    ));
}

#[test_log::test]
fn surface_failure_surfaces_at_preload() {
    let mut platform = HeadlessPlatform::with_failing_surfaces();
    let probe = platform.probe();
    let mut engine = Engine::new(config(), &mut platform, Recorder::default()).unwrap();

    let err = engine.run().unwrap_err();
    assert!(matches!(err, EngineError::Platform(_)));
    assert_eq!(engine.state(), EngineState::Uninitialized);
    assert_eq!(engine.game().hook_calls(), 0);
    assert_eq!(probe.live_windows(), 0);
}

struct FailingDraw {
    after: u64,
    draws: std::sync::atomic::AtomicU64,
}

impl Game for FailingDraw {
    fn on_draw(&self, _frame: &mut Frame<'_>) -> EngineResult<()> {
        let n = self.draws.fetch_add(1, std::sync::atomic::Ordering::AcqRel);
        if n >= self.after {
            return Err(EngineError::other("out of ink"));
        }
        Ok(())
    }
}

#[test_log::test]
fn draw_error_unlocks_stops_workers_and_is_returned() {
    let mut platform = HeadlessPlatform::new();
    let probe = platform.probe();
    let game = FailingDraw {
        after: 5,
        draws: Default::default(),
    };

    let mut engine = Engine::new(config(), &mut platform, game).unwrap();
    let err = engine.run().unwrap_err();

    match err {
        EngineError::Hook { hook, cause } => {
            assert_eq!(hook, HookStage::Draw);
            assert_eq!(cause.to_string(), "out of ink");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(engine.state(), EngineState::Stopped);
    assert_eq!(engine.runtime().stop_reason(), Some(StopReason::Fault));
    assert_eq!(probe.lock_count(), 6);
    assert_eq!(probe.unlock_count(), 6);
    assert_eq!(probe.presented_frames(), 5);
}

struct PanickingDraw;

impl Game for PanickingDraw {
    fn on_draw(&self, _frame: &mut Frame<'_>) -> EngineResult<()> {
        panic!("draw hook exploded");
    }
}

#[test_log::test]
fn draw_panic_still_unlocks_and_joins_workers() {
    let mut platform = HeadlessPlatform::new();
    let probe = platform.probe();
    let mut engine = Engine::new(config(), &mut platform, PanickingDraw).unwrap();

    let result = panic::catch_unwind(AssertUnwindSafe(|| engine.run()));
    assert!(result.is_err());

    assert_eq!(engine.runtime().stop_reason(), Some(StopReason::Fault));
    assert_eq!(probe.lock_count(), 1);
    assert_eq!(probe.unlock_count(), 1);
    assert_eq!(probe.presented_frames(), 0);
}

#[test_log::test]
fn fps_is_published_to_hooks_and_title() {
    let mut platform = HeadlessPlatform::new();
    let probe = platform.probe();
    platform.quit_after(Duration::from_millis(2300));

    let mut engine = Engine::new(config(), &mut platform, Recorder::default()).unwrap();
    engine.run().unwrap();

    let fps = engine.fps();
    assert!(fps > 0.0);

    // 0 before the first boundary, then one value per elapsed second.
    let seen = engine.game().fps_seen.lock().clone();
    assert_eq!(seen.first().copied(), Some(0.0));
    assert!(seen.len() >= 2 && seen.len() <= 3, "fps updates: {seen:?}");

    let title = probe.title();
    assert!(title.starts_with("test ["), "title: {title}");
    assert!(title.ends_with(" FPS]"), "title: {title}");
}

/// Each frame sleeps longer than the last, so no two seconds draw the same number of frames.
#[derive(Default)]
struct SlowingDraw {
    seen: parking_lot::Mutex<Vec<(f64, u64)>>,
}

impl Game for SlowingDraw {
    fn on_draw(&self, frame: &mut Frame<'_>) -> EngineResult<()> {
        {
            let mut seen = self.seen.lock();
            if seen.last().map(|&(fps, _)| fps) != Some(frame.fps()) {
                seen.push((frame.fps(), frame.index()));
            }
        }
        thread::sleep(Duration::from_micros(1000 + 20 * frame.index()));
        Ok(())
    }
}

#[test_log::test]
fn published_fps_counts_the_frames_of_the_previous_second() {
    let mut platform = HeadlessPlatform::new();
    platform.quit_after(Duration::from_millis(2300));

    let mut engine = Engine::new(config(), &mut platform, SlowingDraw::default()).unwrap();
    engine.run().unwrap();

    let seen = engine.game().seen.lock().clone();
    assert_eq!(seen.first().copied(), Some((0.0, 0)));
    assert!(seen.len() >= 3, "fps updates: {seen:?}");

    for pair in seen.windows(2) {
        let ((_, prev_index), (fps, index)) = (pair[0], pair[1]);
        assert!(fps > 0.0, "fps updates: {seen:?}");
        assert_eq!(fps, (index - prev_index) as f64, "fps updates: {seen:?}");
    }
}
