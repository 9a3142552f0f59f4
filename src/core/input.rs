//! Input drivers: the only place key events leave the process
//!
//! Higher layers see a press/release/poll/wait capability and nothing else.
//! `wait` lives on the driver so that test doubles can record delays
//! instead of sleeping through them.

use std::time::Duration;
use tracing::debug;
use crate::types::{OpenerError, Result};

/// Press/release a key by hardware scan code, poll a virtual key, wait
pub trait InputDriver {
    /// Key-down for `scancode`
    fn press(&mut self, scancode: u16);

    /// Key-up for `scancode`
    fn release(&mut self, scancode: u16);

    /// Whether `virtual_key` is currently held
    fn is_key_down(&mut self, virtual_key: u16) -> bool;

    /// Block for `duration`
    fn wait(&mut self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

impl<D: InputDriver + ?Sized> InputDriver for Box<D> {
    fn press(&mut self, scancode: u16) {
        (**self).press(scancode)
    }

    fn release(&mut self, scancode: u16) {
        (**self).release(scancode)
    }

    fn is_key_down(&mut self, virtual_key: u16) -> bool {
        (**self).is_key_down(virtual_key)
    }

    fn wait(&mut self, duration: Duration) {
        (**self).wait(duration)
    }
}

// =============================================================================
// RECORDING DRIVER
// =============================================================================

/// Everything a driver was asked to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Press(u16),
    Release(u16),
    Wait(Duration),
    Poll(u16),
}

/// Test double: records events, never sleeps
#[derive(Debug, Default)]
pub struct RecordingDriver {
    events: Vec<KeyEvent>,
    /// Polls that report "up" before the start key reads as held
    polls_before_start: usize,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start key reads as held only after `polls` unsuccessful polls
    pub fn with_start_after(polls: usize) -> Self {
        Self {
            events: Vec::new(),
            polls_before_start: polls,
        }
    }

    pub fn events(&self) -> &[KeyEvent] {
        &self.events
    }

    /// Durations between each press and its release, in order
    pub fn hold_times(&self) -> Vec<Duration> {
        let mut holds = Vec::new();
        let mut current: Option<Duration> = None;
        for event in &self.events {
            match event {
                KeyEvent::Press(_) => current = Some(Duration::ZERO),
                KeyEvent::Wait(d) => {
                    if let Some(held) = current.as_mut() {
                        *held += *d;
                    }
                }
                KeyEvent::Release(_) => {
                    if let Some(held) = current.take() {
                        holds.push(held);
                    }
                }
                KeyEvent::Poll(_) => {}
            }
        }
        holds
    }

    /// Number of press events
    pub fn press_count(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, KeyEvent::Press(_))).count()
    }

    /// Number of start-key polls
    pub fn poll_count(&self) -> usize {
        self.events.iter().filter(|e| matches!(e, KeyEvent::Poll(_))).count()
    }

    /// Sum of all recorded waits
    pub fn total_wait(&self) -> Duration {
        self.events
            .iter()
            .filter_map(|e| match e {
                KeyEvent::Wait(d) => Some(*d),
                _ => None,
            })
            .sum()
    }
}

impl InputDriver for RecordingDriver {
    fn press(&mut self, scancode: u16) {
        self.events.push(KeyEvent::Press(scancode));
    }

    fn release(&mut self, scancode: u16) {
        self.events.push(KeyEvent::Release(scancode));
    }

    fn is_key_down(&mut self, virtual_key: u16) -> bool {
        self.events.push(KeyEvent::Poll(virtual_key));
        if self.polls_before_start == 0 {
            true
        } else {
            self.polls_before_start -= 1;
            false
        }
    }

    fn wait(&mut self, duration: Duration) {
        self.events.push(KeyEvent::Wait(duration));
    }
}

// =============================================================================
// DRY RUN DRIVER
// =============================================================================

/// Logs key events instead of sending them; the start key is always "held"
#[derive(Debug, Default)]
pub struct DryRunDriver {
    /// Skip waits entirely (fast preview of a whole run)
    pub skip_waits: bool,
}

impl DryRunDriver {
    pub fn new(skip_waits: bool) -> Self {
        Self { skip_waits }
    }
}

impl InputDriver for DryRunDriver {
    fn press(&mut self, scancode: u16) {
        debug!(scancode, "key down (dry run)");
    }

    fn release(&mut self, scancode: u16) {
        debug!(scancode, "key up (dry run)");
    }

    fn is_key_down(&mut self, _virtual_key: u16) -> bool {
        true
    }

    fn wait(&mut self, duration: Duration) {
        if !self.skip_waits && !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

// =============================================================================
// SYSTEM DRIVER
// =============================================================================

#[cfg(windows)]
mod send_input {
    use super::InputDriver;
    use tracing::{debug, warn};
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        GetAsyncKeyState, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT,
        KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP, KEYEVENTF_SCANCODE, VIRTUAL_KEY,
    };

    /// `SendInput` with scan codes, so the game sees hardware-like events
    #[derive(Debug, Default)]
    pub struct SendInputDriver;

    impl SendInputDriver {
        fn send(&self, scancode: u16, flags: KEYBD_EVENT_FLAGS) {
            let input = INPUT {
                r#type: INPUT_KEYBOARD,
                Anonymous: INPUT_0 {
                    ki: KEYBDINPUT {
                        wVk: VIRTUAL_KEY(0),
                        wScan: scancode,
                        dwFlags: flags,
                        time: 0,
                        dwExtraInfo: 0,
                    },
                },
            };
            // SAFETY: one fully initialised INPUT and its exact size
            let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
            if sent != 1 {
                // Open loop: report and carry on
                warn!(scancode, "SendInput rejected the event");
            }
        }
    }

    impl InputDriver for SendInputDriver {
        fn press(&mut self, scancode: u16) {
            debug!(scancode, "key down");
            self.send(scancode, KEYEVENTF_SCANCODE);
        }

        fn release(&mut self, scancode: u16) {
            debug!(scancode, "key up");
            self.send(scancode, KEYEVENTF_SCANCODE | KEYEVENTF_KEYUP);
        }

        fn is_key_down(&mut self, virtual_key: u16) -> bool {
            // SAFETY: plain query of global key state
            let state = unsafe { GetAsyncKeyState(i32::from(virtual_key)) };
            (state as u16) & 0x8000 != 0
        }
    }
}

#[cfg(windows)]
pub use send_input::SendInputDriver;

/// Driver that really reaches the game on this platform
pub fn system_driver() -> Result<Box<dyn InputDriver>> {
    #[cfg(windows)]
    {
        Ok(Box::new(SendInputDriver))
    }
    #[cfg(not(windows))]
    {
        Err(OpenerError::InputUnavailable(
            "key injection is only implemented for Windows; use --dry-run".to_string(),
        ))
    }
}

// =============================================================================
// TESTS
// =============================================================================
