// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::io;
use std::sync::{Arc, Mutex};

use uinput_ioctls::codes::*;

use super::EventSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Key(u16, i32),
    Rel(u16, i32),
    Sync,
    Unregistered,
}

/// Sink that keeps every call in a log shared with the test, so the log
/// survives the sink being moved into the service and unregistered.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    log: Arc<Mutex<Vec<Recorded>>>,
    fail_after: Option<usize>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits succeed `n` times and then fail with `BrokenPipe`.
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn log(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn unregister_count(&self) -> usize {
        self.log()
            .iter()
            .filter(|r| **r == Recorded::Unregistered)
            .count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, type_: u16, code: u16, value: i32) -> io::Result<()> {
        let mut log = self.log.lock().unwrap();
        if let Some(n) = self.fail_after {
            if log.len() >= n {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
        }
        let recorded = match type_ {
            EV_KEY => Recorded::Key(code, value),
            EV_REL => Recorded::Rel(code, value),
            EV_SYN => Recorded::Sync,
            _ => panic!("unexpected event type {}", type_),
        };
        log.push(recorded);
        Ok(())
    }

    fn unregister(self) -> io::Result<()> {
        self.log.lock().unwrap().push(Recorded::Unregistered);
        Ok(())
    }
}
