// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use crate::event_sink::EventSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Uninitialized,
    Registered,
    Open,
    Closed,
    Destroyed,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleState::Uninitialized => "uninitialized",
            LifecycleState::Registered => "registered",
            LifecycleState::Open => "open",
            LifecycleState::Closed => "closed",
            LifecycleState::Destroyed => "destroyed",
        };
        f.write_str(name)
    }
}

/// Scratch buffer an instruction is decoded into before it is translated.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PendingEvent {
    pub dx: i8,
    pub dy: i8,
    pub button_code: i8,
}

impl PendingEvent {
    pub fn reset(&mut self) {
        *self = PendingEvent::default();
    }
}

/// The one virtual pointer of the service.
#[derive(Debug)]
pub struct VirtualPointerDevice<S: EventSink> {
    /// Cursor offset. No instruction moves the pointer yet, so this stays
    /// at the origin.
    pub position: (i32, i32),
    pub pending_event: PendingEvent,
    pub sink: S,
}

impl<S: EventSink> VirtualPointerDevice<S> {
    pub fn new(sink: S) -> Self {
        Self {
            position: (0, 0),
            pending_event: PendingEvent::default(),
            sink,
        }
    }
}
