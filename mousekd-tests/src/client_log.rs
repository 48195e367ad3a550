// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct LoggedWrite {
    pub command: String,

    pub requested: usize,

    /// What write(2) returned, or the errno if it failed
    pub result: Result<usize, i32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggedInputEvent {
    pub type_: u16,

    pub code: u16,

    pub value: i32,
}

#[derive(Serialize, Deserialize, Debug, Default)]
pub struct ClientLog {
    /// errno of a failed open, None if the device was opened
    pub open_error: Option<i32>,

    /// errno of opening the device a second time while it is open
    pub second_open_error: Option<i32>,

    pub writes: Vec<LoggedWrite>,

    pub read: Option<Result<usize, i32>>,

    /// Events seen on the evdev node of the virtual pointer
    pub events: Vec<LoggedInputEvent>,
}

impl ClientLog {
    /// Events of the given type and code, in order
    pub fn values_of(&self, type_: u16, code: u16) -> Vec<i32> {
        self.events
            .iter()
            .filter(|e| e.type_ == type_ && e.code == code)
            .map(|e| e.value)
            .collect()
    }
}
