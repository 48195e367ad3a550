// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

pub mod uinput_sink;

#[cfg(test)]
pub mod recording_sink;

use std::io;

use uinput_ioctls::codes::{EV_KEY, EV_REL, EV_SYN, SYN_REPORT};

pub use uinput_sink::{UinputSetup, UinputSink};

/// Consumer of input events, usually the host's input subsystem.
///
/// Events are queued by `emit` and become visible to readers as one batch
/// when `sync` is called.
pub trait EventSink {
    fn emit(&mut self, type_: u16, code: u16, value: i32) -> io::Result<()>;

    fn report_key(&mut self, code: u16, pressed: bool) -> io::Result<()> {
        self.emit(EV_KEY, code, pressed.into())
    }

    fn report_rel(&mut self, code: u16, delta: i32) -> io::Result<()> {
        self.emit(EV_REL, code, delta)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.emit(EV_SYN, SYN_REPORT, 0)
    }

    /// Removes the device from the input subsystem. Consumes the sink, so a
    /// sink can be unregistered at most once.
    fn unregister(self) -> io::Result<()>
    where
        Self: Sized;
}
