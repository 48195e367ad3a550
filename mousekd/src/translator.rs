// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! Turns decoded instructions into input events.
//!
//! Per instruction the sink sees, in this order:
//!
//! 1. the marker key (`KEY_UP`) pressed and released, not synced
//! 2. `REL_X` + sync, only if the pending event carries a horizontal delta
//! 3. `REL_Y` + sync, only if the pending event carries a vertical delta
//! 4. the button transition + sync
//! 5. `REL_WHEEL` with the raw button code + sync
//!
//! After the last instruction every write ends with a right click
//! (press, release, sync), whatever the buffer contained.
//!
//! None of the current instructions sets a delta, so 2 and 3 never fire.
//! They stay in place for instructions that move the pointer.

use log::trace;
use std::io;
use uinput_ioctls::codes::{BTN_LEFT, BTN_RIGHT, KEY_UP, REL_WHEEL, REL_X, REL_Y};

use crate::command::{Button, Instruction, Instructions};
use crate::device::state::PendingEvent;
use crate::event_sink::EventSink;

pub const MARKER_KEY: u16 = KEY_UP;

fn button_code(button: Button) -> u16 {
    match button {
        Button::Left => BTN_LEFT,
        Button::Right => BTN_RIGHT,
    }
}

fn translate_one<S: EventSink>(sink: &mut S, pending: &PendingEvent) -> io::Result<()> {
    sink.report_key(MARKER_KEY, true)?;
    sink.report_key(MARKER_KEY, false)?;

    if pending.dx != 0 {
        sink.report_rel(REL_X, pending.dx.into())?;
        sink.sync()?;
    }
    if pending.dy != 0 {
        sink.report_rel(REL_Y, pending.dy.into())?;
        sink.sync()?;
    }

    if let Some(instruction) = Instruction::from_button_code(pending.button_code) {
        sink.report_key(button_code(instruction.button()), instruction.pressed())?;
        sink.sync()?;
    }

    // The button code doubles as the wheel delta.
    sink.report_rel(REL_WHEEL, pending.button_code.into())?;
    sink.sync()
}

/// Right click sent at the end of every write.
fn trailer<S: EventSink>(sink: &mut S) -> io::Result<()> {
    sink.report_key(BTN_RIGHT, true)?;
    sink.report_key(BTN_RIGHT, false)?;
    sink.sync()
}

/// Translates all instructions and the trailer. Returns how many
/// instructions were translated.
///
/// A sink error aborts the translation; events synced before it stay
/// visible.
pub fn translate<S: EventSink>(
    sink: &mut S,
    pending: &mut PendingEvent,
    mut instructions: Instructions<'_>,
) -> io::Result<usize> {
    let mut translated = 0;
    loop {
        pending.reset();
        let Some(instruction) = instructions.next() else {
            break;
        };
        pending.button_code = instruction.button_code();
        trace!("instruction {}: {:?}", instruction, pending);
        translate_one(sink, pending)?;
        translated += 1;
    }

    trailer(sink)?;
    Ok(translated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse;
    use crate::event_sink::recording_sink::{Recorded, RecordingSink};
    use Recorded::*;

    fn run(buf: &[u8]) -> (usize, Vec<Recorded>) {
        let mut sink = RecordingSink::new();
        let mut pending = PendingEvent::default();
        let translated = translate(&mut sink, &mut pending, parse(buf)).unwrap();
        assert_eq!(pending, PendingEvent::default());
        (translated, sink.log())
    }

    fn instruction_events(button: u16, pressed: bool, code: i32) -> Vec<Recorded> {
        vec![
            Key(KEY_UP, 1),
            Key(KEY_UP, 0),
            Key(button, pressed.into()),
            Sync,
            Rel(REL_WHEEL, code),
            Sync,
        ]
    }

    fn trailer_events() -> Vec<Recorded> {
        vec![Key(BTN_RIGHT, 1), Key(BTN_RIGHT, 0), Sync]
    }

    #[test]
    fn test_unknown_mode_only_emits_trailer() {
        let bufs: [&[u8]; 4] = [b"x_qQwW", b"", b"Q", b"hello world"];
        for buf in bufs {
            let (translated, log) = run(buf);
            assert_eq!(translated, 0);
            assert_eq!(log, trailer_events());
        }
    }

    #[test]
    fn test_all_four_instructions() {
        let (translated, log) = run(b"i_qQwW");
        assert_eq!(translated, 4);

        let mut expected = Vec::new();
        expected.extend(instruction_events(BTN_LEFT, true, 1));
        expected.extend(instruction_events(BTN_LEFT, false, 2));
        expected.extend(instruction_events(BTN_RIGHT, true, 3));
        expected.extend(instruction_events(BTN_RIGHT, false, 4));
        expected.extend(trailer_events());
        assert_eq!(log, expected);
    }

    #[test]
    fn test_stop_byte_still_runs_trailer() {
        let (translated, log) = run(b"i_qz");
        assert_eq!(translated, 1);

        let mut expected = instruction_events(BTN_LEFT, true, 1);
        expected.extend(trailer_events());
        assert_eq!(log, expected);
    }

    #[test]
    fn test_pending_deltas_emit_axis_events() {
        let mut sink = RecordingSink::new();
        let pending = PendingEvent {
            dx: 5,
            dy: -3,
            button_code: Instruction::LeftDown.button_code(),
        };
        translate_one(&mut sink, &pending).unwrap();
        assert_eq!(
            sink.log(),
            vec![
                Key(KEY_UP, 1),
                Key(KEY_UP, 0),
                Rel(REL_X, 5),
                Sync,
                Rel(REL_Y, -3),
                Sync,
                Key(BTN_LEFT, 1),
                Sync,
                Rel(REL_WHEEL, 1),
                Sync,
            ]
        );
    }

    #[test]
    fn test_sink_error_keeps_synced_events() {
        // fails on the wheel event of the first instruction
        let mut sink = RecordingSink::failing_after(4);
        let mut pending = PendingEvent::default();
        let err = translate(&mut sink, &mut pending, parse(b"i_qQ")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(
            sink.log(),
            vec![Key(KEY_UP, 1), Key(KEY_UP, 0), Key(BTN_LEFT, 1), Sync]
        );
    }
}
