// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

use std::iter::FusedIterator;

use super::{Instruction, Mode, INSTRUCTIONS_OFFSET, MAX_COMMAND_LEN};

/// Result of decoding a single instruction byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoded {
    Instruction(Instruction),
    /// Unknown byte. Ends the sequence, nothing after it is looked at.
    Stop,
}

pub fn decode(byte: u8) -> Decoded {
    match byte {
        b'q' => Decoded::Instruction(Instruction::LeftDown),
        b'Q' => Decoded::Instruction(Instruction::LeftUp),
        b'w' => Decoded::Instruction(Instruction::RightDown),
        b'W' => Decoded::Instruction(Instruction::RightUp),
        _ => Decoded::Stop,
    }
}

/// Lazily decoded instructions of one command buffer.
///
/// Each call to `next` decodes exactly one byte. Once a stop byte or the end
/// of the (truncated) buffer is reached the iterator stays exhausted.
#[derive(Debug, Clone)]
pub struct Instructions<'a> {
    remaining: &'a [u8],
}

impl<'a> Instructions<'a> {
    fn empty() -> Self {
        Instructions { remaining: &[] }
    }

    /// Bytes not yet decoded.
    pub fn remaining(&self) -> &'a [u8] {
        self.remaining
    }
}

impl Iterator for Instructions<'_> {
    type Item = Instruction;

    fn next(&mut self) -> Option<Instruction> {
        let (&byte, rest) = self.remaining.split_first()?;
        match decode(byte) {
            Decoded::Instruction(instruction) => {
                self.remaining = rest;
                Some(instruction)
            }
            Decoded::Stop => {
                self.remaining = &[];
                None
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining.len()))
    }
}

impl FusedIterator for Instructions<'_> {}

/// Splits a command buffer into its instruction sequence.
///
/// Buffers longer than [`MAX_COMMAND_LEN`] are clipped, buffers without a
/// recognized mode byte yield no instructions.
pub fn parse(buf: &[u8]) -> Instructions<'_> {
    let buf = &buf[..buf.len().min(MAX_COMMAND_LEN)];

    match buf.first().copied().and_then(Mode::from_byte) {
        Some(Mode::InstructionSequence) if buf.len() > INSTRUCTIONS_OFFSET => Instructions {
            remaining: &buf[INSTRUCTIONS_OFFSET..],
        },
        _ => Instructions::empty(),
    }
}
