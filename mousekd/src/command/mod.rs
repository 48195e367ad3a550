// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>

//! Command language of the control surface.
//!
//! A write is one command buffer. Byte 0 selects the mode, byte 1 is
//! reserved, and every following byte is a single instruction:
//!
//! ```text
//!  i _ q Q w W
//!  | | `-------- instructions, decoded one byte at a time
//!  | `---------- reserved, never looked at
//!  `------------ mode ('i' or 'I')
//! ```
//!
//! Only the first [`MAX_COMMAND_LEN`] bytes of a buffer are considered.

pub mod parser;

pub use parser::{parse, Instructions};

/// Bytes of a write that are interpreted. The rest is accepted and ignored.
pub const MAX_COMMAND_LEN: usize = 16;

/// Offset of the first instruction byte.
pub const INSTRUCTIONS_OFFSET: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `i`/`I`: the rest of the buffer is an instruction sequence.
    InstructionSequence,
}

impl Mode {
    pub fn from_byte(byte: u8) -> Option<Mode> {
        match byte {
            b'i' | b'I' => Some(Mode::InstructionSequence),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    LeftDown,
    LeftUp,
    RightDown,
    RightUp,
}

impl Instruction {
    /// Code stored in the pending event while the instruction is translated.
    pub fn button_code(self) -> i8 {
        match self {
            Instruction::LeftDown => 1,
            Instruction::LeftUp => 2,
            Instruction::RightDown => 3,
            Instruction::RightUp => 4,
        }
    }

    /// Inverse of [`Instruction::button_code`]. Zero means "no button".
    pub fn from_button_code(code: i8) -> Option<Instruction> {
        match code {
            1 => Some(Instruction::LeftDown),
            2 => Some(Instruction::LeftUp),
            3 => Some(Instruction::RightDown),
            4 => Some(Instruction::RightUp),
            _ => None,
        }
    }

    pub fn button(self) -> Button {
        match self {
            Instruction::LeftDown | Instruction::LeftUp => Button::Left,
            Instruction::RightDown | Instruction::RightUp => Button::Right,
        }
    }

    pub fn pressed(self) -> bool {
        matches!(self, Instruction::LeftDown | Instruction::RightDown)
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Instruction::LeftDown => "left-down",
            Instruction::LeftUp => "left-up",
            Instruction::RightDown => "right-down",
            Instruction::RightUp => "right-up",
        };
        f.write_str(name)
    }
}
