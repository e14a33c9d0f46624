//! Source filtering for the eight Brainfuck instructions.

use std::fmt;

/// One of the eight recognized instruction symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `<`
    MoveLeft,
    /// `>`
    MoveRight,
    /// `[`
    LoopStart,
    /// `]`
    LoopEnd,
    /// `.`
    Output,
    /// `,`
    Input,
}

impl Instruction {
    /// Map a source character to its instruction, if it is one.
    pub fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '<' => Instruction::MoveLeft,
            '>' => Instruction::MoveRight,
            '[' => Instruction::LoopStart,
            ']' => Instruction::LoopEnd,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::MoveLeft => '<',
            Instruction::MoveRight => '>',
            Instruction::LoopStart => '[',
            Instruction::LoopEnd => ']',
            Instruction::Output => '.',
            Instruction::Input => ',',
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Filter `source` down to its instruction sequence, preserving order.
///
/// Everything else, including multi-byte characters, is dropped silently.
pub fn tokenize(source: &str) -> Vec<Instruction> {
    source.chars().filter_map(Instruction::from_char).collect()
}

/// Keep only Brainfuck instruction characters
pub fn bf_only(s: &str) -> String {
    s.chars()
        .filter(|c| matches!(c, '>' | '<' | '+' | '-' | '.' | ',' | '[' | ']'))
        .collect()
}

/// Render an instruction sequence back to its source characters.
pub fn render(instructions: &[Instruction]) -> String {
    instructions.iter().map(|i| i.as_char()).collect()
}
