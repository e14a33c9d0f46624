//! The tape machine.
//!
//! An [`Interpreter`] owns the memory tape, the data pointer, the current
//! instruction sequence and the instruction pointer. Each call to
//! [`Interpreter::execute`] replaces the instruction sequence and restarts the
//! instruction pointer at 0, but leaves the tape alone, so several chunks of
//! code run one after another share their memory.
//!
//! Behaviors:
//! - Cells are `u8` and wrap on `+` / `-`.
//! - `>` past the end of the tape appends a zero cell; the tape never shrinks.
//! - `<` at cell 0 is a no-op (a warning is traced in debug mode).
//! - `.` writes the current cell as one raw byte to the output sink.
//! - `,` reads one line; its first byte is stored, an empty line leaves the cell
//!   unchanged, and an exhausted source is an [`InterpreterError::Input`].
//! - `[` finds its partner by scanning with a depth counter every time it
//!   executes; `]` scans only when the cell is non-zero. There is no jump table.
//!
//! ```no_run
//! use bf_session::Interpreter;
//!
//! let mut bf = Interpreter::new();
//! bf.run("++++++++[>++++++++<-]>+.", false).expect("program should run");
//! bf.run("+.", false).expect("tape is still there");
//! ```

use std::fmt;
use std::io::{self, Write};

use crate::source::{LineSource, StdinLines};
use crate::tape::Tape;
use crate::token::{tokenize, Instruction};

/// Errors that abort a single execution call.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// A `[` or `]` had no structural partner in the current sequence.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBracket { ip: usize, kind: BracketKind },

    /// The input source was exhausted or failed while `,` needed a line.
    #[error("I/O error reading input at instruction {ip}: {source}")]
    Input {
        ip: usize,
        #[source]
        source: io::Error,
    },

    /// The output sink rejected a byte written by `.`.
    #[error("I/O error writing output at instruction {ip}: {source}")]
    Output {
        ip: usize,
        #[source]
        source: io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { limit: usize },
}

impl InterpreterError {
    /// Instruction index the error refers to, when it has one.
    pub fn ip(&self) -> Option<usize> {
        match self {
            InterpreterError::UnmatchedBracket { ip, .. }
            | InterpreterError::Input { ip, .. }
            | InterpreterError::Output { ip, .. } => Some(*ip),
            InterpreterError::StepLimitExceeded { .. } => None,
        }
    }
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}

/// A Brainfuck session: tape, pointers, and the I/O it talks to.
pub struct Interpreter {
    tape: Tape,
    instructions: Vec<Instruction>,
    ip: usize,
    debug: bool,
    step_limit: Option<usize>,
    output: Box<dyn Write>,
    input: Box<dyn LineSource>,
    diagnostics: Box<dyn Write>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create a fresh session wired to stdout, stdin and stderr.
    pub fn new() -> Self {
        Self {
            tape: Tape::new(),
            instructions: Vec::new(),
            ip: 0,
            debug: false,
            step_limit: None,
            output: Box::new(io::stdout()),
            input: Box::new(StdinLines),
            diagnostics: Box::new(io::stderr()),
        }
    }

    /// Send `.` bytes to `sink` instead of stdout.
    pub fn set_output_sink<W>(&mut self, sink: W)
    where
        W: Write + 'static,
    {
        self.output = Box::new(sink);
    }

    /// Read `,` lines from `source` instead of stdin.
    pub fn set_input_source<S>(&mut self, source: S)
    where
        S: LineSource + 'static,
    {
        self.input = Box::new(source);
    }

    /// Send debug traces and warnings to `sink` instead of stderr.
    pub fn set_diagnostic_sink<W>(&mut self, sink: W)
    where
        W: Write + 'static,
    {
        self.diagnostics = Box::new(sink);
    }

    /// Abort any single call that executes more than `limit` instructions.
    pub fn set_step_limit(&mut self, limit: Option<usize>) {
        self.step_limit = limit;
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn data_pointer(&self) -> usize {
        self.tape.pointer()
    }

    pub fn instruction_pointer(&self) -> usize {
        self.ip
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// True once the instruction pointer has run off the end of the sequence.
    pub fn is_halted(&self) -> bool {
        self.ip >= self.instructions.len()
    }

    /// Drop all session state: tape back to a single zero cell, no program.
    pub fn reset(&mut self) {
        self.tape = Tape::new();
        self.instructions.clear();
        self.ip = 0;
    }

    /// Tokenize `source` and execute it against the current tape.
    pub fn run(&mut self, source: &str, debug: bool) -> Result<(), InterpreterError> {
        self.execute(tokenize(source), debug)
    }

    /// Replace the instruction sequence and run it to completion.
    ///
    /// Tape and data pointer carry over from previous calls. On error the
    /// call stops at the failing instruction; cells already written stay written.
    pub fn execute(
        &mut self,
        instructions: Vec<Instruction>,
        debug: bool,
    ) -> Result<(), InterpreterError> {
        self.instructions = instructions;
        self.ip = 0;
        self.debug = debug;

        let result = self.execute_loop();
        let _ = self.output.flush();
        let _ = self.diagnostics.flush();
        result
    }

    /// Write bytes straight to the output sink, outside of any program.
    pub fn write_output(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.output.write_all(bytes)?;
        self.output.flush()
    }

    fn execute_loop(&mut self) -> Result<(), InterpreterError> {
        let mut step: usize = 0;
        if self.debug {
            self.trace_header();
        }

        while self.ip < self.instructions.len() {
            if let Some(limit) = self.step_limit {
                if step >= limit {
                    return Err(InterpreterError::StepLimitExceeded { limit });
                }
            }

            let instr = self.instructions[self.ip];
            if self.debug {
                self.trace_row(step, instr);
            }

            self.step(instr)?;

            step += 1;
            self.ip += 1;
        }

        Ok(())
    }

    /// Apply one instruction. Loop instructions may move `ip` to the partner
    /// bracket; the caller still advances it by one afterwards.
    fn step(&mut self, instr: Instruction) -> Result<(), InterpreterError> {
        match instr {
            Instruction::Increment => self.tape.increment(),
            Instruction::Decrement => self.tape.decrement(),
            Instruction::MoveRight => self.tape.move_right(),
            Instruction::MoveLeft => {
                if !self.tape.move_left() && self.debug {
                    self.warn("tried to move pointer below 0");
                }
            }
            Instruction::Output => {
                let byte = [self.tape.current()];
                self.output
                    .write_all(&byte)
                    .map_err(|source| InterpreterError::Output { ip: self.ip, source })?;
            }
            Instruction::Input => self.read_input()?,
            Instruction::LoopStart => self.start_loop()?,
            Instruction::LoopEnd => self.end_loop()?,
        }
        Ok(())
    }

    fn read_input(&mut self) -> Result<(), InterpreterError> {
        // Anything printed so far should be visible before we block on input.
        let _ = self.output.flush();

        let line = match self.input.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => {
                return Err(InterpreterError::Input {
                    ip: self.ip,
                    source: io::Error::new(io::ErrorKind::UnexpectedEof, "input stream exhausted"),
                });
            }
            Err(source) => return Err(InterpreterError::Input { ip: self.ip, source }),
        };

        if line.len() > 1 && self.debug {
            self.warn("multiple characters were submitted, only the first is used");
        }
        if let Some(&first) = line.first() {
            self.tape.set_current(first);
        }
        Ok(())
    }

    /// `[`: find the matching `]` scanning forward; jump there if the cell is 0.
    fn start_loop(&mut self) -> Result<(), InterpreterError> {
        let origin = self.ip;
        let mut depth: usize = 0;

        for pos in origin + 1..self.instructions.len() {
            match self.instructions[pos] {
                Instruction::LoopStart => depth += 1,
                Instruction::LoopEnd if depth == 0 => {
                    if self.tape.current() == 0 {
                        self.ip = pos;
                    }
                    return Ok(());
                }
                Instruction::LoopEnd => depth -= 1,
                _ => {}
            }
        }

        Err(InterpreterError::UnmatchedBracket {
            ip: origin,
            kind: BracketKind::Open,
        })
    }

    /// `]`: falls through on a zero cell. Otherwise find the matching `[`
    /// scanning backward and jump there.
    fn end_loop(&mut self) -> Result<(), InterpreterError> {
        if self.tape.current() == 0 {
            return Ok(());
        }

        let origin = self.ip;
        let mut depth: usize = 0;

        for pos in (0..origin).rev() {
            match self.instructions[pos] {
                Instruction::LoopEnd => depth += 1,
                Instruction::LoopStart if depth == 0 => {
                    self.ip = pos;
                    return Ok(());
                }
                Instruction::LoopStart => depth -= 1,
                _ => {}
            }
        }

        Err(InterpreterError::UnmatchedBracket {
            ip: origin,
            kind: BracketKind::Close,
        })
    }

    fn trace_header(&mut self) {
        let _ = writeln!(self.diagnostics, "STEP | IP  | PTR | INSTR | TAPE");
        let _ = writeln!(
            self.diagnostics,
            "-----+-----+-----+-------+------------------------------------------------"
        );
    }

    fn trace_row(&mut self, step: usize, instr: Instruction) {
        let _ = writeln!(
            self.diagnostics,
            "{:<4} | {:<3} | {:<3} |  {}    | {}",
            step,
            self.ip,
            self.tape.pointer(),
            instr,
            self.tape
        );
    }

    fn warn(&mut self, msg: &str) {
        let _ = writeln!(self.diagnostics, "warning: {msg}");
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::test_support::SharedBuffer;
    use proptest::prelude::*;

    /// Programs over `+-<>` with balanced brackets and no I/O.
    fn balanced_program() -> impl Strategy<Value = String> {
        let leaf = prop::sample::select(vec!["+", "-", "<", ">"]).prop_map(|s| s.to_string());
        leaf.prop_recursive(4, 64, 8, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 1..8).prop_map(|parts| parts.concat()),
                prop::collection::vec(inner, 0..4)
                    .prop_map(|parts| format!("[{}]", parts.concat())),
            ]
        })
    }

    fn quiet() -> Interpreter {
        let mut bf = Interpreter::new();
        bf.set_output_sink(SharedBuffer::default());
        bf.set_diagnostic_sink(SharedBuffer::default());
        bf.set_step_limit(Some(10_000));
        bf
    }

    proptest! {
        #[test]
        fn balanced_programs_never_fail_on_brackets(program in balanced_program()) {
            let mut bf = quiet();
            match bf.run(&program, false) {
                Ok(()) => prop_assert_eq!(bf.instruction_pointer(), bf.instructions().len()),
                Err(InterpreterError::StepLimitExceeded { .. }) => {}
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
        }

        #[test]
        fn tape_never_shrinks(first in balanced_program(), second in balanced_program()) {
            let mut bf = quiet();
            let _ = bf.run(&first, false);
            let after_first = bf.tape().len();
            let _ = bf.run(&second, false);
            prop_assert!(bf.tape().len() >= after_first);
            prop_assert!(bf.tape().len() > bf.data_pointer());
        }

        #[test]
        fn zero_cell_jumps_past_matching_close(body in balanced_program()) {
            // The loop is skipped entirely, so only the trailing '+' runs.
            let mut bf = quiet();
            let program = format!("[{body}]+");
            bf.run(&program, false).unwrap();
            prop_assert_eq!(bf.tape().cells(), &[1u8][..]);
        }
    }
}
