//! A Brainfuck tape machine with a persistent session shell.
//!
//! This crate provides a Brainfuck interpreter whose memory tape starts as a
//! single zero cell and grows to the right on demand. The tape survives from
//! one execution to the next, so an interactive session can build up state
//! line by line.
//!
//! Features and behaviors:
//! - Source text is filtered down to `><+-.,[]`; everything else is ignored.
//! - Cells are bytes and wrap on increment and decrement.
//! - Moving left from cell 0 is silently ignored.
//! - Input `,` reads one line and stores its first byte.
//! - Output `.` writes the current cell as one raw byte.
//! - Loops match brackets by scanning the program each time they execute;
//!   unmatched brackets are reported as errors carrying their position.
//!
//! Quick start:
//!
//! ```no_run
//! use bf_session::Interpreter;
//!
//! // Classic "Hello World!" in Brainfuck
//! let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
//! let mut bf = Interpreter::new();
//! bf.run(code, false).expect("program should run");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod interpreter;
pub mod shell;
pub mod source;
pub mod tape;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use interpreter::{BracketKind, Interpreter, InterpreterError};
pub use shell::{Outcome, Shell};
pub use source::{BufLines, LineSource, StdinLines};
pub use tape::Tape;
pub use token::{bf_only, tokenize, Instruction};
