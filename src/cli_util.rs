use std::io::{self, IsTerminal, Write};
use nu_ansi_term::Style;
use crate::config;
use crate::InterpreterError;

/// Pretty-print an [`InterpreterError`] to stderr with caret positioning.
///
/// `code` is the filtered program (instructions only), so instruction indices
/// line up with characters. If `program` is `Some("bf")`, messages are
/// prefixed with "bf: ..." as the `run` subcommand does.
pub fn print_interpreter_error(program: Option<&str>, code: &str, err: &InterpreterError) {
    let mut stderr = io::stderr().lock();
    let styled = io::stderr().is_terminal();
    let _ = write_interpreter_error(&mut stderr, program, code, err, styled);
    let _ = stderr.flush();
}

/// Render the error report into `w`. Split out from
/// [`print_interpreter_error`] so it can be checked without a real stderr.
pub fn write_interpreter_error<W: Write>(
    w: &mut W,
    program: Option<&str>,
    code: &str,
    err: &InterpreterError,
    styled: bool,
) -> io::Result<()> {
    let msg = match err {
        InterpreterError::UnmatchedBracket { kind, .. } => {
            format!("Runtime error: unmatched bracket {kind}")
        }
        InterpreterError::Input { source, .. } => {
            format!("I/O error: failed to read input: {source}")
        }
        InterpreterError::Output { source, .. } => {
            format!("I/O error: failed to write output: {source}")
        }
        InterpreterError::StepLimitExceeded { limit } => {
            format!("Execution aborted: step limit exceeded ({limit})")
        }
    };
    let msg = match program {
        Some(p) => format!("{p}: {msg}"),
        None => msg,
    };

    match err.ip() {
        Some(ip) => write_error_with_context(w, &msg, code, ip, styled),
        None => writeln!(w, "{}", paint_error(&msg, styled)),
    }
}

/// Print a warning line on stderr, colored on a terminal.
pub fn print_warning(msg: &str) {
    let text = format!("warning: {msg}");
    if io::stderr().is_terminal() {
        let style = Style::new().fg(config::config().colors.warning);
        eprintln!("{}", style.paint(text));
    } else {
        eprintln!("{text}");
    }
    let _ = io::stderr().flush();
}

fn paint_error(msg: &str, styled: bool) -> String {
    if styled {
        Style::new()
            .fg(config::config().colors.error)
            .bold()
            .paint(msg)
            .to_string()
    } else {
        msg.to_string()
    }
}

/// Write a concise error with instruction index and a caret context window.
fn write_error_with_context<W: Write>(
    w: &mut W,
    prefix: &str,
    code: &str,
    pos: usize,
    styled: bool,
) -> io::Result<()> {
    writeln!(w, "{} at instruction {pos}", paint_error(prefix, styled))?;

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);
    if start_char >= end_char {
        return Ok(());
    }

    let slice: String = code.chars().skip(start_char).take(end_char - start_char).collect();
    writeln!(w, "  {slice}")?;

    // Caret under the exact position
    let caret_offset_chars = pos.saturating_sub(start_char);
    writeln!(w, "  {}^", " ".repeat(caret_offset_chars))
}
