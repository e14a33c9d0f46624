//! Interactive session: one line of input, one execution, shared tape.

use std::env;
use std::io::{self, IsTerminal, Write};
use nu_ansi_term::Style;
use reedline::{DefaultPrompt, DefaultPromptSegment, Highlighter, Signal, StyledText};
use crate::config::Colors;
use crate::source::LineSource;
use crate::{bf_only, cli_util, Interpreter, InterpreterError};

/// Line that ends the session.
pub const EXIT_COMMAND: &str = "exit";

/// Printed to stderr when the session ends via [`EXIT_COMMAND`].
pub const FAREWELL: &str = "Bye";

/// What the shell did with a submitted line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Executed,
    Exit,
}

/// A session: an interpreter whose tape lives as long as the shell does.
pub struct Shell {
    interpreter: Interpreter,
    debug: bool,
}

impl Shell {
    /// Continue a session from an interpreter that may already hold state,
    /// e.g. after running a file with `--interactive`.
    pub fn new(interpreter: Interpreter, debug: bool) -> Self {
        Self { interpreter, debug }
    }

    /// Start with a brand new tape wired to the standard streams.
    pub fn fresh(debug: bool) -> Self {
        Self::new(Interpreter::new(), debug)
    }

    pub fn interpreter(&self) -> &Interpreter {
        &self.interpreter
    }

    pub fn interpreter_mut(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    pub fn reset(&mut self) {
        self.interpreter.reset();
    }

    /// Execute one line against the session's tape.
    ///
    /// The exit line is recognized before anything is tokenized. When the line
    /// printed something (and tracing is off) a newline follows the output,
    /// even if the line then failed.
    pub fn submit(&mut self, line: &str) -> Result<Outcome, InterpreterError> {
        if is_exit_line(line) {
            return Ok(Outcome::Exit);
        }

        let result = self.interpreter.run(line, self.debug);
        if line.contains('.') && !self.debug {
            let _ = self.interpreter.write_output(b"\n");
        }
        result.map(|()| Outcome::Executed)
    }
}

pub fn is_exit_line(line: &str) -> bool {
    line.trim() == EXIT_COMMAND
}

/// Submit `line` and report errors. Returns `false` once the session is over.
fn handle_line(shell: &mut Shell, line: &str) -> bool {
    match shell.submit(line) {
        Ok(Outcome::Executed) => true,
        Ok(Outcome::Exit) => {
            eprintln!("{FAREWELL}");
            let _ = io::stderr().flush();
            false
        }
        Err(err) => {
            cli_util::print_interpreter_error(None, &bf_only(line), &err);
            true
        }
    }
}

/// Read lines from `lines` until the exit line or end of input.
///
/// `prompt` is written to stderr before each line when given.
pub fn run_bare<S: LineSource>(
    shell: &mut Shell,
    lines: &mut S,
    prompt: Option<&str>,
) -> io::Result<()> {
    loop {
        if let Some(p) = prompt {
            eprint!("{p}");
            io::stderr().flush()?;
        }

        let Some(line) = lines.next_line()? else {
            // EOF. End the session cleanly so a closed stdin never hangs.
            if prompt.is_some() {
                eprintln!();
            }
            return Ok(());
        };

        if !handle_line(shell, &String::from_utf8_lossy(&line)) {
            return Ok(());
        }
    }
}

/// Interactive line editor loop. Enter submits the line.
pub fn run_editor(shell: &mut Shell, prompt: &str, colors: &Colors) -> io::Result<()> {
    let mut editor = init_line_editor(colors)?;
    let prompt = DefaultPrompt::new(
        DefaultPromptSegment::Basic(prompt.trim_end().to_string()),
        DefaultPromptSegment::Empty,
    );

    loop {
        match editor.read_line(&prompt) {
            Ok(Signal::Success(line)) => {
                if !handle_line(shell, &line) {
                    return Ok(());
                }
            }
            Ok(Signal::CtrlC) | Ok(Signal::CtrlD) => {
                println!();
                io::stdout().flush()?;
                return Ok(());
            }
            Err(e) => {
                eprintln!("shell: editor error: {e}");
                let _ = io::stderr().flush();
                return Ok(());
            }
        }
    }
}

fn init_line_editor(colors: &Colors) -> io::Result<reedline::Reedline> {
    use reedline::{
        default_emacs_keybindings, Emacs, FileBackedHistory, KeyCode, KeyModifiers, Reedline,
        ReedlineEvent,
    };

    // Alt+Up/Alt+Down as history shortcuts next to the default Up/Down.
    let mut keybindings = default_emacs_keybindings();
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Up, ReedlineEvent::PreviousHistory);
    keybindings.add_binding(KeyModifiers::ALT, KeyCode::Down, ReedlineEvent::NextHistory);

    let history = FileBackedHistory::new(1_000).map_err(|e| io::Error::other(e.to_string()))?;

    let editor = Reedline::create()
        .with_highlighter(Box::new(BrainfuckHighlighter::from_colors(colors)))
        .with_history(Box::new(history))
        .with_edit_mode(Box::new(Emacs::new(keybindings)));

    Ok(editor)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellMode {
    Bare,
    Editor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeFlagOverride {
    None,
    Bare,
    Editor,
}

/// Pick the shell mode: flag, then `BF_SHELL_MODE`, then whether stdin is a TTY.
pub fn select_mode(flag: ModeFlagOverride) -> Result<ShellMode, String> {
    let stdin_is_tty = io::stdin().is_terminal();
    let env_mode = env::var("BF_SHELL_MODE").ok();
    resolve_mode(flag, env_mode.as_deref(), stdin_is_tty)
}

fn resolve_mode(
    flag: ModeFlagOverride,
    env_mode: Option<&str>,
    stdin_is_tty: bool,
) -> Result<ShellMode, String> {
    match flag {
        ModeFlagOverride::Bare => return Ok(ShellMode::Bare),
        ModeFlagOverride::Editor => {
            if !stdin_is_tty {
                return Err("cannot start editor: stdin is not a TTY (use --bare or BF_SHELL_MODE=bare)".to_string());
            }
            return Ok(ShellMode::Editor);
        }
        ModeFlagOverride::None => {}
    }

    if let Some(val) = env_mode {
        let v = val.trim().to_ascii_lowercase();
        return match v.as_str() {
            "bare" => Ok(ShellMode::Bare),
            "editor" => {
                if !stdin_is_tty {
                    return Err("cannot start editor: stdin is not a TTY (use BF_SHELL_MODE=bare)".to_string());
                }
                Ok(ShellMode::Editor)
            }
            _ => Err(format!("invalid BF_SHELL_MODE value: {val}, must be 'bare' or 'editor'")),
        };
    }

    if stdin_is_tty {
        Ok(ShellMode::Editor)
    } else {
        Ok(ShellMode::Bare)
    }
}

struct BrainfuckHighlighter {
    map_move: Style,
    map_data: Style,
    map_io: Style,
    map_loop: Style,
    map_other: Style,
}

impl BrainfuckHighlighter {
    fn from_colors(colors: &Colors) -> Self {
        Self {
            map_move: Style::new().fg(colors.op_move).bold(),
            map_data: Style::new().fg(colors.op_data).bold(),
            map_io: Style::new().fg(colors.op_io).bold(),
            map_loop: Style::new().fg(colors.op_loop).bold(),
            map_other: Style::new().fg(colors.op_other),
        }
    }

    #[inline]
    fn style_for(&self, ch: char) -> Style {
        match ch {
            '>' | '<' => self.map_move,
            '+' | '-' => self.map_data,
            '.' | ',' => self.map_io,
            '[' | ']' => self.map_loop,
            _ => self.map_other,
        }
    }
}

impl Highlighter for BrainfuckHighlighter {
    fn highlight(&self, line: &str, _cursor: usize) -> StyledText {
        let mut out: StyledText = StyledText::new();
        let mut current_style: Option<Style> = None;
        let mut buffer = String::new();

        for ch in line.chars() {
            let style = self.style_for(ch);

            match current_style {
                Some(s) if s == style => {}
                Some(s) => {
                    out.push((s, std::mem::take(&mut buffer)));
                    current_style = Some(style);
                }
                None => current_style = Some(style),
            }
            buffer.push(ch);
        }

        if let Some(s) = current_style {
            if !buffer.is_empty() {
                out.push((s, buffer));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BufLines;
    use crate::test_support::SharedBuffer;
    use std::io::Cursor;

    fn shell_with(input: &str) -> (Shell, SharedBuffer) {
        let out = SharedBuffer::default();
        let mut bf = Interpreter::new();
        bf.set_output_sink(out.clone());
        bf.set_diagnostic_sink(SharedBuffer::default());
        bf.set_input_source(BufLines::new(Cursor::new(input.to_string())));
        (Shell::new(bf, false), out)
    }

    #[test]
    fn exit_line_is_recognized() {
        assert!(is_exit_line("exit"));
        assert!(is_exit_line("exit\n"));
        assert!(!is_exit_line("exit now"));
        assert!(!is_exit_line("+exit"));
    }

    #[test]
    fn exit_stops_before_tokenizing() {
        let (mut shell, out) = shell_with("");
        assert_eq!(shell.submit(" exit ").unwrap(), Outcome::Exit);
        assert_eq!(shell.interpreter().tape().cells(), &[0]);
        assert!(out.contents().is_empty());
    }

    #[test]
    fn lines_share_the_tape() {
        let (mut shell, out) = shell_with("");
        shell.submit(&"+".repeat(65)).unwrap();
        shell.submit(">++").unwrap();
        shell.submit("<.").unwrap();
        assert_eq!(out.text(), "A\n");
        assert_eq!(shell.interpreter().tape().cells(), &[65, 2]);
    }

    #[test]
    fn newline_only_follows_printing_lines() {
        let (mut shell, out) = shell_with("");
        shell.submit("+++").unwrap();
        assert!(out.contents().is_empty());
        shell.submit(".").unwrap();
        assert_eq!(out.contents(), vec![3, b'\n']);
    }

    #[test]
    fn debug_session_skips_trailing_newline() {
        let out = SharedBuffer::default();
        let mut bf = Interpreter::new();
        bf.set_output_sink(out.clone());
        bf.set_diagnostic_sink(SharedBuffer::default());
        let mut shell = Shell::new(bf, true);
        shell.submit("+.").unwrap();
        assert_eq!(out.contents(), vec![1]);
    }

    #[test]
    fn error_keeps_session_alive() {
        let (mut shell, _out) = shell_with("");
        shell.submit("++").unwrap();
        assert!(shell.submit("]").is_err());
        shell.submit("+").unwrap();
        assert_eq!(shell.interpreter().tape().cells(), &[3]);
    }

    #[test]
    fn reset_clears_the_tape() {
        let (mut shell, _out) = shell_with("");
        shell.submit(">+").unwrap();
        shell.reset();
        assert_eq!(shell.interpreter().tape().cells(), &[0]);
    }

    #[test]
    fn bare_loop_runs_until_exit() {
        let (mut shell, out) = shell_with("");
        let mut lines = BufLines::new(Cursor::new("++\n[\n+.\nexit\n+++.\n"));
        run_bare(&mut shell, &mut lines, None).unwrap();
        assert_eq!(out.contents(), vec![3, b'\n']);
        // Nothing after the exit line ran.
        assert_eq!(shell.interpreter().tape().cells(), &[3]);
    }

    #[test]
    fn bare_loop_ends_at_eof() {
        let (mut shell, _out) = shell_with("");
        let mut lines = BufLines::new(Cursor::new("+\n+"));
        run_bare(&mut shell, &mut lines, None).unwrap();
        assert_eq!(shell.interpreter().tape().cells(), &[2]);
    }

    #[test]
    fn mode_flags_override_env() {
        assert_eq!(resolve_mode(ModeFlagOverride::Bare, Some("editor"), true), Ok(ShellMode::Bare));
        assert!(resolve_mode(ModeFlagOverride::Editor, None, false).is_err());
        assert_eq!(resolve_mode(ModeFlagOverride::Editor, None, true), Ok(ShellMode::Editor));
    }

    #[test]
    fn mode_env_and_auto_detect() {
        assert_eq!(resolve_mode(ModeFlagOverride::None, Some(" BARE "), true), Ok(ShellMode::Bare));
        assert!(resolve_mode(ModeFlagOverride::None, Some("editor"), false).is_err());
        assert!(resolve_mode(ModeFlagOverride::None, Some("fancy"), true).is_err());
        assert_eq!(resolve_mode(ModeFlagOverride::None, None, true), Ok(ShellMode::Editor));
        assert_eq!(resolve_mode(ModeFlagOverride::None, None, false), Ok(ShellMode::Bare));
    }

    #[test]
    fn highlighter_groups_runs_by_category() {
        let hl = BrainfuckHighlighter::from_colors(&Colors::default());
        let styled = hl.highlight("++>>x[", 0);
        let texts: Vec<&str> = styled.buffer.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(texts, vec!["++", ">>", "x", "["]);
    }
}
