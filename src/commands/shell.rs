use std::io::{self, IsTerminal, Write};
use clap::Args;

use crate::config;
use crate::shell::{run_bare, run_editor, select_mode, ModeFlagOverride, Shell, ShellMode};
use crate::source::StdinLines;

#[derive(Args, Debug, Default)]
#[command(disable_help_flag = true)]
pub struct ShellArgs {
    /// Trace every executed instruction to stderr
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Force non-interactive bare mode
    #[arg(long = "bare", conflicts_with = "editor")]
    pub bare: bool,

    /// Force interactive mode (errors if stdin is not a TTY)
    #[arg(long = "editor", conflicts_with = "bare")]
    pub editor: bool,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

impl ShellArgs {
    pub fn mode_flag(&self) -> ModeFlagOverride {
        if self.bare {
            ModeFlagOverride::Bare
        } else if self.editor {
            ModeFlagOverride::Editor
        } else {
            ModeFlagOverride::None
        }
    }
}

// Public entry point for `bf shell` (and `bf` with no subcommand)
pub fn run(program: &str, args: ShellArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let cfg = config::config();
    let debug = args.debug || cfg.debug;
    let mut shell = Shell::fresh(debug);
    shell
        .interpreter_mut()
        .set_step_limit(config::env_max_steps().or(cfg.max_steps));

    start(program, shell, args.mode_flag())
}

/// Drive `shell` until the session ends. Also used by `bf run --interactive`
/// to continue with the tape the file left behind.
pub fn start(program: &str, mut shell: Shell, mode_flag: ModeFlagOverride) -> i32 {
    // Determine mode: flags -> env -> auto-detect via is_terminal()
    let mode = match select_mode(mode_flag) {
        Ok(m) => m,
        Err(msg) => {
            eprintln!("{program}: {msg}");
            let _ = io::stderr().flush();
            return 1;
        }
    };

    // Install SIGINT (ctrl+c) handler to flush and exit(0) immediately
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(0);
    }) {
        eprintln!("{program}: failed to set ctrl+c handler: {e}");
        let _ = io::stderr().flush();
        return 1;
    }

    let cfg = config::config();
    let result = match mode {
        ShellMode::Editor => {
            // Print banners/prompts only if stderr is a TTY
            if io::stderr().is_terminal() {
                eprintln!("Brainfuck shell (interactive editor mode)");
                eprintln!("Each line runs against the same tape. Type \"exit\" or press ctrl+d to leave");
                let _ = io::stderr().flush();
            }
            run_editor(&mut shell, &cfg.prompt, &cfg.colors)
        }
        ShellMode::Bare => {
            let prompt = io::stderr().is_terminal().then_some(cfg.prompt.as_str());
            run_bare(&mut shell, &mut StdinLines, prompt)
        }
    };

    match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("{program}: shell error: {e}");
            let _ = io::stderr().flush();
            1
        }
    }
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} shell [--debug|-d] [--bare|--editor]

Options:
  --debug,  -d        Trace every instruction (instruction, tape, pointer) to stderr
  --bare              Force non-interactive bare mode
  --editor            Force interactive editor mode (errors if stdin is not a TTY)
  --help,   -h        Show this help

Description:
  Starts a session where every line you enter is executed immediately.
  All lines share one memory tape and data pointer.

Notes:
    - Non-Brainfuck characters are ignored; only valid instructions are executed.
    - A line consisting of "exit" ends the session.
    - `,` reads one line from stdin and stores its first byte; an empty line leaves the cell unchanged.
    - A newline is printed after each line that contained `.` (not in debug mode).
    - Errors are reported on stderr and the session continues with the next line.
    - Ctrl+C exits immediately.
    - Mode selection:
        * Flags: --bare|--editor override environment and auto-detection.
        * Env: BF_SHELL_MODE=bare|editor overrides auto-detection.
        * Auto-detect: if stdin is a TTY, starts in interactive editor mode; otherwise, bare mode.
        * Prompts/banners suppressed if stderr is not a TTY.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
