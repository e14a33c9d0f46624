use clap::Args;
use std::fs;
use std::io::{self, Write};
use crate::cli_util::{print_interpreter_error, print_warning};
use crate::commands::shell::start;
use crate::config;
use crate::shell::{ModeFlagOverride, Shell};
use crate::{bf_only, Interpreter};

#[derive(Args, Debug)]
#[command(disable_help_flag = true)]
pub struct RunArgs {
    /// Trace every executed instruction to stderr
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Read Brainfuck code from PATH instead of positional "<code>"
    #[arg(short = 'f', long = "file")]
    pub file: Option<String>,

    /// Continue into the shell afterwards, keeping the tape
    #[arg(short = 'i', long = "interactive")]
    pub interactive: bool,

    /// Maximum interpreter steps before abort (fallback BF_MAX_STEPS; default unlimited)
    #[arg(long = "max-steps", value_name = "N")]
    pub max_steps: Option<usize>,

    /// Concatenated Brainfuck code parts
    #[arg(value_name = "code", trailing_var_arg = true)]
    pub code: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let RunArgs {
        debug,
        file,
        interactive,
        max_steps,
        code,
        ..
    } = args;

    if file.is_none() && code.is_empty() {
        usage_and_exit(program, 2);
    }

    if file.is_some() && !code.is_empty() {
        eprintln!("{program}: cannot use positional code together with --file");
        usage_and_exit(program, 2);
    }

    let code_str = if let Some(path) = file {
        match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("{program}: failed to read code file as UTF-8: {e}");
                let _ = io::stderr().flush();
                return 1;
            }
        }
    } else {
        code.join("")
    };

    let filtered = bf_only(&code_str);
    if filtered.is_empty() && !code_str.trim().is_empty() {
        print_warning("program contains no Brainfuck instructions");
    }

    // Resolve settings: flags -> env -> config file -> defaults
    let cfg = config::config();
    let debug = debug || cfg.debug;
    let max_steps = max_steps
        .or_else(config::env_max_steps)
        .or(cfg.max_steps);

    let mut bf = Interpreter::new();
    bf.set_step_limit(max_steps);

    if let Err(err) = bf.run(&code_str, debug) {
        print_interpreter_error(Some(program), &filtered, &err);
        println!();
        let _ = io::stdout().flush();
        return 1;
    }

    if interactive {
        return start(program, Shell::new(bf, debug), ModeFlagOverride::None);
    }

    // For readability, ensure output ends with a newline
    println!();
    let _ = io::stdout().flush();
    0
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run [--debug|-d] [--interactive|-i] [--max-steps N] "<code>"
  {0} run [--debug|-d] [--interactive|-i] [--max-steps N] --file <PATH>

Options:
  --file,        -f <PATH>  Read Brainfuck code from PATH instead of positional "<code>"
  --debug,       -d         Trace every instruction (instruction, tape, pointer) to stderr
  --interactive, -i         Start the shell afterwards, keeping the tape
  --max-steps       <N>     Abort after N instructions (fallback BF_MAX_STEPS)
  --help,        -h         Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- Input (`,`) reads one line from stdin and stores its first byte;
  running out of input is an error.
- The tape starts with a single cell and grows to the right as needed.

Examples:
- Load Brainfuck code from a file:
    {0} run --file ./program.bf
- Feed lines to `,` from a file:
    {0} run ",.,." < input.txt
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}
