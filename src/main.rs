use bf_session::commands::{run::RunArgs, shell::ShellArgs};
use bf_session::commands;
use clap::{Parser, Subcommand};
use std::env;
use std::io::{self, Write};

fn print_top_usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} run   [--debug|-d] [--interactive|-i] "<code>"       # Run Brainfuck code (args are concatenated)
  {0} run   [--debug|-d] [--interactive|-i] --file <PATH>  # Run Brainfuck code loaded from file
  {0} shell [--debug|-d] [--bare|--editor]                 # Start a session shell (one line = one run)
  {0}                                                      # Same as "{0} shell"

Run "{0} <subcommand> --help" for more info.
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true, disable_help_subcommand = true)]
struct Cli {
    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    help: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Run(RunArgs),
    Shell(ShellArgs),
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("bf"));

    let cli = Cli::parse();

    if cli.help {
        print_top_usage_and_exit(&program, 0);
    }

    let code = match cli.command {
        Some(Command::Run(args)) => commands::run::run(&program, args),
        Some(Command::Shell(args)) => commands::shell::run(&program, args),
        None => commands::shell::run(&program, ShellArgs::default()),
    };

    std::process::exit(code);
}
