use bf_session::{Interpreter, Shell};

fn main() {
    // Classic Brainfuck "Hello World!" program
    let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

    let mut bf = Interpreter::new();

    if let Err(err) = bf.run(code, false) {
        eprintln!("Brainfuck interpreter error: {err}");
        std::process::exit(1);
    }
    println!("tape after hello world: {}", bf.tape());

    // A shell session feeds one line at a time into the same tape.
    // Prints "A" and then "B", each followed by a newline.
    let mut shell = Shell::fresh(false);
    for line in ["++++++++[>++++++++<-]>+", ".", "+.", "exit"] {
        if let Err(err) = shell.submit(line) {
            eprintln!("{line:?} failed: {err}");
        }
    }

    // Tip: pass `true` as the debug flag to trace every instruction to stderr:
    // bf.run("+>+<", true)
}
