// Interpreter front end: runs a file directly, or serves a REPL whose tape
// persists across lines. With -d each top-level node can be stepped in a
// small command-driven debugger. Shares the parser with the compiler, so it
// is also useful for separating parser bugs from backend bugs.

use std::fs::File;
use std::io::{self, Read, Write};
use std::process;

use clap::{App, Arg};

use bfc::{parse, Interpreter, RuntimeError, AST};

fn main() -> io::Result<()> {
    let matches = App::new("bfi")
        .version("0.1.0")
        .about("Brainfuck interpreter and REPL")
        .arg(
            Arg::with_name("repl")
                .short("r")
                .help("Start an interactive REPL"),
        )
        .arg(
            Arg::with_name("debug")
                .short("d")
                .requires("repl")
                .help("Step through each node in a debugger (REPL only)"),
        )
        .arg(
            Arg::with_name("FILENAME")
                .help("Source file to run")
                .required_unless("repl")
                .conflicts_with("repl")
                .index(1),
        )
        .get_matches();

    if matches.is_present("repl") {
        run_repl(matches.is_present("debug"))
    } else {
        run_file(matches.value_of("FILENAME").unwrap())
    }
}

fn run_file(path: &str) -> io::Result<()> {
    let mut file = File::open(path)?;
    let mut code = Vec::new();
    file.read_to_end(&mut code)?;

    let ast = match parse(&code) {
        Ok(ast) => ast,
        Err(err) => {
            eprintln!("parse error: {}", err);
            process::exit(1);
        }
    };

    let mut interp = Interpreter::new(io::stdin(), io::stdout());
    if let Err(err) = interp.run(&ast) {
        eprintln!("{}", err);
        process::exit(1);
    }
    Ok(())
}

fn run_repl(debug: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut interp = Interpreter::new(io::stdin(), io::stdout());

    loop {
        print!("$ ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            return Ok(());
        }
        let line = line.trim();
        if line == "q" {
            return Ok(());
        }

        println!("running: '{}'", line);
        match parse(line.as_bytes()) {
            Ok(ast) => {
                let result = if debug {
                    debug_run(&mut interp, &ast)
                } else {
                    interp.run(&ast)
                };
                if let Err(err) = result {
                    eprintln!("{}", err);
                }
            }
            Err(err) => eprintln!("parse error: {}", err),
        }
        println!("tape: {:?}", &interp.tape[..10]);
    }
}

fn debug_run(
    interp: &mut Interpreter<io::Stdin, io::Stdout>,
    ast: &[AST],
) -> Result<(), RuntimeError> {
    let stdin = io::stdin();
    let mut run_to_end = false;

    for (i, node) in ast.iter().enumerate() {
        if run_to_end {
            interp.step(node)?;
            continue;
        }
        loop {
            print!("{} {:?} {:?} @ ", i, node, &interp.tape[..5]);
            io::stdout().flush().map_err(RuntimeError::Io)?;

            let mut command = String::new();
            stdin.read_line(&mut command)?;
            match command.trim() {
                "s" => {
                    interp.step(node)?;
                    break;
                }
                "p" => println!(
                    ">>[{}] {:?} dptr: {} tape: {:?}",
                    i,
                    node,
                    interp.dptr,
                    &interp.tape[..5]
                ),
                "c" => {
                    run_to_end = true;
                    interp.step(node)?;
                    break;
                }
                "q" => return Ok(()),
                other => println!("unknown command '{}' s=step, p=print, c=continue, q=quit", other),
            }
        }
    }
    Ok(())
}
