use std::fs::File;
use std::io::{self, Read, Write};
use std::process::{self, Command};

use clap::{App, Arg, ArgGroup};

use bfc::backend::Target;
use bfc::{assembly, optimize, parse};

fn main() -> io::Result<()> {
    let matches = App::new("bfc")
        .version("0.1.0")
        .about("Optimizing Brainfuck compiler")
        .arg(
            Arg::with_name("target")
                .long("target")
                .short("t")
                .help("Target to compile for")
                .takes_value(true)
                .possible_values(&Target::NAMES)
                .default_value("arm64-macos")
                .value_name("target"),
        )
        .arg(
            Arg::with_name("output_asm")
                .short("S")
                .help("Emit assembly but do not assemble or link"),
        )
        .arg(
            Arg::with_name("dump_ir")
                .long("dump-ir")
                .help("Dump intermediate representation; for debugging"),
        )
        .group(ArgGroup::with_name("actions").args(&["output_asm", "dump_ir"]))
        .arg(
            Arg::with_name("debugging_symbols")
                .short("g")
                .help("Generate debugging information"),
        )
        .arg(
            Arg::with_name("run")
                .long("run")
                .conflicts_with("actions")
                .help("Run the executable after linking"),
        )
        .arg(
            Arg::with_name("out_name")
                .short("o")
                .help("Output file name")
                .takes_value(true)
                .empty_values(false)
                .value_name("file"),
        )
        .arg(
            Arg::with_name("FILENAME")
                .help("Source file to compile")
                .required(true)
                .index(1),
        )
        .get_matches();

    let target = match matches.value_of("target").unwrap().parse::<Target>() {
        Ok(target) => target,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    };

    let path = matches.value_of("FILENAME").unwrap();
    let name = path.rsplitn(2, '.').last().unwrap();
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
    let ast = optimize(&ast);

    if matches.is_present("dump_ir") {
        let out_name = matches.value_of("out_name").unwrap_or("-");
        let mut irfile = open_output_file(out_name)?;
        writeln!(irfile, "{:#?}", ast)?;
        return Ok(());
    }

    let mut backend = target.backend();
    let body = backend.generate(&ast);
    let output = backend.wrap(&body);

    if matches.is_present("output_asm") {
        let def_name = format!("{}.s", name);
        let out_name = matches.value_of("out_name").unwrap_or(&def_name);
        let mut asmfile = open_output_file(out_name)?;
        asmfile.write_all(output.as_bytes())?;
        return Ok(());
    }

    let out_name = matches.value_of("out_name").unwrap_or(name);
    let o_name = format!("{}.o", name);
    let debug = matches.is_present("debugging_symbols");

    println!("Assembling...");
    if !assembly::assemble(&output, &o_name, debug)? {
        process::exit(1);
    }

    println!("Linking...");
    if !assembly::link(target, &o_name, out_name)? {
        process::exit(1);
    }

    if matches.is_present("run") {
        let status = Command::new(format!("./{}", out_name)).status()?;
        process::exit(status.code().unwrap_or(1));
    }

    Ok(())
}

fn open_output_file(name: &str) -> io::Result<Box<dyn Write>> {
    if name == "-" {
        Ok(Box::new(io::stdout()))
    } else {
        Ok(Box::new(File::create(name)?))
    }
}
