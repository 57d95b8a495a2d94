// Builds a source file into a native binary and times repeated runs of it.

use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{self, Command, Stdio};
use std::time::Instant;

use clap::{App, Arg};

use bfc::assembly;
use bfc::backend::Target;
use bfc::compile_for;

fn main() -> io::Result<()> {
    let matches = App::new("bfbench")
        .version("0.1.0")
        .about("Compiles a brainfuck program and benchmarks the binary")
        .arg(
            Arg::with_name("target")
                .long("target")
                .short("t")
                .takes_value(true)
                .possible_values(&Target::NAMES)
                .default_value("arm64-macos")
                .value_name("target"),
        )
        .arg(
            Arg::with_name("runs")
                .long("runs")
                .takes_value(true)
                .default_value("10")
                .value_name("count"),
        )
        .arg(
            Arg::with_name("FILENAME")
                .help("Source file to benchmark")
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
    let runs = match matches.value_of("runs").unwrap().parse::<u32>() {
        Ok(runs) if runs > 0 => runs,
        _ => {
            eprintln!("--runs must be a positive integer");
            process::exit(1);
        }
    };

    let path = matches.value_of("FILENAME").unwrap();
    println!("Compiling {}...", path);
    let bin_path = build(path, target)?;
    println!("Built {}\n", bin_path);

    bench(&bin_path, runs)
}

/// Compiles a source file to a native binary under build/, returning the
/// binary path.
fn build(path: &str, target: Target) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut code = Vec::new();
    file.read_to_end(&mut code)?;

    let asm = match compile_for(&code, target) {
        Ok(asm) => asm,
        Err(err) => {
            eprintln!("parse error: {}", err);
            process::exit(1);
        }
    };

    fs::create_dir_all("build")?;
    let name = Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("out");
    let asm_path = format!("build/{}.s", name);
    let o_path = format!("build/{}.o", name);
    let bin_path = format!("build/{}", name);

    File::create(&asm_path)?.write_all(asm.as_bytes())?;

    if !assembly::assemble(&asm, &o_path, false)? {
        process::exit(1);
    }
    if !assembly::link(target, &o_path, &bin_path)? {
        process::exit(1);
    }
    Ok(bin_path)
}

fn bench(bin_path: &str, runs: u32) -> io::Result<()> {
    let mut times = Vec::with_capacity(runs as usize);
    for i in 0..runs {
        let start = Instant::now();
        let status = Command::new(format!("./{}", bin_path))
            .stdout(Stdio::null())
            .status()?;
        let elapsed = start.elapsed().as_secs_f64();
        if !status.success() {
            eprintln!("binary exited with {}", status);
            process::exit(1);
        }
        times.push(elapsed);
        println!("  run {}/{}: {:.4}s", i + 1, runs, elapsed);
    }

    let min = times.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = times.iter().cloned().fold(0.0, f64::max);
    let avg = times.iter().sum::<f64>() / times.len() as f64;
    println!("\n  min: {:.4}s  avg: {:.4}s  max: {:.4}s", min, avg, max);
    Ok(())
}
