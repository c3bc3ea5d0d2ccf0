use std::env;
use std::fs;
use std::io::{self, stdin, BufRead, Write};
use std::process;

use rlox::{LoxError, TreeDump};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Run,
    Tokens,
    Ast,
    Tree,
}

#[derive(Debug)]
struct Options {
    mode: Mode,
    interactive: bool,
    script: Option<String>,
}

const USAGE: &str = "Usage: rlox [--tokens | --ast | --tree] [-i] [script]";

fn main() {
    rlox::init_tracing();

    let Some(options) = parse_args(env::args().skip(1)) else {
        println!("{USAGE}");
        process::exit(64);
    };
    tracing::debug!(?options, "starting");

    if let Some(path) = &options.script {
        let code = run_file(path, options.mode);
        if code != 0 && !options.interactive {
            process::exit(code);
        }
    }
    if options.script.is_none() || options.interactive {
        run_prompt(options.mode);
    }
}

fn parse_args(args: impl Iterator<Item = String>) -> Option<Options> {
    let mut options = Options {
        mode: Mode::Run,
        interactive: false,
        script: None,
    };

    for arg in args {
        match arg.as_str() {
            "--tokens" => options.mode = Mode::Tokens,
            "--ast" => options.mode = Mode::Ast,
            "--tree" => options.mode = Mode::Tree,
            "-i" | "--interactive" => options.interactive = true,
            flag if flag.starts_with('-') => return None,
            _ if options.script.is_some() => return None,
            _ => options.script = Some(arg),
        }
    }

    if options.interactive && options.script.is_none() {
        return None;
    }
    Some(options)
}

/// Runs a script, returning the process exit code it should produce.
fn run_file(path: &str, mode: Mode) -> i32 {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            println!("No such file: {path}");
            return 66;
        }
        Err(error) => {
            println!("Error reading file: {error}");
            return 74;
        }
    };

    match run(&text, mode) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("{error}");
            error.exit_code()
        }
    }
}

fn run_prompt(mode: Mode) {
    let mut lines = stdin().lock();

    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut input = String::new();
        match lines.read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(error) => {
                eprintln!("Input invalid: {error}");
                break;
            }
        }

        match prompt_command(&input) {
            Command::Quit => break,
            Command::ExitHint => println!("Use exit() to exit"),
            Command::Source(source) => {
                if let Err(error) = run(source, mode) {
                    eprintln!("{error}");
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command<'a> {
    Quit,
    ExitHint,
    Source(&'a str),
}

/// An empty line or `exit()` leaves the prompt; anything else is source.
fn prompt_command(line: &str) -> Command<'_> {
    match line.trim() {
        "" | "exit()" => Command::Quit,
        "exit" => Command::ExitHint,
        _ => Command::Source(line),
    }
}

fn run(source: &str, mode: Mode) -> Result<(), LoxError> {
    match mode {
        Mode::Run => rlox::run(source, io::stdout().lock()),
        Mode::Tokens => {
            let (tokens, errors) = rlox::scan(source);
            for token in &tokens {
                println!("{token}");
            }
            if errors.is_empty() {
                Ok(())
            } else {
                Err(LoxError::Scan(errors))
            }
        }
        Mode::Ast | Mode::Tree => {
            for statement in rlox::compile(source)? {
                if mode == Mode::Ast {
                    println!("{statement}");
                } else {
                    print!("{}", statement.dump());
                }
            }
            Ok(())
        }
    }
}
