// Lepton REPL - Line-Oriented Driver
//
// Per line: collect garbage rooted at the scope, read one form, evaluate,
// print the result or the error value. Collection happens only here,
// between top-level forms, where no evaluation frame holds unrooted
// values.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use lepton::arena::Arena;
use lepton::eval::{eval, eval_block};
use lepton::gc;
use lepton::primitives::register_primitives;
use lepton::printer::print_to_string;
use lepton::reader::{self, Reader};
use lepton::repl::register_repl_runtime;
use lepton::scope::Scope;

fn eval_line(arena: &mut Arena, scope: &mut Scope, line: &str) {
    let mut rest = line;

    loop {
        gc::collect(arena, scope.expr);

        let mut lisp_reader = Reader::new(rest, arena);
        let form = match lisp_reader.read() {
            None => return,
            Some(Ok(form)) => form,
            Some(Err(err)) => {
                eprintln!("Error:\t{}", err);
                return;
            }
        };
        let consumed = lisp_reader.consumed();

        match eval(arena, scope, form) {
            Ok(value) => println!("{}", print_to_string(arena, value)),
            Err(error) => {
                eprintln!("Error:\t{}", print_to_string(arena, error));
                return;
            }
        }

        rest = &rest[consumed..];
    }
}

fn run_script(arena: &mut Arena, scope: &mut Scope, filename: &str) {
    let source = match std::fs::read_to_string(filename) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error:\tcould not read {}: {}", filename, err);
            std::process::exit(1);
        }
    };

    let forms = match reader::read_all(arena, &source) {
        Ok(forms) => forms,
        Err(err) => {
            eprintln!("Error:\t{}", err);
            std::process::exit(1);
        }
    };

    if let Err(error) = eval_block(arena, scope, forms) {
        eprintln!("Error:\t{}", print_to_string(arena, error));
        std::process::exit(1);
    }
}

fn main() -> rustyline::Result<()> {
    let mut arena = Arena::new();
    let mut scope = Scope::create(&mut arena);
    register_primitives(&mut arena, &mut scope);
    register_repl_runtime(&mut arena, &mut scope);

    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 {
        run_script(&mut arena, &mut scope, &args[1]);
        return Ok(());
    }

    println!("Lepton v0.2.0 - A Small Mark-and-Sweep Lisp");
    println!("Type (quit) or Ctrl-D to exit");
    println!();

    let mut editor = DefaultEditor::new()?;
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                eval_line(&mut arena, &mut scope, &line);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Readline error: {}", err);
                break;
            }
        }
    }

    Ok(())
}
