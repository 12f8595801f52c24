use rustyline::error::ReadlineError;
use rustyline::Editor;

use brio_interpreter::{object::Object, Interpreter};

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn repl() {
    println!("brio v{}", VERSION);

    let mut interpreter = Interpreter::new();

    // `()` can be used when no completer is required
    let mut rl = Editor::<()>::new();
    loop {
        let readline = rl.readline(">> ");
        match readline {
            Ok(line) => {
                if line.trim() == "exit" || line.trim() == "quit" {
                    break;
                }
                // Skip empty lines
                else if line.trim().is_empty() {
                    continue;
                }

                rl.add_history_entry(line.as_str());

                match interpreter.eval(&line) {
                    // A statement with no value has nothing to show
                    Ok(result) if matches!(result.as_ref(), Object::Null) => {}
                    Ok(result) => println!("{}", result),
                    Err(error) => println!("{}", error),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
}
