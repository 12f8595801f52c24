use std::fs;
use std::sync::Once;

use anyhow::Context;
use clap::Parser;

use brio_interpreter::{object::Object, Interpreter};

mod repl;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script file to run instead of starting the interactive prompt
    path: Option<String>,

    /// Evaluate a single snippet and print its value
    #[arg(short, long, conflicts_with = "path")]
    eval: Option<String>,
}

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Enable with `RUST_LOG=brio_parser=debug` or `RUST_LOG=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

fn main() -> Result<(), anyhow::Error> {
    init_tracing();

    let args = Args::parse();

    if let Some(source) = args.eval {
        let mut interpreter = Interpreter::new();
        let result = interpreter.eval(&source)?;
        if !matches!(result.as_ref(), Object::Null) {
            println!("{}", result);
        }
        return Ok(());
    }

    if let Some(path) = args.path {
        let source =
            fs::read_to_string(&path).with_context(|| format!("failed to read {}", path))?;
        let mut interpreter = Interpreter::new();
        interpreter.execute(&source)?;
        return Ok(());
    }

    repl::repl();
    Ok(())
}
