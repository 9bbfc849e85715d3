use std::io::{self, BufRead, Write};

use clap::Parser as ClapParser;
use pratt::{parse_binding, Bindings, Error, Expr};

#[derive(ClapParser, Debug)]
#[command(version, about = "Parse and evaluate arithmetic expressions", long_about = None)]
struct Args {
    /// Expressions to evaluate. Starts an interactive session when empty.
    expressions: Vec<String>,

    /// Value for a symbol, as `name=value`. May be repeated.
    #[arg(short, long = "bind", value_parser = binding)]
    bindings: Vec<(String, f64)>,

    /// Print the folded tree instead of the parsed one.
    #[arg(long)]
    fold: bool,
}

fn binding(s: &str) -> Result<(String, f64), String> {
    parse_binding(s).ok_or_else(|| format!("expected name=value, got {s:?}"))
}

fn carets(err: &Error) -> String {
    let start = err.span.start;
    let end = err.span.end.max(start + 1);
    format!("{}{}", " ".repeat(start), "^".repeat(end - start))
}

struct Context {
    bindings: Bindings,
    fold: bool,
}

impl Context {
    fn report(&self, input: &str, parsed: Result<Expr, Error>) -> String {
        let mut expr = match parsed {
            Ok(expr) => expr,
            Err(err) => {
                let marker = carets(&err);
                return format!("[Echo] {input}\n       {marker}\n[Error] {err}");
            }
        };
        if !expr.bind(&self.bindings) {
            log::debug!("unbound symbols in {:?}: {:?}", input, expr.symbols());
        }
        let shown = if self.fold {
            expr.fold().map(|folded| folded.render())
        } else {
            Ok(expr.render())
        };
        match (shown, expr.value()) {
            (Ok(shown), Ok(value)) => {
                format!("[Echo] {input}\n[Parse] {shown}\n[Eval] {value}")
            }
            (Err(err), _) | (_, Err(err)) => format!("[Error] {err}"),
        }
    }
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    let ctx = Context {
        bindings: args.bindings.into_iter().collect(),
        fold: args.fold,
    };

    if !args.expressions.is_empty() {
        let sources: Vec<&str> = args.expressions.iter().map(String::as_str).collect();
        for (input, parsed) in sources.iter().zip(pratt::parse_many(sources.clone())) {
            println!("{}", ctx.report(input, parsed));
        }
        return;
    }

    println!("Type \"q|quit|exit\" line to quit.");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("{err}");
                break;
            }
        };
        let input = line.trim();
        match input {
            "q" | "quit" | "exit" => break,
            "" => continue,
            _ => {
                println!("{}", ctx.report(input, pratt::parse(input)));
                let _ = stdout.flush();
            }
        }
    }
}
