use clap::Parser;
use limex::{Expression, Handle};

/// Parses an expression, binds variables and collections by name, and
/// prints the resulting value.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The expression to parse and evaluate.
    expression: String,

    /// A scalar binding of the form `name=value`. May be repeated.
    #[arg(short = 'v', long = "var", value_name = "NAME=VALUE")]
    variables: Vec<String>,

    /// A collection binding of the form `name=v1,v2,…`. May be repeated.
    #[arg(short = 'c', long = "coll", value_name = "NAME=V1,V2,…")]
    collections: Vec<String>,

    /// Also print the syntax tree in prefix notation.
    #[arg(short, long)]
    tree: bool,
}

fn main() {
    let args = Args::parse();

    let handle = Handle::<f64>::new();
    let expression = Expression::new(&args.expression, &handle).unwrap_or_else(|e| {
                                                                   eprintln!("{e}");
                                                                   std::process::exit(1);
                                                               });

    let variable_values =
        expression.variables()
                  .iter()
                  .map(|name| lookup(&args.variables, name).and_then(parse_value))
                  .collect::<Result<Vec<_>, _>>()
                  .unwrap_or_else(|e| {
                      eprintln!("{e}");
                      std::process::exit(1);
                  });

    let collection_values =
        expression.collections()
                  .iter()
                  .map(|name| lookup(&args.collections, name).and_then(parse_values))
                  .collect::<Result<Vec<_>, _>>()
                  .unwrap_or_else(|e| {
                      eprintln!("{e}");
                      std::process::exit(1);
                  });

    if args.tree {
        println!("{}", expression.stringify());
    }

    match expression.evaluate(&variable_values, &collection_values) {
        Ok(value) => match expression.target() {
            Some(target) => println!("{target} = {value}"),
            None => println!("{value}"),
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}

/// Finds the raw value bound to `name` in a list of `name=value` pairs.
fn lookup<'a>(bindings: &'a [String], name: &str) -> Result<&'a str, String> {
    bindings.iter()
            .find_map(|binding| {
                binding.split_once('=')
                       .filter(|(bound, _)| *bound == name)
                       .map(|(_, raw)| raw)
            })
            .ok_or_else(|| format!("No value bound to '{name}'."))
}

fn parse_value(raw: &str) -> Result<f64, String> {
    raw.parse().map_err(|_| format!("'{raw}' is not a number."))
}

fn parse_values(raw: &str) -> Result<Vec<f64>, String> {
    raw.split(',').map(str::trim).map(parse_value).collect()
}
