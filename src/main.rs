// cdecl: parse C declarations into resolved type trees

use clap::Parser;

/// Parse C declarations.
#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// One or more C declarations to be parsed.
    #[arg(required = true)]
    decl_strs: Vec<String>,
}

fn main() {
    let args = Args::parse();

    let decls = cdecl::parser::parse_decls(&args.decl_strs);

    let mut names: Vec<&String> = decls.keys().collect();
    names.sort();
    for name in names {
        println!("{}: {}", name, decls[name]);
    }
}
