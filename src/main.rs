use anyhow::{bail, Context, Result};
use clap::Parser as _;
use moka::{parse, scan, Diagnostics};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

/// Scan and parse a Moka source file.
#[derive(Debug, clap::Parser)]
#[command(name = "moka", version, about)]
struct Args {
    /// Source file to read
    #[arg(value_name = "PATH")]
    path: PathBuf,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree (the default when no output is selected)
    #[arg(long)]
    ast: bool,
}

fn main() -> Result<()> {
    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let source = std::fs::read_to_string(&args.path)
        .with_context(|| format!("failed to read `{}`", args.path.display()))?;

    let mut diagnostics = Diagnostics::default();
    let tokens = scan(&source, &mut diagnostics);
    if args.tokens {
        for token in &tokens {
            println!("{}\t{}", token.offset, token.kind);
        }
    }

    if diagnostics.is_empty() {
        let program = parse(&tokens, &mut diagnostics);
        if let Ok(program) = program {
            if args.ast || !args.tokens {
                println!("{program:#?}");
            }
        }
    }

    for diagnostic in &diagnostics.items {
        eprintln!("{}", diagnostic.render(&source));
    }
    if !diagnostics.is_empty() {
        bail!(
            "{} reported {} error(s)",
            args.path.display(),
            diagnostics.len()
        );
    }
    Ok(())
}
