use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;
use std::{fs, io};

use clap::Parser;
use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;

use simdbg::evaluate_expression;

#[derive(Parser)]
#[command(name = "gen-expr")]
#[command(about = "Random expression generator cross-checked against a C compiler")]
struct Cli {
    /// How many expressions to emit
    #[arg(short = 'n', long, default_value_t = 10)]
    count: usize,

    /// Seed for reproducible output (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Deepest nesting the generator may reach
    #[arg(long, default_value_t = 12)]
    max_depth: u32,

    /// Also run the built-in evaluator and fail on any divergence
    #[arg(long)]
    verify: bool,
}

struct Generator {
    rng: StdRng,
    max_depth: u32,
}

impl Generator {
    fn expression(&mut self) -> String {
        let mut out = String::new();
        self.emit(&mut out, 0);
        out
    }

    /// Either a number, a parenthesized expression, or two expressions
    /// joined by a random operator. Past the depth bound only numbers
    /// come out, so the recursion always terminates.
    fn emit(&mut self, out: &mut String, depth: u32) {
        if depth >= self.max_depth {
            self.number(out);
            return;
        }
        match self.rng.gen_range(0..3) {
            0 => self.number(out),
            1 => {
                self.glyph(out, '(');
                self.emit(out, depth + 1);
                self.glyph(out, ')');
            }
            _ => {
                self.emit(out, depth + 1);
                self.operator(out);
                self.emit(out, depth + 1);
            }
        }
    }

    fn number(&mut self, out: &mut String) {
        let value: u32 = self.rng.gen();
        out.push_str(&value.to_string());
        self.spaces(out);
    }

    fn operator(&mut self, out: &mut String) {
        let glyph = match self.rng.gen_range(0..4) {
            0 => '+',
            1 => '-',
            2 => '*',
            _ => '/',
        };
        self.glyph(out, glyph);
    }

    fn glyph(&mut self, out: &mut String, glyph: char) {
        out.push(glyph);
        self.spaces(out);
    }

    fn spaces(&mut self, out: &mut String) {
        if self.rng.gen_range(0..2) == 1 {
            let n = self.rng.gen_range(0..20);
            out.push_str(&" ".repeat(n));
        }
    }
}

/// Compiles `expr` into a tiny C program and runs it, returning the
/// value it prints. `None` when the toolchain rejects the candidate.
fn run_oracle(expr: &str, source: &Path, binary: &Path) -> io::Result<Option<u32>> {
    let code = format!(
        "#include <stdio.h>\n\
         int main() {{ unsigned result = {}; printf(\"%u\", result); return 0; }}\n",
        unsigned_literals(expr)
    );
    fs::write(source, code)?;

    let compiled = Command::new("gcc")
        .arg(source)
        .arg("-o")
        .arg(binary)
        .status()?;
    if !compiled.success() {
        return Ok(None);
    }

    let output = Command::new(binary).output()?;
    if !output.status.success() {
        return Ok(None);
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().parse().ok())
}

/// Suffixes every literal so the C side computes in unsigned at each
/// step; plain int literals would promote to wider types and miss the
/// 32-bit wraparound on intermediate values.
fn unsigned_literals(expr: &str) -> String {
    static LITERAL: OnceLock<Regex> = OnceLock::new();
    LITERAL
        .get_or_init(|| Regex::new(r"[0-9]+").expect("literal pattern is fixed and valid"))
        .replace_all(expr, "${0}u")
        .into_owned()
}

fn main() -> io::Result<()> {
    // Initialize logging
    simdbg::init_logging();

    let cli = Cli::parse();
    let mut generator = Generator {
        rng: match cli.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        },
        max_depth: cli.max_depth,
    };

    let workspace = tempfile::tempdir()?;
    let source = workspace.path().join("expr.c");
    let binary = workspace.path().join("expr");

    let mut produced = 0usize;
    let mut attempts = 0usize;
    let mut mismatches = 0usize;

    while produced < cli.count {
        attempts += 1;
        if attempts > cli.count.saturating_mul(100).max(1000) {
            eprintln!("giving up after {} attempts; is gcc available?", attempts);
            std::process::exit(1);
        }

        let expr = generator.expression();
        let local = match evaluate_expression(&expr) {
            Ok(value) => value,
            // Zero divisor somewhere inside, or an over-long draw; take
            // a fresh candidate.
            Err(_) => continue,
        };
        let reference = match run_oracle(&expr, &source, &binary)? {
            Some(value) => value,
            None => {
                warn!("oracle rejected \"{}\"", expr);
                continue;
            }
        };

        println!("{} {}", reference, expr);
        if cli.verify && reference != local {
            eprintln!(
                "mismatch on \"{}\": evaluator {} oracle {}",
                expr, local, reference
            );
            mismatches += 1;
        }
        produced += 1;
    }

    if mismatches > 0 {
        eprintln!("{} of {} expressions diverged", mismatches, cli.count);
        std::process::exit(1);
    }
    Ok(())
}
