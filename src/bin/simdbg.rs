use clap::Parser;
use simdbg::monitor::render_expr_error;
use simdbg::watchpoint::DEFAULT_CAPACITY;
use simdbg::Monitor;

#[derive(Parser)]
#[command(name = "simdbg")]
#[command(about = "Expression monitor for the machine simulation")]
struct Cli {
    /// Evaluate one expression and exit instead of starting a session
    #[arg(short, long)]
    eval: Option<String>,

    /// Number of watchpoint slots
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    watch_capacity: usize,
}

fn main() -> std::io::Result<()> {
    // Initialize logging
    simdbg::init_logging();

    let cli = Cli::parse();

    if let Some(expr) = cli.eval {
        match simdbg::evaluate_expression(&expr) {
            Ok(value) => println!("{} (0x{:x})", value, value),
            Err(err) => {
                eprintln!("{}", render_expr_error(&expr, &err));
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    Monitor::new(cli.watch_capacity).run()
}
