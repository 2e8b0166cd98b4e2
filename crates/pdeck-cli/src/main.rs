#![forbid(unsafe_code)]

use clap::Parser;
use pdeck_cli::cli::{Cli, run};

fn main() {
    let cli = Cli::parse();
    let json = cli.log_json;
    pdeck_cli::init_tracing(json);
    if let Err(error) = run(cli) {
        if json {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("pdeck: {error}");
        }
        std::process::exit(error.exit_code());
    }
}
