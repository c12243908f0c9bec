//! Relgraph CLI - Generate draw.io relationship diagrams

mod cli;

use clap::Parser;

fn main() {
    let cli_args = cli::Cli::parse();

    // Logging is set up inside run() once the CLI flags are known
    let mut app = cli::RelgraphApp::new();

    if let Err(e) = app.run(cli_args) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
