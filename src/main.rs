use clap::Parser;
use menunav::cli::commands::{Cli, Commands};
use menunav::cli::handlers;
use menunav::logging::{self, Verbosity};

fn main() {
    let cli = Cli::parse();
    logging::init_subscriber(Verbosity::from_flags(cli.verbose, cli.quiet));

    let result = match cli.command {
        // Init is handled before site discovery
        Commands::Init(args) => handlers::cmd_init(args),
        _ => handlers::dispatch(cli),
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
