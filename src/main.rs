mod assembler;
mod assign;
mod cli;
mod dates;
mod error;
mod extractor;
mod formats;
mod layout;
mod logging;
mod models;
mod rows;
mod settings;
mod source;
mod statement;
mod window;

use clap::Parser;

use cli::{Cli, Commands, Context};

fn main() {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);
    let ctx = Context::load(cli.config);

    let result = match cli.command {
        Commands::Convert {
            path,
            batch,
            format,
            statement_date,
            output,
        } => cli::convert::run(&ctx, &path, batch, format.as_deref(), statement_date, output),
        Commands::Preview {
            path,
            format,
            statement_date,
        } => cli::preview::run(&ctx, &path, format.as_deref(), statement_date),
        Commands::Combine { dir, output } => cli::combine::run(&ctx, &dir, output),
        Commands::Formats => cli::formats::list(&ctx),
        Commands::Init {
            with_templates,
            force,
        } => cli::init::run(&ctx, with_templates, force),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
