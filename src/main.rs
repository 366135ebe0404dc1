use clap::Parser;
use layergen::cli::{Cli, Commands};
use layergen::output::Printer;
use miette::Result;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Generate(args) => layergen::cli::generate::run(args, &printer)?,
        Commands::List(args) => layergen::cli::list::run(args, &printer)?,
        Commands::Init(args) => layergen::cli::init::run(args, &printer)?,
        Commands::Completions(args) => layergen::cli::completions::run(args)?,
    }

    Ok(())
}
