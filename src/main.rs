use anyhow::Context;
use clap::Parser;
use std::env;
use std::process;

use xunitargs::cli::Cli;
use xunitargs::synthesize;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let working_dir = env::current_dir().context("could not determine working directory")?;
    let ctx = cli.to_context(&working_dir);

    let settings = match cli.to_settings() {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("{}", err);
            process::exit(2);
        }
    };

    match synthesize(&settings, &ctx) {
        Ok(args) => {
            for token in &args {
                println!("{}", token);
            }
            Ok(())
        }
        Err(err) => {
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
