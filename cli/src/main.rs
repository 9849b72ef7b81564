mod commands;
mod config;
mod error;
mod logger;
mod runner;
mod writer;
use crate::commands::generate::GenerateCommand;
use crate::logger::Logger;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "dfagen",
    version,
    about = "Generate Docker for AWS templates with extra worker pools",
    long_about = "Extends a Docker for AWS CloudFormation template: clones the worker pool into new independently scalable pools, and adds custom tags, Docker daemon labels and boot commands to managers and workers."
)]
struct Cli {
    #[command(flatten)]
    command: GenerateCommand,
}

fn main() {
    Logger::init();
    let cli = Cli::parse();
    let writer = Writer::new(cli.command.output.clone());

    let mut runner = cli.command.runner(&writer);

    if let Err(error) = runner.run() {
        eprintln!("\n{}\n{error}", console::style("Error").red().bold());

        // The Error should be used as a terminating error
        std::process::exit(1)
    }
}
