mod runner;
use crate::runner::{Runnable, Runner};
use crate::writer::Writer;
use runner::GenerateRunner;
use std::path::PathBuf;

#[derive(clap::Args, Clone)]
pub(crate) struct GenerateCommand {
    /// Path to the Docker for AWS CloudFormation template (JSON)
    #[arg(short, long, value_name = "PATH")]
    template: PathBuf,

    /// Path to the config with manager and worker overlays (JSON or TOML)
    #[arg(short, long, value_name = "PATH")]
    config: PathBuf,

    /// Write the generated template to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub(crate) output: Option<PathBuf>,
}

impl Runnable for GenerateCommand {
    fn runner<'a>(&self, writer: &'a Writer) -> impl Runner + 'a {
        GenerateRunner {
            command: self.clone(),
            writer,
        }
    }
}
