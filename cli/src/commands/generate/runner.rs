use crate::commands::generate::GenerateCommand;
use crate::config::Config;
use crate::error::Error;
use crate::runner::Runner;
use crate::writer::Writer;
use dfagen_template::Generator;
use eyre::WrapErr;
use serde_json::Value;

pub(crate) struct GenerateRunner<'a> {
    pub(crate) command: GenerateCommand,
    pub(crate) writer: &'a Writer,
}

impl Runner for GenerateRunner<'_> {
    /// Apply the manager overlay, then create every worker pool in order
    fn run(&mut self) -> Result<(), Error> {
        let config = Config::from_path(&self.command.config)?;
        let template = self.template()?;

        let mut generator = Generator::new(template)?.with_layout(config.layout);

        if let Some(manager) = &config.manager {
            generator.manager(manager)?;

            self.writer.text(&format!(
                "{} manager overlay\n",
                console::style("Applied").green().bold()
            ))?;
        }

        for worker in config.workers.iter() {
            let names = generator.worker(worker)?;

            self.writer.text(&format!(
                "{} worker pool {} {}\n",
                console::style("Created").green().bold(),
                names.asg,
                console::style(format!("({}, {})", names.launch_config, names.size)).dim()
            ))?;
        }

        self.writer.json(&generator.finish())
    }
}

impl GenerateRunner<'_> {
    /// Read and parse the template file
    fn template(&self) -> Result<Value, Error> {
        let path = &self.command.template;

        let string = std::fs::read_to_string(path).wrap_err(Error::new(
            &format!("Failed to read template at {}", path.display()),
            Some("Check the path passed with -t"),
        ))?;

        serde_json::from_str(&string).map_err(|e| {
            self.error(
                Some(&format!("Couldn't parse template file at {}", path.display())),
                Some("The template must be a CloudFormation template in JSON format"),
                Some(e.into()),
            )
        })
    }
}
