/// Display global error message in unified format
#[derive(Debug)]
pub struct Error(String, Option<String>);

impl Error {
    pub fn new(message: &str, details: Option<&str>) -> Self {
        Error(message.to_string(), details.map(|d| d.to_string()))
    }
}

/// Display the message and details, as sort of a hint
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match &self.1 {
            Some(details) => write!(f, "{}\n\n{}", self.0, console::style(details).dim()),
            None => write!(f, "{}", self.0),
        }
    }
}

/// Implement std::error::Error trait for Error
impl std::error::Error for Error {}

/// Automatically convert all eyre error reports
///
/// Reports wrapped with an [`Error`] keep its message and hint.
impl From<eyre::ErrReport> for Error {
    fn from(error: eyre::ErrReport) -> Self {
        log::error!("{error:?}");

        error
            .downcast::<Error>()
            .unwrap_or_else(|err| Error::new(&err.to_string(), None))
    }
}

/// Errors of the template transformation, with hints on how to fix the input
impl From<dfagen_template::Error> for Error {
    fn from(error: dfagen_template::Error) -> Self {
        use dfagen_template::Error as TemplateError;

        let hint = match &error {
            TemplateError::MissingTemplate => "The template file holds no document.",

            TemplateError::NotFound { .. } => {
                "Is it a Docker for AWS template? Names of the base resources can be changed in the Layout section of the config."
            }

            TemplateError::InvalidOverlay(_) => {
                "Check the Workers section of the config, each worker needs a unique alphanumeric Name."
            }
        };

        Error::new(&error.to_string(), Some(hint))
    }
}
