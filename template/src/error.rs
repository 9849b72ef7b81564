use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while applying an overlay to a template
///
/// All of them abort the overlay being applied. The template revision is left
/// as it was before the overlay started.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The generator was constructed without a template document
    #[error("A template must be specified")]
    MissingTemplate,

    /// A parameter, resource or a location inside of one is missing
    #[error("{kind} not found: {name}")]
    NotFound { kind: Kind, name: String },

    /// The overlay can't be applied as requested
    #[error("Invalid overlay: {0}")]
    InvalidOverlay(String),
}

/// What was looked up when [`Error::NotFound`] was raised
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Parameter,
    Resource,

    /// A path inside of a node, e.g. `Properties.Tags`
    Location,

    /// A symbolic reference pointing at nothing
    Reference,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Kind::Parameter => "Parameter",
            Kind::Resource => "Resource",
            Kind::Location => "Location",
            Kind::Reference => "Reference target",
        };

        write!(f, "{}", str)
    }
}

impl Error {
    pub(crate) fn not_found(kind: Kind, name: impl Into<String>) -> Self {
        Error::NotFound {
            kind,
            name: name.into(),
        }
    }
}
