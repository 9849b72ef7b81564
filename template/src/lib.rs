//! Transformations of Docker for AWS CloudFormation templates
//!
//! The base template runs one pool of managers and one pool of workers. This crate
//! adds more worker pools by cloning the base one, and merges tags, Docker daemon
//! labels and boot commands into the pools.
//!
//! ```no_run
//! use dfagen_template::{Generator, Overlay};
//!
//! # fn main() -> dfagen_template::Result<()> {
//! # let document = serde_json::json!({});
//! let mut generator = Generator::new(document)?;
//! generator.manager(&Overlay::default().with_tag("team", "ops"))?;
//! generator.worker(&Overlay::pool("Infra").with_labels(&["role=infra"]))?;
//! let template = generator.finish();
//! # Ok(())
//! # }
//! ```
pub mod cloner;
pub mod error;
pub mod generator;
pub mod layout;
pub mod overlay;
pub mod pool;
pub mod reference;
pub mod script;
pub mod tags;
pub mod template;

pub use error::{Error, Kind, Result};
pub use generator::Generator;
pub use layout::Layout;
pub use overlay::Overlay;
pub use pool::PoolNames;
pub use template::Template;
