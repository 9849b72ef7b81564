use crate::cloner::clone_resource;
use crate::error::{Error, Result};
use crate::layout::Layout;
use crate::overlay::Overlay;
use crate::pool::{create_pool, PoolNames};
use crate::script::ScriptPatcher;
use crate::tags::merge_tags;
use crate::template::{AutoScalingGroup, LaunchConfig, Section, Template};
use serde_json::Value;

/// Applies overlays to a template, one after another
///
/// Each overlay either applies in full or fails leaving the template as it was.
#[derive(Debug, Clone)]
pub struct Generator {
    template: Template,
    layout: Layout,
}

impl Generator {
    pub fn new(document: Value) -> Result<Self> {
        Ok(Generator {
            template: Template::new(document)?,
            layout: Layout::default(),
        })
    }

    /// Same as [`Generator::new`], for a template which may not have been loaded
    pub fn from_document(document: Option<Value>) -> Result<Self> {
        Self::new(document.ok_or(Error::MissingTemplate)?)
    }

    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = layout;
        self
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The final document, ready to be serialized
    pub fn finish(self) -> Value {
        self.template.into_value()
    }

    /// Apply an overlay to a new worker pool if it has a name, or to the managers otherwise
    pub fn apply(&mut self, overlay: &Overlay) -> Result<Option<PoolNames>> {
        if overlay.name.is_some() {
            self.worker(overlay).map(Some)
        } else {
            self.manager(overlay).map(|_| None)
        }
    }

    /// Create a worker pool named after the overlay and apply the overlay to it
    pub fn worker(&mut self, overlay: &Overlay) -> Result<PoolNames> {
        let names = create_pool(&mut self.template, &self.layout, overlay)?;
        log::info!("Created worker pool {} ({})", names.asg, names.launch_config);
        Ok(names)
    }

    /// Apply an overlay to the manager group and its launch configuration
    ///
    /// Only the resources the overlay actually changes are looked up.
    pub fn manager(&mut self, overlay: &Overlay) -> Result<()> {
        if overlay.is_noop() {
            log::debug!("Empty manager overlay, nothing to apply");
            return Ok(());
        }

        let mut staged = Vec::new();

        if !overlay.custom_tags.is_empty() {
            let name = self.layout.manager_asg.clone();
            let mut node = clone_resource(&self.template, &name)?;
            merge_tags(&mut AutoScalingGroup::new(&name, &mut node), &overlay.custom_tags)?;
            staged.push((Section::Resources, name, node));
        }

        if !overlay.labels.is_empty() || !overlay.after_daemon_started.is_empty() {
            let name = format!(
                "{}{}",
                self.layout.manager_launch_config,
                self.template.version_suffix(&self.layout)?
            );

            let mut node = clone_resource(&self.template, &name)?;

            {
                let mut launch_config = LaunchConfig::new(&name, &mut node);
                let mut script = launch_config.script()?;

                if !script.inject_labels(&overlay.labels) && !overlay.labels.is_empty() {
                    log::warn!("No labels marker in the script of {name}, labels are not set");
                }

                if !script.insert_commands(&overlay.after_daemon_started)
                    && !overlay.after_daemon_started.is_empty()
                {
                    log::warn!("No init sentinel in the script of {name}, commands are not added");
                }
            }

            staged.push((Section::Resources, name, node));
        }

        self.template.insert_all(staged)?;
        log::info!("Applied manager overlay");
        Ok(())
    }
}
