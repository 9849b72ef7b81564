//! Worker pools cloned from the base node pool
//!
//! A pool is the sizing parameter, the instance type parameter, an autoscaling group
//! and its launch configuration. The base pool is copied node by node, references
//! between the copies are pointed at the new names, the overlay is applied, and only
//! then the copies are inserted into the template all at once.
use crate::cloner::{clone_parameter, clone_resource};
use crate::error::{Error, Kind, Result};
use crate::layout::Layout;
use crate::overlay::Overlay;
use crate::reference::{collect_references, rewrite_references, PSEUDO_PREFIX};
use crate::script::ScriptPatcher;
use crate::tags::merge_tags;
use crate::template::{AutoScalingGroup, LaunchConfig, Section, Template};
use serde_json::Value;
use std::collections::HashSet;

/// Identifiers of a worker pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolNames {
    pub size: String,
    pub instance_type: String,
    pub asg: String,
    pub launch_config: String,
}

impl PoolNames {
    pub fn derive(name: &str, version_suffix: &str) -> Self {
        PoolNames {
            size: format!("{name}WorkerSize"),
            instance_type: format!("{name}WorkerInstanceType"),
            asg: format!("{name}WorkerAsg"),
            launch_config: format!("{name}WorkerLaunchConfig{version_suffix}"),
        }
    }

    /// Name of the copy of a companion parameter, e.g. "WorkerDiskSize" -> "InfraWorkerDiskSize"
    pub fn companion(name: &str, parameter: &str) -> String {
        format!("{name}{parameter}")
    }
}

/// Steps of pool creation, always passed in this order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Init,
    SizingCloned,
    InstanceTypeCloned,
    GroupCloned,
    LaunchConfigCloned,
    ReferencesRewired,
    OverlaysApplied,
}

/// Builds a new pool off the base node pool of a template
///
/// Never touches the template, the result is a [`PoolDraft`] to be committed.
pub struct PoolGenerator<'a> {
    template: &'a Template,
    layout: &'a Layout,
    name: String,
    names: PoolNames,
    base_launch_config: String,
    stage: Stage,

    parameters: Vec<(String, Value)>,
    asg: Value,
    launch_config: Value,

    /// Base name -> pool name, for every copied node
    renames: Vec<(String, String)>,
}

impl<'a> PoolGenerator<'a> {
    pub fn new(template: &'a Template, layout: &'a Layout, overlay: &Overlay) -> Result<Self> {
        let name = match overlay.name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(Error::InvalidOverlay(
                    "A Name must be provided for a worker pool".into(),
                ))
            }
        };

        if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(Error::InvalidOverlay(format!(
                "Pool name {name:?} must be alphanumeric"
            )));
        }

        let suffix = template.version_suffix(layout)?;
        let names = PoolNames::derive(&name, &suffix);

        let companions = layout
            .companion_parameters
            .iter()
            .filter(|companion| template.contains(Section::Parameters, companion.as_str()))
            .map(|companion| (Section::Parameters, PoolNames::companion(&name, companion)));

        let taken = [
            (Section::Parameters, names.size.clone()),
            (Section::Parameters, names.instance_type.clone()),
            (Section::Resources, names.asg.clone()),
            (Section::Resources, names.launch_config.clone()),
        ]
        .into_iter()
        .chain(companions)
        .any(|(section, target)| template.contains(section, &target));

        if taken {
            return Err(Error::InvalidOverlay(format!("Pool {name} already exists")));
        }

        Ok(PoolGenerator {
            template,
            layout,
            base_launch_config: format!("{}{suffix}", layout.node_launch_config),
            name,
            names,
            stage: Stage::Init,
            parameters: Vec::new(),
            asg: Value::Null,
            launch_config: Value::Null,
            renames: Vec::new(),
        })
    }

    pub fn names(&self) -> &PoolNames {
        &self.names
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, stage: Stage) {
        log::debug!("Pool {}: {:?} -> {:?}", self.name, self.stage, stage);
        self.stage = stage;
    }

    /// Copy a parameter of the base pool under a new name
    fn copy_parameter(&mut self, base: &str, name: &str) -> Result<()> {
        let parameter = clone_parameter(self.template, base)?;
        self.parameters.push((name.to_string(), parameter));
        self.renames.push((base.to_string(), name.to_string()));
        Ok(())
    }

    /// Run all the steps and return the pool ready to be committed
    pub fn build(mut self, overlay: &Overlay) -> Result<PoolDraft> {
        let layout = self.layout;
        let names = self.names.clone();

        self.copy_parameter(&layout.cluster_size, &names.size)?;
        self.advance(Stage::SizingCloned);

        self.copy_parameter(&layout.instance_type, &names.instance_type)?;

        // Optional parameters, e.g. disk size and type
        for companion in layout.companion_parameters.iter() {
            if self.template.contains(Section::Parameters, companion) {
                self.copy_parameter(companion, &PoolNames::companion(&self.name, companion))?;
            } else {
                log::debug!("No {companion} parameter in the template, skipping");
            }
        }

        self.advance(Stage::InstanceTypeCloned);

        self.asg = clone_resource(self.template, &layout.node_asg)?;
        self.renames.push((layout.node_asg.clone(), names.asg.clone()));
        self.advance(Stage::GroupCloned);

        self.launch_config = clone_resource(self.template, &self.base_launch_config)?;
        self.renames
            .push((self.base_launch_config.clone(), names.launch_config.clone()));
        self.advance(Stage::LaunchConfigCloned);

        for (from, to) in self.renames.iter() {
            let count = rewrite_references(&mut self.asg, from, to)
                + rewrite_references(&mut self.launch_config, from, to);

            log::debug!("Rewired {count} reference(s) from {from} to {to}");
        }

        self.advance(Stage::ReferencesRewired);

        self.apply_overlay(overlay)?;
        self.advance(Stage::OverlaysApplied);

        self.verify_references()?;

        Ok(PoolDraft {
            names,
            parameters: self.parameters,
            asg: self.asg,
            launch_config: self.launch_config,
        })
    }

    fn apply_overlay(&mut self, overlay: &Overlay) -> Result<()> {
        merge_tags(
            &mut AutoScalingGroup::new(&self.names.asg, &mut self.asg),
            &overlay.custom_tags,
        )?;

        let mut launch_config = LaunchConfig::new(&self.names.launch_config, &mut self.launch_config);

        // Instances report the name of their group
        if launch_config.has_script() {
            launch_config.script()?.replace_line(
                &instance_name_line(&self.layout.node_asg),
                &instance_name_line(&self.names.asg),
            );
        }

        if overlay.labels.is_empty() && overlay.after_daemon_started.is_empty() {
            return Ok(());
        }

        let mut script = launch_config.script()?;

        if !script.inject_labels(&overlay.labels) && !overlay.labels.is_empty() {
            log::warn!(
                "No labels marker in the script of {}, labels are not set",
                self.names.launch_config
            );
        }

        // Copies of the base pool have no init sentinel of their own
        script.append_commands(&overlay.after_daemon_started);

        Ok(())
    }

    /// Every reference in the copies must point to an existing or a new node
    fn verify_references(&self) -> Result<()> {
        let known = self
            .template
            .names(Section::Parameters)
            .chain(self.template.names(Section::Resources))
            .chain(self.parameters.iter().map(|(name, _)| name.as_str()))
            .chain([self.names.asg.as_str(), self.names.launch_config.as_str()])
            .collect::<HashSet<&str>>();

        for (resource, node) in [
            (&self.names.asg, &self.asg),
            (&self.names.launch_config, &self.launch_config),
        ] {
            let dangling = collect_references(node)
                .into_iter()
                .find(|target| !target.starts_with(PSEUDO_PREFIX) && !known.contains(target.as_str()));

            if let Some(target) = dangling {
                return Err(Error::not_found(
                    Kind::Reference,
                    format!("{target} (referenced by {resource})"),
                ));
            }
        }

        Ok(())
    }
}

fn instance_name_line(asg: &str) -> String {
    format!("export INSTANCE_NAME='{asg}'\n")
}

/// A complete pool, not yet part of the template
#[derive(Debug, Clone)]
pub struct PoolDraft {
    names: PoolNames,
    parameters: Vec<(String, Value)>,
    asg: Value,
    launch_config: Value,
}

impl PoolDraft {
    pub fn names(&self) -> &PoolNames {
        &self.names
    }

    /// Insert all nodes of the pool into the template
    pub fn commit(self, template: &mut Template) -> Result<PoolNames> {
        let PoolDraft {
            names,
            parameters,
            asg,
            launch_config,
        } = self;

        let nodes = parameters
            .into_iter()
            .map(|(name, node)| (Section::Parameters, name, node))
            .chain([
                (Section::Resources, names.asg.clone(), asg),
                (Section::Resources, names.launch_config.clone(), launch_config),
            ])
            .collect();

        template.insert_all(nodes)?;
        Ok(names)
    }
}

/// Create a worker pool and apply the overlay to it
///
/// On failure the template is left untouched.
pub fn create_pool(template: &mut Template, layout: &Layout, overlay: &Overlay) -> Result<PoolNames> {
    let draft = PoolGenerator::new(template, layout, overlay)?.build(overlay)?;
    draft.commit(template)
}
