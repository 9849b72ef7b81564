use crate::error::Result;
use crate::template::AutoScalingGroup;
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};

/// Autoscaling group tag records, in the order of keys
pub fn tag_records(tags: &BTreeMap<String, String>) -> Vec<Value> {
    tags.iter()
        .map(|(key, value)| {
            json!({
                "Key": key,
                "Value": value,
                "PropagateAtLaunch": true
            })
        })
        .collect()
}

/// Merge custom tags into the tag list of an autoscaling group
///
/// Tags already present on the group win, custom tags with the same key are dropped.
/// The new records go in front of the existing ones.
pub fn merge_tags(group: &mut AutoScalingGroup, tags: &BTreeMap<String, String>) -> Result<()> {
    if tags.is_empty() {
        return Ok(());
    }

    let name = group.name().to_string();
    let existing = group.tags_mut()?;

    let present = existing
        .iter()
        .filter_map(|tag| tag.get("Key").and_then(Value::as_str))
        .collect::<HashSet<&str>>();

    let (skipped, added): (BTreeMap<_, _>, BTreeMap<_, _>) = tags
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .partition(|(key, _)| present.contains(key.as_str()));

    for key in skipped.keys() {
        log::warn!("Tag {key:?} is already set on {name}, keeping the existing value");
    }

    let mut merged = tag_records(&added);
    merged.append(existing);
    *existing = merged;

    log::debug!("Added {} tag(s) to {name}", added.len());
    Ok(())
}
