//! Property conflict arbitration
//!
//! Requirements that reference the same declared property are resolved together:
//! every member proposes the property value that would reproduce its desired
//! version, the proposal satisfying the most members wins (ties go to the
//! earliest-declared member), and members the winner cannot satisfy are demoted
//! to a direct override of their own version text. Members are checked against
//! the patched properties, so a change reaching them through another property
//! counts too.

use crate::domain::{ManifestPatch, Requirement, SkipReason, UpdateResult, UpdateVia};
use crate::manifest::{placeholder_names, Manifest, PropertyRef};
use crate::update::template::Template;
use crate::update::Judgement;
use tracing::{debug, info};

/// Consolidate per-requirement judgements into one patch
///
/// `judgements` is indexed like `manifest.requirements`.
pub(crate) fn arbitrate(
    manifest: &Manifest,
    judgements: &[Judgement],
) -> (ManifestPatch, Vec<UpdateResult>) {
    let templates: Vec<Option<Template>> = (0..manifest.requirements.len())
        .map(|index| member_template(manifest, index))
        .collect();

    let mut changes: Vec<(&PropertyRef, String, String)> = Vec::new();
    for property in manifest.graph.properties() {
        let Some(current) = manifest.property_value(property) else {
            continue;
        };
        let members: Vec<(&Template, &str)> = manifest
            .graph
            .members(property)
            .iter()
            .filter_map(|&index| {
                let template = templates[index].as_ref()?;
                let desired = judgements.get(index)?.desired.as_deref()?;
                Some((template, desired))
            })
            .collect();

        let value = choose_value(&property.name, &members).unwrap_or_else(|| current.clone());
        if value != current {
            changes.push((property, current, value));
        }
    }

    // Literal properties first: a property defined through others is left alone
    // when their new values already produce the chosen one
    let (derived, literal): (Vec<_>, Vec<_>) = changes
        .into_iter()
        .partition(|(property, _, _)| raw_value(manifest, property).contains("${"));
    let mut patch = ManifestPatch::new();
    for (property, current, value) in literal.into_iter().chain(derived) {
        let raw = raw_value(manifest, property);
        if raw.contains("${") && manifest.resolve_patched(raw, &property.scope, &patch) == value {
            debug!(property = %property.name, value = %value, "Property follows its references");
            continue;
        }
        info!(
            property = %property.name,
            scope = %property.scope,
            from = %current,
            to = %value,
            "Updating shared property"
        );
        patch.set_property(property.scope.clone(), property.name.clone(), value);
    }

    let mut results = Vec::with_capacity(manifest.requirements.len());
    for (index, requirement) in manifest.requirements.iter().enumerate() {
        let judgement = &judgements[index];
        let Some(desired) = judgement.desired.clone() else {
            let reason = judgement
                .skip
                .clone()
                .unwrap_or(SkipReason::NoVersionsAvailable);
            results.push(UpdateResult::skip(requirement.clone(), reason));
            continue;
        };

        // Version the member ends up with once every property edit lands
        let via_property = templates[index].as_ref().and_then(|_| {
            let scope = requirement.origin.property_scope();
            let effective = manifest.resolve_patched(&requirement.declared, &scope, &patch);
            (effective == desired).then(|| changed_ref(manifest, &patch, index))
        });

        let result = match (&judgement.skip, via_property) {
            (Some(reason), Some(_)) => UpdateResult::skip(requirement.clone(), reason.clone()),
            (None, Some(Some(property))) => UpdateResult::update(
                requirement.clone(),
                desired,
                UpdateVia::Property {
                    scope: property.scope.clone(),
                    name: property.name.clone(),
                },
            ),
            (Some(reason), None) if desired == requirement.resolved => {
                if templates[index].is_some() {
                    // The shared property moved away from this member's version
                    debug!(requirement = %requirement, "Pinning outvoted requirement");
                    override_direct(&mut patch, requirement, &desired);
                    UpdateResult::update(requirement.clone(), desired, UpdateVia::Pinned)
                } else {
                    UpdateResult::skip(requirement.clone(), reason.clone())
                }
            }
            (Some(reason), None) => UpdateResult::skip(requirement.clone(), reason.clone()),
            (None, _) => {
                override_direct(&mut patch, requirement, &desired);
                UpdateResult::update(requirement.clone(), desired, UpdateVia::Direct)
            }
        };
        results.push(result);
    }

    (patch, results)
}

/// Template of a requirement with only its declared (patchable) properties left open
fn member_template(manifest: &Manifest, index: usize) -> Option<Template> {
    let refs = manifest.graph.refs(index);
    if refs.is_empty() {
        return None;
    }
    let requirement = &manifest.requirements[index];
    let scope = requirement.origin.property_scope();
    let mut template = Template::parse(&requirement.declared);
    let fixed: Vec<String> = template
        .placeholders()
        .into_iter()
        .filter(|name| !refs.iter().any(|r| r.name == *name))
        .map(str::to_string)
        .collect();
    for name in fixed {
        let value = manifest.resolve(&format!("${{{}}}", name), &scope);
        template = template.substitute(&name, &value);
    }
    Some(template)
}

/// Pick the value for `name` satisfying the most members; earlier proposals win ties
fn choose_value(name: &str, members: &[(&Template, &str)]) -> Option<String> {
    let mut candidates: Vec<String> = Vec::new();
    for (template, desired) in members {
        if let Some(value) = template.matches(desired).and_then(|b| b.get(name).cloned()) {
            if !candidates.contains(&value) {
                candidates.push(value);
            }
        }
    }

    let mut best: Option<(String, usize)> = None;
    for candidate in candidates {
        let satisfied = members
            .iter()
            .filter(|(template, desired)| {
                template.substitute(name, &candidate).matches(desired).is_some()
            })
            .count();
        if best.as_ref().map_or(true, |(_, count)| satisfied > *count) {
            best = Some((candidate, satisfied));
        }
    }
    best.map(|(value, _)| value)
}

/// First property the patch changes on the way from a requirement to its value
fn changed_ref(manifest: &Manifest, patch: &ManifestPatch, index: usize) -> Option<PropertyRef> {
    let scope = manifest.requirements[index].origin.property_scope();
    let mut queue: Vec<PropertyRef> = manifest.graph.refs(index).to_vec();
    let mut cursor = 0;
    while let Some(property) = queue.get(cursor).cloned() {
        cursor += 1;
        if patch.property(&property.scope, &property.name).is_some() {
            return Some(property);
        }
        for name in placeholder_names(raw_value(manifest, &property)) {
            if let Some(found) = manifest.properties.locate(&scope, &name) {
                let next = PropertyRef::new(found, name);
                if !queue.contains(&next) {
                    queue.push(next);
                }
            }
        }
    }
    None
}

fn raw_value<'m>(manifest: &'m Manifest, property: &PropertyRef) -> &'m str {
    manifest
        .properties
        .get(&property.scope, &property.name)
        .unwrap_or_default()
}

fn override_direct(patch: &mut ManifestPatch, requirement: &Requirement, version: &str) {
    patch.add_dependency(
        requirement.package.clone(),
        requirement.origin.clone(),
        version,
    );
}
