//! Filter controller
//!
//! Group and status options are a fixed set, filled in the first time the
//! control is found holding only its placeholder. Collaborator options are
//! rebuilt from the [`GroupCache`] on every call.

use pulse_core::{Group, StatusKey};

use crate::document::{Document, ElementId, Instruction, SelectOption};
use crate::render::GroupCache;

/// The four user-editable filter controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterControl {
    Group,
    Collaborator,
    Status,
    Date,
}

impl FilterControl {
    pub const ALL: [FilterControl; 4] = [
        FilterControl::Group,
        FilterControl::Collaborator,
        FilterControl::Status,
        FilterControl::Date,
    ];

    /// The control's element in the document
    pub fn element(&self) -> ElementId {
        match self {
            FilterControl::Group => ElementId::GrupoFilter,
            FilterControl::Collaborator => ElementId::ColaboradorFilter,
            FilterControl::Status => ElementId::StatusFilter,
            FilterControl::Date => ElementId::DataFilter,
        }
    }
}

/// Placeholder plus both known groups
pub fn group_options() -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder())
        .chain(
            Group::ALL
                .iter()
                .map(|group| SelectOption::new(group.as_str(), group.as_str())),
        )
        .collect()
}

/// Placeholder plus every status bucket with its display label
pub fn status_options() -> Vec<SelectOption> {
    std::iter::once(SelectOption::placeholder())
        .chain(
            StatusKey::ALL
                .iter()
                .map(|status| SelectOption::new(status.as_str(), status.label())),
        )
        .collect()
}

/// Collaborator options for the currently selected group
///
/// With a group selected only its members are offered. Otherwise every
/// cached collaborator is offered, annotated with their group.
pub fn collaborator_options(selected_group: Option<Group>, cache: &GroupCache) -> Vec<SelectOption> {
    let mut options = vec![SelectOption::placeholder()];

    match selected_group {
        Some(group) => options.extend(
            cache
                .members(group)
                .iter()
                .map(|name| SelectOption::new(name.as_str(), name.as_str())),
        ),
        None => {
            for group in Group::ALL {
                options.extend(
                    cache
                        .members(group)
                        .iter()
                        .map(|name| SelectOption::new(name.as_str(), format!("{} ({})", name, group))),
                );
            }
        }
    }

    options
}

/// Instructions bringing the filter option lists up to date
///
/// Controls missing from the document are left alone.
pub fn refresh_filter_options(document: &Document, cache: &GroupCache) -> Vec<Instruction> {
    let mut instructions = Vec::new();

    let fixed: [(ElementId, fn() -> Vec<SelectOption>); 2] = [
        (ElementId::GrupoFilter, group_options),
        (ElementId::StatusFilter, status_options),
    ];
    for (target, options) in fixed {
        if let Some(element) = document.get(target) {
            if element.options.len() <= 1 {
                instructions.push(Instruction::SetOptions {
                    target,
                    options: options(),
                });
            }
        }
    }

    if document.contains(ElementId::ColaboradorFilter) {
        let selected = Group::parse(document.value(ElementId::GrupoFilter));
        tracing::debug!(
            selected_group = selected.map(|g| g.as_str()).unwrap_or(""),
            "Rebuilding collaborator filter"
        );
        instructions.push(Instruction::SetOptions {
            target: ElementId::ColaboradorFilter,
            options: collaborator_options(selected, cache),
        });
    }

    instructions
}
