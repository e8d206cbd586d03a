use std::rc::Rc;

use toolbar_contracts::toolbar::{ComponentGroup, ControlDescriptor, TabConfig};
use uuid::Uuid;

use super::element::ElementDescriptor;
use super::host::{ControlHandle, TabHeader};
use super::predicate::{ActivationPredicate, ActivationRule};

/// Declared tab, before rendering. Unlike `TabConfig` it can carry a
/// custom rule.
#[derive(Debug, Clone)]
pub struct TabDefinition {
    pub label: String,
    pub activate_on: ActivationRule,
    pub components: Vec<ComponentGroup>,
}

impl TabDefinition {
    pub fn new(label: &str, activate_on: ActivationRule, components: Vec<ComponentGroup>) -> Self {
        Self {
            label: label.to_string(),
            activate_on,
            components,
        }
    }
}

impl From<TabConfig> for TabDefinition {
    fn from(config: TabConfig) -> Self {
        Self {
            label: config.label,
            activate_on: config.activate_on.into(),
            components: config.components,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabState {
    Hidden,
    Shown,
    Selected,
}

#[derive(Debug)]
pub struct RenderedControl {
    pub descriptor: ControlDescriptor,
    pub handle: ControlHandle,
    visible: bool,
}

impl RenderedControl {
    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

#[derive(Debug, Default)]
pub struct ControlGroup {
    controls: Vec<RenderedControl>,
}

impl ControlGroup {
    pub fn controls(&self) -> &[RenderedControl] {
        &self.controls
    }

    /// A group is visible while any of its controls is.
    pub fn is_visible(&self) -> bool {
        self.controls.iter().any(|c| c.visible)
    }
}

pub struct Tab {
    id: String,
    label: String,
    index: usize,
    predicate: ActivationPredicate,
    groups: Vec<ControlGroup>,
    activated: bool,
}

impl Tab {
    /// Builds the tab, rendering every leaf control through `render`.
    pub fn new(
        index: usize,
        definition: TabDefinition,
        mut render: impl FnMut(&ControlDescriptor) -> ControlHandle,
    ) -> Self {
        let groups = definition
            .components
            .into_iter()
            .map(|group| ControlGroup {
                controls: group
                    .into_iter()
                    .map(|descriptor| RenderedControl {
                        handle: render(&descriptor),
                        descriptor,
                        visible: true,
                    })
                    .collect(),
            })
            .collect();

        Self {
            id: format!("toolbar-tab-{}", Uuid::new_v4()),
            label: definition.label,
            index,
            predicate: ActivationPredicate::from_rule(definition.activate_on),
            groups,
            activated: false,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub(crate) fn set_activated(&mut self, activated: bool) {
        self.activated = activated;
    }

    pub fn groups(&self) -> &[ControlGroup] {
        &self.groups
    }

    pub fn header(&self) -> TabHeader {
        TabHeader {
            id: self.id.clone(),
            label: self.label.clone(),
            index: self.index,
        }
    }

    /// True if the predicate accepts any effective element, or the absence
    /// of one.
    ///
    /// The "no element" case is appended to the list and the list is
    /// scanned from its end, so it is tested first.
    pub fn should_activate_for_elements(&self, elements: &[Rc<dyn ElementDescriptor>]) -> bool {
        elements
            .iter()
            .map(|el| Some(el.as_ref()))
            .chain(std::iter::once(None))
            .rev()
            .any(|el| self.predicate.evaluate(el))
    }

    pub fn contains_control(&self, name: &str) -> bool {
        self.control(name).is_some()
    }

    pub fn control(&self, name: &str) -> Option<&RenderedControl> {
        self.groups
            .iter()
            .flat_map(|g| g.controls.iter())
            .find(|c| c.descriptor.name() == name)
    }

    /// Sets the visibility of every control named `name`.
    ///
    /// Returns `(group_index, group_visible)` for each group whose own
    /// visibility changed as a result.
    pub fn set_control_visible(&mut self, name: &str, visible: bool) -> Vec<(usize, bool)> {
        let mut changed = Vec::new();
        for (group_index, group) in self.groups.iter_mut().enumerate() {
            let before = group.is_visible();
            for control in group.controls.iter_mut() {
                if control.descriptor.name() == name {
                    control.visible = visible;
                }
            }
            let after = group.is_visible();
            if before != after {
                changed.push((group_index, after));
            }
        }
        changed
    }

    pub fn has_visible_controls(&self) -> bool {
        self.groups.iter().any(ControlGroup::is_visible)
    }
}
