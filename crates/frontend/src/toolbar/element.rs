use std::fmt;
use std::rc::Rc;

use toolbar_contracts::toolbar::{ElementInfo, SelectorList};

/// An ancestor element of the selection, as seen by activation rules.
///
/// Selectors arrive already parsed, so an invalid one never reaches here.
pub trait ElementDescriptor {
    /// Does the element itself match `selector`?
    fn matches(&self, selector: &SelectorList) -> bool;

    /// Does an ancestor of the element, inside the editable, match `selector`?
    fn has_ancestor_matching(&self, selector: &SelectorList) -> bool;

    /// Short label for logs.
    fn describe(&self) -> String;
}

impl ElementDescriptor for ElementInfo {
    fn matches(&self, selector: &SelectorList) -> bool {
        selector.matches(self)
    }

    fn has_ancestor_matching(&self, selector: &SelectorList) -> bool {
        selector.closest_ancestor(self).is_some()
    }

    fn describe(&self) -> String {
        self.tag().to_string()
    }
}

/// Effective elements of the current selection, outermost first.
#[derive(Clone, Default)]
pub struct SelectionSnapshot {
    effective_elements: Vec<Rc<dyn ElementDescriptor>>,
}

impl SelectionSnapshot {
    pub fn new(effective_elements: Vec<Rc<dyn ElementDescriptor>>) -> Self {
        Self { effective_elements }
    }

    pub fn from_infos(infos: impl IntoIterator<Item = ElementInfo>) -> Self {
        Self::new(
            infos
                .into_iter()
                .map(|info| Rc::new(info) as Rc<dyn ElementDescriptor>)
                .collect(),
        )
    }

    pub fn effective_elements(&self) -> &[Rc<dyn ElementDescriptor>] {
        &self.effective_elements
    }

    pub fn is_empty(&self) -> bool {
        self.effective_elements.is_empty()
    }
}

impl fmt::Debug for SelectionSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.effective_elements.iter().map(|e| e.describe()))
            .finish()
    }
}
