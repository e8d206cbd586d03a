//! Live DOM adapters.
//!
//! `DomElement` answers selector tests through the browser's own
//! `Element.matches` / `Element.closest`, bounded by the editable root.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use toolbar_contracts::toolbar::SelectorList;
use web_sys::{Element, Node};

use crate::toolbar::{ElementDescriptor, SelectionSnapshot};

pub struct DomElement {
    element: Element,
    editable: Element,
}

impl DomElement {
    pub fn new(element: Element, editable: Element) -> Self {
        Self { element, editable }
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl ElementDescriptor for DomElement {
    fn matches(&self, selector: &SelectorList) -> bool {
        self.element.matches(selector.as_str()).unwrap_or(false)
    }

    fn has_ancestor_matching(&self, selector: &SelectorList) -> bool {
        let Some(parent) = self.element.parent_element() else {
            return false;
        };
        match parent.closest(selector.as_str()) {
            Ok(Some(found)) => {
                let found: &Node = &found;
                let editable: &Node = &self.editable;
                !found.is_same_node(Some(editable)) && editable.contains(Some(found))
            }
            _ => false,
        }
    }

    fn describe(&self) -> String {
        self.element.tag_name().to_ascii_lowercase()
    }
}

/// Elements between the caret and `editable`, outermost first.
///
/// Empty when there is no selection or it lies outside `editable`.
pub fn effective_elements(editable: &Element) -> Vec<Rc<dyn ElementDescriptor>> {
    let Some(anchor) = web_sys::window()
        .and_then(|w| w.get_selection().ok().flatten())
        .and_then(|selection| selection.anchor_node())
    else {
        return Vec::new();
    };
    if !editable.contains(Some(&anchor)) {
        return Vec::new();
    }

    let mut current = element_of(&anchor);
    let mut elements: Vec<Rc<dyn ElementDescriptor>> = Vec::new();
    let root: &Node = editable;
    while let Some(element) = current {
        if element.is_same_node(Some(root)) {
            break;
        }
        current = element.parent_element();
        elements.push(Rc::new(DomElement::new(element, editable.clone())));
    }
    elements.reverse();
    elements
}

pub fn selection_snapshot(editable: &Element) -> SelectionSnapshot {
    SelectionSnapshot::new(effective_elements(editable))
}

fn element_of(node: &Node) -> Option<Element> {
    match node.dyn_ref::<Element>() {
        Some(element) => Some(element.clone()),
        None => node.parent_element(),
    }
}
