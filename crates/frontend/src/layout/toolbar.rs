//! Leptos-side toolbar: tab handles and panels driven by signals.

use std::rc::Rc;

use leptos::prelude::*;
use toolbar_contracts::toolbar::ControlDescriptor;

use crate::toolbar::{ContextId, ControlHandle, ControlRenderer, TabHeader, TabWidget, ToolbarHost};

/// Tab widget whose state lives in signals, so the view follows it.
#[derive(Debug, Clone, Copy)]
pub struct SignalTabWidget {
    visible: RwSignal<Vec<bool>>,
    selected: RwSignal<Option<usize>>,
}

impl SignalTabWidget {
    pub fn new(handles: usize) -> Self {
        Self {
            visible: RwSignal::new(vec![false; handles]),
            selected: RwSignal::new(None),
        }
    }

    pub fn is_visible(&self, index: usize) -> bool {
        self.visible
            .with(|visible| visible.get(index).copied().unwrap_or(false))
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected.get()
    }

    /// Selection picked by the user. Hidden handles cannot be clicked into view.
    pub fn click(&self, index: usize) {
        let visible = self
            .visible
            .with_untracked(|visible| visible.get(index).copied().unwrap_or(false));
        if visible {
            self.selected.set(Some(index));
        }
    }
}

impl TabWidget for SignalTabWidget {
    fn handle_count(&self) -> usize {
        self.visible.with_untracked(Vec::len)
    }

    fn set_handle_visible(&mut self, index: usize, visible: bool) {
        self.visible.update(|handles| {
            if let Some(slot) = handles.get_mut(index) {
                *slot = visible;
            }
        });
    }

    fn select(&mut self, index: usize) {
        self.selected.set(Some(index));
    }

    fn selected_index(&self) -> Option<usize> {
        self.selected.get_untracked()
    }

    fn deselect_all(&mut self) -> bool {
        self.selected.set(None);
        true
    }
}

#[derive(Debug, Clone)]
pub struct ToolbarModel {
    pub context: ContextId,
    pub headers: Vec<TabHeader>,
    pub widget: SignalTabWidget,
}

/// Reactive state shared between the host and the `Toolbar` view.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarSignals {
    pub displayed: RwSignal<Option<ContextId>>,
    pub toolbars: RwSignal<Vec<ToolbarModel>>,
}

impl ToolbarSignals {
    pub fn new() -> Self {
        Self {
            displayed: RwSignal::new(None),
            toolbars: RwSignal::new(Vec::new()),
        }
    }
}

impl Default for ToolbarSignals {
    fn default() -> Self {
        Self::new()
    }
}

pub struct LeptosToolbarHost {
    signals: ToolbarSignals,
    renderer: Rc<dyn ControlRenderer>,
}

impl LeptosToolbarHost {
    pub fn new(signals: ToolbarSignals, renderer: Rc<dyn ControlRenderer>) -> Self {
        Self { signals, renderer }
    }

    pub fn signals(&self) -> ToolbarSignals {
        self.signals
    }
}

impl ControlRenderer for LeptosToolbarHost {
    fn render_control(&self, control: &ControlDescriptor, context: &ContextId) -> ControlHandle {
        self.renderer.render_control(control, context)
    }
}

impl ToolbarHost for LeptosToolbarHost {
    fn create_tab_widget(&self, context: &ContextId, tabs: &[TabHeader]) -> Box<dyn TabWidget> {
        let widget = SignalTabWidget::new(tabs.len());
        let model = ToolbarModel {
            context: context.clone(),
            headers: tabs.to_vec(),
            widget,
        };
        self.signals.toolbars.update(|toolbars| {
            toolbars.retain(|m| &m.context != context);
            toolbars.push(model);
        });
        Box::new(widget)
    }

    fn attach(&self, context: &ContextId) {
        self.signals.displayed.set(Some(context.clone()));
    }

    fn detach(&self, context: &ContextId) {
        let displayed = self
            .signals
            .displayed
            .with_untracked(|d| d.as_ref() == Some(context));
        if displayed {
            self.signals.displayed.set(None);
        }
    }

    fn destroy(&self, context: &ContextId) {
        self.detach(context);
        self.signals
            .toolbars
            .update(|toolbars| toolbars.retain(|m| &m.context != context));
    }
}

#[component]
pub fn Toolbar(signals: ToolbarSignals) -> impl IntoView {
    let current = move || {
        let displayed = signals.displayed.get()?;
        signals
            .toolbars
            .with(|toolbars| toolbars.iter().find(|m| m.context == displayed).cloned())
    };

    view! {
        <div class="toolbar" class:hidden=move || signals.displayed.get().is_none()>
            {move || current().map(|model| view! { <ToolbarTabs model=model /> })}
        </div>
    }
}

#[component]
fn ToolbarTabs(model: ToolbarModel) -> impl IntoView {
    let widget = model.widget;
    let headers = model.headers;
    let panel_headers = headers.clone();

    view! {
        <div class="toolbar-tabs" data-context=model.context.to_string()>
            <For
                each=move || headers.clone()
                key=|header| header.id.clone()
                children=move |header: TabHeader| {
                    let index = header.index;
                    view! {
                        <div
                            class="toolbar-tab"
                            class:hidden=move || !widget.is_visible(index)
                            class:active=move || widget.selected() == Some(index)
                            on:click=move |_| widget.click(index)
                        >
                            <span>{header.label}</span>
                        </div>
                    }
                }
            />
        </div>
        <div class="toolbar-panels">
            <For
                each=move || panel_headers.clone()
                key=|header| header.id.clone()
                children=move |header: TabHeader| {
                    let index = header.index;
                    view! {
                        <div
                            class="toolbar-panel"
                            id=format!("{}-panel", header.id)
                            class:hidden=move || widget.selected() != Some(index)
                        ></div>
                    }
                }
            />
        </div>
    }
}
