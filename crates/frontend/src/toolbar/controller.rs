//! Toolbar lifecycle across editables.
//!
//! One controller instance owns every editable's toolbar state and the
//! single "active editable" slot. All operations are queued commands: a
//! command issued while another one runs (for example from a host callback)
//! is executed after it, never inside it.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::{Rc, Weak};

use toolbar_contracts::toolbar::ToolbarSettings;

use super::context::{ContextId, EditableContext, RenderState};
use super::element::{ElementDescriptor, SelectionSnapshot};
use super::host::ToolbarHost;
use super::tab::TabDefinition;
use super::tab_set::TabSet;
use super::timer::Scheduler;

/// Notifications delivered by the editing core.
#[derive(Debug, Clone)]
pub enum EditorEvent {
    SelectionChanged(Option<SelectionSnapshot>),
    EditableActivated(ContextId),
    EditableDeactivated(ContextId),
}

pub trait NotificationSource {
    fn subscribe(&self, handler: Box<dyn Fn(EditorEvent)>);
}

#[derive(Debug)]
enum Command {
    Register(ContextId, Vec<TabDefinition>),
    Render(ContextId),
    Show(ContextId),
    Hide(ContextId),
    HideElapsed(ContextId),
    Remove(ContextId),
    CheckActiveTabs(Option<SelectionSnapshot>),
    Foreground(String),
    SetControlVisible { name: String, visible: bool },
}

#[derive(Default)]
struct ControllerState {
    contexts: HashMap<ContextId, EditableContext>,
    active: Option<ContextId>,
    displayed: Option<ContextId>,
}

struct Inner {
    host: Rc<dyn ToolbarHost>,
    scheduler: Rc<dyn Scheduler>,
    defaults: Vec<TabDefinition>,
    grace_delay_ms: u32,
    state: RefCell<ControllerState>,
    queue: RefCell<VecDeque<Command>>,
    dispatching: Cell<bool>,
}

#[derive(Clone)]
pub struct ToolbarController {
    inner: Rc<Inner>,
}

impl ToolbarController {
    pub fn new(
        host: Rc<dyn ToolbarHost>,
        scheduler: Rc<dyn Scheduler>,
        defaults: Vec<TabDefinition>,
        grace_delay_ms: u32,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                host,
                scheduler,
                defaults,
                grace_delay_ms,
                state: RefCell::new(ControllerState::default()),
                queue: RefCell::new(VecDeque::new()),
                dispatching: Cell::new(false),
            }),
        }
    }

    pub fn from_settings(
        host: Rc<dyn ToolbarHost>,
        scheduler: Rc<dyn Scheduler>,
        settings: &ToolbarSettings,
    ) -> Self {
        let defaults = settings
            .tab_configs()
            .into_iter()
            .map(TabDefinition::from)
            .collect();
        Self::new(host, scheduler, defaults, settings.grace_delay_ms)
    }

    /// Subscribe to the editing core's notifications. Call once at startup.
    pub fn bind(&self, source: &dyn NotificationSource) {
        let weak: Weak<Inner> = Rc::downgrade(&self.inner);
        source.subscribe(Box::new(move |event| {
            if let Some(inner) = weak.upgrade() {
                ToolbarController { inner }.handle_event(event);
            }
        }));
    }

    pub fn handle_event(&self, event: EditorEvent) {
        match event {
            EditorEvent::SelectionChanged(snapshot) => self.check_active_tabs(snapshot),
            EditorEvent::EditableActivated(id) => self.show(id),
            EditorEvent::EditableDeactivated(id) => self.hide(id),
        }
    }

    /// Use `definitions` instead of the default tabs for this editable.
    /// Has no effect once its toolbar has been rendered.
    pub fn register(&self, id: ContextId, definitions: Vec<TabDefinition>) {
        self.dispatch(Command::Register(id, definitions));
    }

    pub fn render(&self, id: ContextId) {
        self.dispatch(Command::Render(id));
    }

    pub fn show(&self, id: ContextId) {
        self.dispatch(Command::Show(id));
    }

    /// Hide after the grace window, unless the editable is shown again first.
    pub fn hide(&self, id: ContextId) {
        self.dispatch(Command::Hide(id));
    }

    pub fn remove(&self, id: ContextId) {
        self.dispatch(Command::Remove(id));
    }

    pub fn check_active_tabs(&self, snapshot: Option<SelectionSnapshot>) {
        self.dispatch(Command::CheckActiveTabs(snapshot));
    }

    /// Bring the tab holding `control` to the front in the active editable.
    pub fn foreground(&self, control: &str) {
        self.dispatch(Command::Foreground(control.to_string()));
    }

    pub fn set_control_visible(&self, control: &str, visible: bool) {
        self.dispatch(Command::SetControlVisible {
            name: control.to_string(),
            visible,
        });
    }

    // Queries return nothing while a command is executing.

    pub fn active_context(&self) -> Option<ContextId> {
        self.inner.state.try_borrow().ok()?.active.clone()
    }

    pub fn render_state(&self, id: &ContextId) -> Option<RenderState> {
        let state = self.inner.state.try_borrow().ok()?;
        Some(
            state
                .contexts
                .get(id)
                .map_or(RenderState::NeverRendered, EditableContext::state),
        )
    }

    pub fn has_pending_hide(&self, id: &ContextId) -> bool {
        self.inner.state.try_borrow().is_ok_and(|state| {
            state
                .contexts
                .get(id)
                .is_some_and(EditableContext::has_pending_hide)
        })
    }

    pub fn with_tab_set<R>(&self, id: &ContextId, f: impl FnOnce(&TabSet) -> R) -> Option<R> {
        let state = self.inner.state.try_borrow().ok()?;
        state.contexts.get(id)?.tab_set().map(f)
    }

    fn dispatch(&self, command: Command) {
        self.inner.queue.borrow_mut().push_back(command);
        if self.inner.dispatching.replace(true) {
            return;
        }
        loop {
            let next = self.inner.queue.borrow_mut().pop_front();
            let Some(command) = next else {
                break;
            };
            self.execute(command);
        }
        self.inner.dispatching.set(false);
    }

    fn execute(&self, command: Command) {
        let inner = &self.inner;
        let host = inner.host.as_ref();
        let mut guard = inner.state.borrow_mut();
        let state = &mut *guard;

        match command {
            Command::Register(id, definitions) => {
                let context = state
                    .contexts
                    .entry(id.clone())
                    .or_insert_with(|| EditableContext::new(id.clone()));
                if !context.set_definitions(definitions) {
                    log::warn!("toolbar for '{id}' already rendered; tab override ignored");
                }
            }
            Command::Render(id) => {
                state
                    .contexts
                    .entry(id.clone())
                    .or_insert_with(|| EditableContext::new(id))
                    .render(&inner.defaults, host);
            }
            Command::Show(id) => {
                if let Some(previous) = state.displayed.take() {
                    if previous != id {
                        host.detach(&previous);
                        if let Some(context) = state.contexts.get_mut(&previous) {
                            context.set_state(RenderState::Hidden);
                        }
                    } else {
                        state.displayed = Some(previous);
                    }
                }

                let context = state
                    .contexts
                    .entry(id.clone())
                    .or_insert_with(|| EditableContext::new(id.clone()));
                if context.cancel_pending_hide() {
                    log::debug!("pending hide of '{id}' cancelled");
                }
                context.render(&inner.defaults, host);
                if state.displayed.as_ref() != Some(&id) {
                    host.attach(&id);
                }
                context.set_state(RenderState::Shown);
                log::debug!("toolbar shown for '{id}'");

                state.displayed = Some(id.clone());
                state.active = Some(id);
            }
            Command::Hide(id) => {
                let Some(context) = state.contexts.get_mut(&id) else {
                    return;
                };
                let weak = Rc::downgrade(&self.inner);
                let target = id.clone();
                let task = inner.scheduler.schedule(
                    inner.grace_delay_ms,
                    Box::new(move || {
                        if let Some(inner) = weak.upgrade() {
                            ToolbarController { inner }.dispatch(Command::HideElapsed(target));
                        }
                    }),
                );
                context.replace_pending_hide(task);
                log::debug!("hide of '{id}' scheduled in {}ms", inner.grace_delay_ms);
            }
            Command::HideElapsed(id) => {
                if let Some(context) = state.contexts.get_mut(&id) {
                    context.clear_pending_hide();
                }
                if state.active.as_ref() != Some(&id) {
                    log::debug!("hide of '{id}' superseded");
                    return;
                }
                state.active = None;
                if state.displayed.as_ref() == Some(&id) {
                    state.displayed = None;
                    host.detach(&id);
                }
                if let Some(context) = state.contexts.get_mut(&id) {
                    context.set_state(RenderState::Hidden);
                }
                log::debug!("toolbar hidden for '{id}'");
            }
            Command::Remove(id) => {
                let Some(mut context) = state.contexts.remove(&id) else {
                    return;
                };
                context.cancel_pending_hide();
                if state.displayed.as_ref() == Some(&id) {
                    state.displayed = None;
                    host.detach(&id);
                }
                if state.active.as_ref() == Some(&id) {
                    state.active = None;
                }
                host.destroy(&id);
                log::debug!("toolbar context '{id}' removed");
            }
            Command::CheckActiveTabs(snapshot) => {
                let Some(active) = state.active.as_ref() else {
                    return;
                };
                let elements: Vec<Rc<dyn ElementDescriptor>> = snapshot
                    .map(|s| s.effective_elements().to_vec())
                    .unwrap_or_default();
                if let Some(tab_set) = state
                    .contexts
                    .get_mut(active)
                    .and_then(EditableContext::tab_set_mut)
                {
                    tab_set.check_active_tabs(&elements);
                }
            }
            Command::Foreground(name) => {
                let Some(active) = state.active.as_ref() else {
                    return;
                };
                let Some(tab_set) = state
                    .contexts
                    .get_mut(active)
                    .and_then(EditableContext::tab_set_mut)
                else {
                    return;
                };
                if let Some(index) = tab_set.tab_index_for_control(&name) {
                    tab_set.foreground(index);
                }
            }
            Command::SetControlVisible { name, visible } => {
                for context in state.contexts.values_mut() {
                    let id = context.id().clone();
                    let Some(tab_set) = context.tab_set_mut() else {
                        continue;
                    };
                    for tab_index in 0..tab_set.len() {
                        let Some(tab) = tab_set.tab_mut(tab_index) else {
                            continue;
                        };
                        for (group_index, group_visible) in tab.set_control_visible(&name, visible) {
                            host.set_group_visible(&id, tab_index, group_index, group_visible);
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toolbar::predicate::ActivationRule;
    use crate::toolbar::tab::TabState;
    use crate::toolbar::testing::{ManualScheduler, RecordingHost};
    use toolbar_contracts::toolbar::{ControlDescriptor, ElementInfo, TabConfig};

    fn definitions() -> Vec<TabDefinition> {
        vec![
            TabDefinition::new(
                "Lists",
                ActivationRule::selector("ul,ol"),
                vec![vec![ControlDescriptor::new("orderedList")]],
            ),
            TabDefinition::new(
                "Table",
                ActivationRule::selector("table"),
                vec![vec![ControlDescriptor::new("addRow"), ControlDescriptor::new("addColumn")]],
            ),
        ]
    }

    fn setup() -> (ToolbarController, Rc<RecordingHost>, Rc<ManualScheduler>) {
        let host = RecordingHost::new();
        let scheduler = ManualScheduler::new();
        let controller = ToolbarController::new(host.clone(), scheduler.clone(), definitions(), 10);
        (controller, host, scheduler)
    }

    fn snapshot(tags: &[&str]) -> Option<SelectionSnapshot> {
        Some(SelectionSnapshot::from_infos(tags.iter().map(|t| ElementInfo::new(t))))
    }

    fn states(controller: &ToolbarController, id: &str) -> Vec<TabState> {
        controller
            .with_tab_set(&ContextId::from(id), |set| {
                (0..set.len()).filter_map(|i| set.tab_state(i)).collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_first_show_renders_once() {
        let (controller, host, _) = setup();
        let id = ContextId::from("a");
        assert_eq!(controller.render_state(&id), Some(RenderState::NeverRendered));

        controller.show(id.clone());
        assert_eq!(
            host.events(),
            vec!["render:a:orderedList", "render:a:addRow", "render:a:addColumn", "attach:a"]
        );
        assert_eq!(controller.render_state(&id), Some(RenderState::Shown));
        assert_eq!(controller.active_context(), Some(id.clone()));
        assert_eq!(
            host.widget("a").map(|w| w.log().visible.clone()),
            Some(vec![false, false])
        );

        host.clear_events();
        controller.render(id.clone());
        controller.show(id);
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_render_without_show_stays_hidden() {
        let (controller, host, _) = setup();
        let id = ContextId::from("a");
        controller.render(id.clone());
        assert_eq!(controller.render_state(&id), Some(RenderState::Hidden));
        assert_eq!(controller.active_context(), None);
        assert!(!host.events().iter().any(|e| e.starts_with("attach")));
    }

    #[test]
    fn test_show_switches_displayed_context() {
        let (controller, host, _) = setup();
        controller.show("a".into());
        host.clear_events();

        controller.show("b".into());
        let events = host.events();
        assert_eq!(events.first().map(String::as_str), Some("detach:a"));
        assert_eq!(events.last().map(String::as_str), Some("attach:b"));
        assert_eq!(controller.render_state(&"a".into()), Some(RenderState::Hidden));
        assert_eq!(controller.render_state(&"b".into()), Some(RenderState::Shown));
        assert_eq!(controller.active_context(), Some("b".into()));
    }

    #[test]
    fn test_hide_waits_for_grace_window() {
        let (controller, host, scheduler) = setup();
        let id = ContextId::from("a");
        controller.show(id.clone());
        host.clear_events();

        controller.hide(id.clone());
        assert!(controller.has_pending_hide(&id));
        scheduler.advance(9);
        assert_eq!(controller.active_context(), Some(id.clone()));

        scheduler.advance(1);
        assert_eq!(controller.active_context(), None);
        assert_eq!(controller.render_state(&id), Some(RenderState::Hidden));
        assert!(!controller.has_pending_hide(&id));
        assert_eq!(host.events(), vec!["detach:a"]);
    }

    #[test]
    fn test_show_within_grace_window_cancels_hide() {
        let (controller, host, scheduler) = setup();
        let id = ContextId::from("a");
        controller.show(id.clone());
        controller.hide(id.clone());
        controller.show(id.clone());
        assert_eq!(scheduler.pending(), 0);

        host.clear_events();
        scheduler.advance(50);
        assert_eq!(controller.active_context(), Some(id.clone()));
        assert_eq!(controller.render_state(&id), Some(RenderState::Shown));
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_hide_of_superseded_context_is_ignored() {
        let (controller, _host, scheduler) = setup();
        controller.show("a".into());
        controller.hide("a".into());
        controller.show("b".into());

        scheduler.advance(10);
        assert_eq!(controller.active_context(), Some("b".into()));
        assert_eq!(controller.render_state(&"b".into()), Some(RenderState::Shown));
    }

    #[test]
    fn test_hide_of_unknown_context_is_noop() {
        let (controller, _host, scheduler) = setup();
        controller.hide("ghost".into());
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_check_without_active_context_is_noop() {
        let (controller, _host, _) = setup();
        controller.render("a".into());
        controller.check_active_tabs(snapshot(&["table"]));
        assert_eq!(states(&controller, "a"), vec![TabState::Hidden, TabState::Hidden]);
    }

    #[test]
    fn test_lists_and_table_scenario() {
        let (controller, _host, _) = setup();
        controller.show("a".into());

        controller.check_active_tabs(snapshot(&["table"]));
        assert_eq!(states(&controller, "a"), vec![TabState::Hidden, TabState::Selected]);

        controller.check_active_tabs(snapshot(&["ul"]));
        assert_eq!(states(&controller, "a"), vec![TabState::Selected, TabState::Hidden]);

        controller.check_active_tabs(snapshot(&[]));
        assert_eq!(states(&controller, "a"), vec![TabState::Hidden, TabState::Hidden]);

        controller.check_active_tabs(None);
        assert_eq!(states(&controller, "a"), vec![TabState::Hidden, TabState::Hidden]);
    }

    #[test]
    fn test_selection_only_reaches_active_context() {
        let (controller, _host, _) = setup();
        controller.show("a".into());
        controller.show("b".into());

        controller.check_active_tabs(snapshot(&["table"]));
        assert_eq!(states(&controller, "a"), vec![TabState::Hidden, TabState::Hidden]);
        assert_eq!(states(&controller, "b"), vec![TabState::Hidden, TabState::Selected]);
    }

    #[test]
    fn test_register_overrides_defaults_before_render() {
        let (controller, host, _) = setup();
        controller.register(
            "a".into(),
            vec![TabDefinition::new("Only", ActivationRule::Unset, vec![])],
        );
        controller.show("a".into());
        assert_eq!(controller.with_tab_set(&"a".into(), TabSet::len), Some(1));

        controller.register("a".into(), definitions());
        assert_eq!(controller.with_tab_set(&"a".into(), TabSet::len), Some(1));
        assert!(!host.events().iter().any(|e| e.starts_with("render")));
    }

    #[test]
    fn test_from_settings_uses_legacy_components() {
        let host = RecordingHost::new();
        let scheduler = ManualScheduler::new();
        let settings = ToolbarSettings::from_json(r#"{"components":[["bold","italic"]],"graceDelayMs":30}"#)
            .unwrap();
        let controller = ToolbarController::from_settings(host.clone(), scheduler.clone(), &settings);

        controller.show("a".into());
        controller.check_active_tabs(snapshot(&["p"]));
        assert_eq!(states(&controller, "a"), vec![TabState::Selected]);

        controller.hide("a".into());
        scheduler.advance(29);
        assert_eq!(controller.active_context(), Some("a".into()));
        scheduler.advance(1);
        assert_eq!(controller.active_context(), None);
    }

    #[test]
    fn test_from_settings_with_tabs() {
        let settings = ToolbarSettings::with_tabs(vec![TabConfig::new(
            "Odd",
            serde_json::json!([1]).into(),
            vec![],
        )]);
        let controller =
            ToolbarController::from_settings(RecordingHost::new(), ManualScheduler::new(), &settings);
        controller.show("a".into());
        controller.check_active_tabs(snapshot(&["p"]));
        assert_eq!(states(&controller, "a"), vec![TabState::Hidden]);
    }

    #[test]
    fn test_remove_clears_active_and_pending_hide() {
        let (controller, host, scheduler) = setup();
        controller.show("a".into());
        controller.hide("a".into());
        controller.remove("a".into());

        assert_eq!(scheduler.pending(), 0);
        assert_eq!(controller.active_context(), None);
        assert_eq!(controller.render_state(&"a".into()), Some(RenderState::NeverRendered));
        assert!(host.events().ends_with(&["detach:a".to_string(), "destroy:a".to_string()]));
    }

    #[test]
    fn test_remove_unknown_context_is_ignored() {
        let (controller, host, _) = setup();
        controller.remove("ghost".into());
        assert!(host.events().is_empty());
    }

    #[test]
    fn test_foreground_by_control() {
        let (controller, _host, _) = setup();
        controller.register(
            "a".into(),
            vec![
                TabDefinition::new("Format", ActivationRule::Unset, vec![vec![ControlDescriptor::new("bold")]]),
                TabDefinition::new("Insert", ActivationRule::Unset, vec![vec![ControlDescriptor::new("link")]]),
            ],
        );
        controller.show("a".into());
        controller.check_active_tabs(None);
        assert_eq!(states(&controller, "a"), vec![TabState::Selected, TabState::Shown]);

        controller.foreground("link");
        assert_eq!(states(&controller, "a"), vec![TabState::Shown, TabState::Selected]);
        controller.foreground("missing");
        assert_eq!(states(&controller, "a"), vec![TabState::Shown, TabState::Selected]);
    }

    #[test]
    fn test_control_visibility_reports_group_changes() {
        let (controller, host, _) = setup();
        controller.show("a".into());
        host.clear_events();

        controller.set_control_visible("addRow", false);
        assert!(host.events().is_empty());
        controller.set_control_visible("addColumn", false);
        assert_eq!(host.events(), vec!["group:a:1:0:false"]);
    }

    #[test]
    fn test_commands_from_host_callbacks_are_queued() {
        let (controller, host, _) = setup();
        let reentrant = controller.clone();
        host.on_attach(move |id| {
            if id.as_str() == "a" {
                // Runs while `show(a)` is still executing.
                reentrant.check_active_tabs(snapshot(&["ul"]));
                assert_eq!(reentrant.active_context(), None);
            }
        });

        controller.show("a".into());
        assert_eq!(controller.active_context(), Some("a".into()));
        assert_eq!(states(&controller, "a"), vec![TabState::Selected, TabState::Hidden]);
    }

    #[test]
    fn test_bound_source_drives_controller() {
        #[derive(Default)]
        struct Source {
            handlers: RefCell<Vec<Box<dyn Fn(EditorEvent)>>>,
        }

        impl Source {
            fn emit(&self, event: EditorEvent) {
                for handler in self.handlers.borrow().iter() {
                    handler(event.clone());
                }
            }
        }

        impl NotificationSource for Source {
            fn subscribe(&self, handler: Box<dyn Fn(EditorEvent)>) {
                self.handlers.borrow_mut().push(handler);
            }
        }

        let (controller, _host, scheduler) = setup();
        let source = Source::default();
        controller.bind(&source);

        source.emit(EditorEvent::EditableActivated("a".into()));
        source.emit(EditorEvent::SelectionChanged(snapshot(&["table"])));
        assert_eq!(states(&controller, "a"), vec![TabState::Hidden, TabState::Selected]);

        source.emit(EditorEvent::EditableDeactivated("a".into()));
        scheduler.advance(10);
        assert_eq!(controller.active_context(), None);
    }
}
