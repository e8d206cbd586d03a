//! Recording fakes for the host, the tab widget and the clock.

use std::cell::{Cell, Ref, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use toolbar_contracts::toolbar::ControlDescriptor;

use super::context::ContextId;
use super::host::{ControlHandle, ControlRenderer, TabHeader, ToolbarHost};
use super::tab_set::TabWidget;
use super::timer::{ScheduledTask, Scheduler};

#[derive(Debug, Default)]
pub struct WidgetLog {
    pub visible: Vec<bool>,
    pub selected: Option<usize>,
    pub select_calls: Vec<usize>,
    pub cleared_styles: Vec<usize>,
    pub deselect_supported: bool,
}

#[derive(Clone)]
pub struct RecordingWidget {
    log: Rc<RefCell<WidgetLog>>,
}

impl RecordingWidget {
    pub fn new(handles: usize, deselect_supported: bool) -> Self {
        Self {
            log: Rc::new(RefCell::new(WidgetLog {
                visible: vec![false; handles],
                deselect_supported,
                ..WidgetLog::default()
            })),
        }
    }

    pub fn log(&self) -> Ref<'_, WidgetLog> {
        self.log.borrow()
    }

    /// A user click on a tab handle.
    pub fn click(&self, index: usize) {
        self.log.borrow_mut().selected = Some(index);
    }
}

impl TabWidget for RecordingWidget {
    fn handle_count(&self) -> usize {
        self.log.borrow().visible.len()
    }

    fn set_handle_visible(&mut self, index: usize, visible: bool) {
        if let Some(slot) = self.log.borrow_mut().visible.get_mut(index) {
            *slot = visible;
        }
    }

    fn select(&mut self, index: usize) {
        let mut log = self.log.borrow_mut();
        log.selected = Some(index);
        log.select_calls.push(index);
    }

    fn selected_index(&self) -> Option<usize> {
        self.log.borrow().selected
    }

    fn deselect_all(&mut self) -> bool {
        let mut log = self.log.borrow_mut();
        if log.deselect_supported {
            log.selected = None;
        }
        log.deselect_supported
    }

    fn clear_active_style(&mut self, index: usize) {
        self.log.borrow_mut().cleared_styles.push(index);
    }
}

type AttachHook = Box<dyn Fn(&ContextId)>;

#[derive(Default)]
pub struct RecordingHost {
    events: RefCell<Vec<String>>,
    widgets: RefCell<HashMap<ContextId, RecordingWidget>>,
    on_attach: RefCell<Option<AttachHook>>,
}

impl RecordingHost {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn events(&self) -> Vec<String> {
        self.events.borrow().clone()
    }

    pub fn clear_events(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn widget(&self, context: &str) -> Option<RecordingWidget> {
        self.widgets.borrow().get(&ContextId::from(context)).cloned()
    }

    pub fn on_attach(&self, hook: impl Fn(&ContextId) + 'static) {
        *self.on_attach.borrow_mut() = Some(Box::new(hook));
    }
}

impl ControlRenderer for RecordingHost {
    fn render_control(&self, control: &ControlDescriptor, context: &ContextId) -> ControlHandle {
        self.events
            .borrow_mut()
            .push(format!("render:{context}:{}", control.name()));
        ControlHandle::new(control.name().to_string())
    }
}

impl ToolbarHost for RecordingHost {
    fn create_tab_widget(&self, context: &ContextId, tabs: &[TabHeader]) -> Box<dyn TabWidget> {
        let widget = RecordingWidget::new(tabs.len(), true);
        self.widgets
            .borrow_mut()
            .insert(context.clone(), widget.clone());
        Box::new(widget)
    }

    fn attach(&self, context: &ContextId) {
        self.events.borrow_mut().push(format!("attach:{context}"));
        if let Some(hook) = self.on_attach.borrow().as_ref() {
            hook(context);
        }
    }

    fn detach(&self, context: &ContextId) {
        self.events.borrow_mut().push(format!("detach:{context}"));
    }

    fn destroy(&self, context: &ContextId) {
        self.events.borrow_mut().push(format!("destroy:{context}"));
        self.widgets.borrow_mut().remove(context);
    }

    fn set_group_visible(&self, context: &ContextId, tab_index: usize, group_index: usize, visible: bool) {
        self.events
            .borrow_mut()
            .push(format!("group:{context}:{tab_index}:{group_index}:{visible}"));
    }
}

struct ManualTask {
    due: u64,
    cancelled: Rc<Cell<bool>>,
    task: Box<dyn FnOnce()>,
}

struct ManualHandle {
    cancelled: Rc<Cell<bool>>,
}

impl ScheduledTask for ManualHandle {
    fn cancel(self: Box<Self>) {
        self.cancelled.set(true);
    }
}

/// Deterministic clock: timers fire only inside `advance`.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<u64>,
    tasks: RefCell<Vec<ManualTask>>,
}

impl ManualScheduler {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| !t.cancelled.get())
            .count()
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
        loop {
            let next = {
                let mut tasks = self.tasks.borrow_mut();
                tasks.retain(|t| !t.cancelled.get());
                let due = tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= self.now.get())
                    .min_by_key(|(_, t)| t.due)
                    .map(|(i, _)| i);
                due.map(|i| tasks.remove(i))
            };
            match next {
                Some(task) => (task.task)(),
                None => break,
            }
        }
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Box<dyn ScheduledTask> {
        let cancelled = Rc::new(Cell::new(false));
        self.tasks.borrow_mut().push(ManualTask {
            due: self.now.get() + u64::from(delay_ms),
            cancelled: cancelled.clone(),
            task,
        });
        Box::new(ManualHandle { cancelled })
    }
}
