use gloo_timers::callback::Timeout;

/// A scheduled callback that has not fired yet.
pub trait ScheduledTask {
    fn cancel(self: Box<Self>);
}

pub trait Scheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Box<dyn ScheduledTask>;
}

/// Browser clock backed by `setTimeout`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlooScheduler;

impl Scheduler for GlooScheduler {
    fn schedule(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> Box<dyn ScheduledTask> {
        Box::new(Timeout::new(delay_ms, task))
    }
}

impl ScheduledTask for Timeout {
    fn cancel(self: Box<Self>) {
        drop((*self).cancel());
    }
}
