use std::collections::VecDeque;

/// What a task wants after one unit of work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Continue,
    Done,
}

/// A unit of deferred work that advances one step per scheduler tick.
pub trait IdleTask {
    fn tick(&mut self) -> Tick;
}

impl<F> IdleTask for F
where
    F: FnMut() -> Tick,
{
    fn tick(&mut self) -> Tick {
        self()
    }
}

/// Single-threaded cooperative work queue.
///
/// The owner (the picker's event loop, or a CLI command draining it) calls
/// [`IdleScheduler::run_once`] whenever it has nothing better to do. Each call
/// advances exactly one task by exactly one step, so control returns to the
/// caller between units of work. Tasks are served round-robin.
#[derive(Default)]
pub struct IdleScheduler {
    tasks: VecDeque<Box<dyn IdleTask>>,
}

impl IdleScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, task: impl IdleTask + 'static) {
        self.tasks.push_back(Box::new(task));
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Advance one task by one step. Returns false when there was nothing to run.
    pub fn run_once(&mut self) -> bool {
        let Some(mut task) = self.tasks.pop_front() else {
            return false;
        };
        if task.tick() == Tick::Continue {
            self.tasks.push_back(task);
        }
        true
    }

    /// Drain every task. Returns the number of ticks spent.
    pub fn run_until_idle(&mut self) -> usize {
        let mut ticks = 0;
        while self.run_once() {
            ticks += 1;
        }
        ticks
    }
}
