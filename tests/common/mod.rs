//! Instrumented element types shared by the integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Shared counters observed by every [`Tracked`] created from them.
#[derive(Default)]
pub struct Counters {
    live: Cell<isize>,
    clones: Cell<usize>,
    drops: Cell<usize>,
    /// Remaining clones before `Tracked::clone` panics. `None` = unlimited.
    clone_budget: Cell<Option<usize>>,
}

impl Counters {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn live(&self) -> isize {
        self.live.get()
    }

    pub fn clones(&self) -> usize {
        self.clones.get()
    }

    pub fn drops(&self) -> usize {
        self.drops.get()
    }

    /// Let `n` more clones succeed, then panic on the next one.
    pub fn fail_clone_after(&self, n: usize) {
        self.clone_budget.set(Some(n));
    }

    pub fn allow_all_clones(&self) {
        self.clone_budget.set(None);
    }
}

/// Element that reports construction, copy and destruction to [`Counters`].
pub struct Tracked {
    pub value: i32,
    counters: Rc<Counters>,
}

impl Tracked {
    pub fn new(counters: &Rc<Counters>, value: i32) -> Self {
        counters.live.set(counters.live.get() + 1);
        Self {
            value,
            counters: Rc::clone(counters),
        }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        if let Some(left) = self.counters.clone_budget.get() {
            if left == 0 {
                panic!("clone budget exhausted");
            }
            self.counters.clone_budget.set(Some(left - 1));
        }
        self.counters.clones.set(self.counters.clones.get() + 1);
        Tracked::new(&self.counters, self.value)
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.counters.live.set(self.counters.live.get() - 1);
        self.counters.drops.set(self.counters.drops.get() + 1);
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl fmt::Debug for Tracked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tracked({})", self.value)
    }
}

pub fn values(items: &[Tracked]) -> Vec<i32> {
    items.iter().map(|p| p.value).collect()
}

thread_local! {
    static DEFAULTS_LEFT: Cell<Option<usize>> = const { Cell::new(None) };
    static FLAKY_LIVE: Cell<isize> = const { Cell::new(0) };
}

/// Element whose `Default` panics once a per-thread budget runs out.
#[derive(Debug, PartialEq)]
pub struct FlakyDefault(pub u32);

impl FlakyDefault {
    pub fn fail_after(n: usize) {
        DEFAULTS_LEFT.with(|c| c.set(Some(n)));
    }

    pub fn reset() {
        DEFAULTS_LEFT.with(|c| c.set(None));
    }

    pub fn live() -> isize {
        FLAKY_LIVE.with(|c| c.get())
    }
}

impl Default for FlakyDefault {
    fn default() -> Self {
        DEFAULTS_LEFT.with(|c| {
            if let Some(left) = c.get() {
                if left == 0 {
                    panic!("default budget exhausted");
                }
                c.set(Some(left - 1));
            }
        });
        FLAKY_LIVE.with(|c| c.set(c.get() + 1));
        FlakyDefault(7)
    }
}

impl Drop for FlakyDefault {
    fn drop(&mut self) {
        FLAKY_LIVE.with(|c| c.set(c.get() - 1));
    }
}
