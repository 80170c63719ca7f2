//! FIFO tracker of a synchronous queue.
//!
//! Both pointers and the occupancy counter are clocked by the shared clock, so full and empty come straight from the
//! counter.

use crate::pointer::PointerWindow;

/// Ingress signal of FIFO tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct I {
    /// Write enable.
    pub enq: bool,
    /// Read enable.
    pub deq: bool,
}

/// Egress signal of FIFO tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct E {
    /// Write pointer before the edge.
    pub wptr_r: u64,
    /// Read pointer before the edge.
    pub rptr_r: u64,
    /// The write was committed.
    pub enq: bool,
    /// The read was committed.
    pub deq: bool,
}

/// Registers of FIFO tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct S {
    /// Write pointer.
    pub wptr: u64,
    /// Read pointer.
    pub rptr: u64,
    /// Occupied slots.
    pub count: usize,
    /// Overflow pulse.
    pub overflow: bool,
    /// Underflow pulse.
    pub underflow: bool,
}

impl S {
    /// Reset value.
    pub fn new(window: &PointerWindow) -> Self {
        Self { wptr: window.start(), rptr: window.start(), count: 0, overflow: false, underflow: false }
    }

    /// No free slot.
    pub fn full(&self, window: &PointerWindow) -> bool { self.count >= window.capacity() }

    /// No occupied slot.
    pub fn empty(&self) -> bool { self.count == 0 }
}

/// One edge of the shared clock.
pub fn step(window: &PointerWindow, input: I, state: S) -> (E, S) {
    let full = state.full(window);
    let empty = state.empty();

    let enq = input.enq && !full;
    let deq = input.deq && !empty;

    let output = E { wptr_r: state.wptr, rptr_r: state.rptr, enq, deq };
    let state_next = S {
        wptr: if enq { window.advance(state.wptr) } else { state.wptr },
        rptr: if deq { window.advance(state.rptr) } else { state.rptr },
        count: state.count + usize::from(enq) - usize::from(deq),
        overflow: input.enq && full,
        underflow: input.deq && empty,
    };
    (output, state_next)
}
