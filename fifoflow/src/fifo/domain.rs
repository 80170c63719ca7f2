//! Registers of the two clock domains of an asynchronous queue.
//!
//! Each domain owns its pointer and a synchronized copy of the peer pointer. Neither side ever reads the peer's live
//! register: it only sees the Gray code after it has passed through the synchronizer, so full and empty may lag but
//! never claim room or data that is not there.

use crate::gray::hamming;
use crate::pointer::PointerWindow;
use crate::sync::{bring_up_active, bring_up_next, Synchronizer};

/// Producer-domain registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Producer {
    /// Write pointer.
    pub wptr: u64,
    /// Read pointer as seen through the synchronizer.
    pub rptr_sync: Synchronizer,
    /// Producer edges since reset, saturating at the synchronizer depth.
    pub bring_up: usize,
    /// Overflow pulse.
    pub overflow: bool,
}

impl Producer {
    /// Reset value.
    pub fn new(window: &PointerWindow) -> Self {
        Self { wptr: window.start(), rptr_sync: Synchronizer::new(), bring_up: 0, overflow: false }
    }

    /// Synchronized read pointer.
    ///
    /// Until the synchronizer holds real samples the read pointer is taken at its reset value. The consumer can only
    /// have moved it forward since, so occupancy may over-read but never under-read.
    pub fn rptr_seen(&self, window: &PointerWindow) -> u64 {
        if bring_up_active(self.bring_up) {
            return window.start();
        }
        self.rptr_sync.binary(window.width())
    }

    /// No free slot as far as the producer knows.
    pub fn full(&self, window: &PointerWindow) -> bool { window.is_full(self.wptr, self.rptr_seen(window)) }

    /// Occupancy as far as the producer knows. Never lower than the true occupancy.
    pub fn occupancy(&self, window: &PointerWindow) -> usize { window.occupancy(self.wptr, self.rptr_seen(window)) }

    /// One producer edge. `rptr_gray` is the consumer's Gray pointer before the edge. Returns the address written.
    pub fn step(&mut self, window: &PointerWindow, enq: bool, rptr_gray: u64) -> Option<usize> {
        let full = self.full(window);
        let wptr_r = self.wptr;

        let commit = enq && !full;
        if commit {
            self.wptr = window.advance(self.wptr);
            debug_assert_eq!(hamming(window.to_gray(wptr_r), window.to_gray(self.wptr)), 1);
        }
        self.rptr_sync.step(rptr_gray);
        self.bring_up = bring_up_next(self.bring_up);
        self.overflow = enq && full;

        commit.then(|| window.address(wptr_r))
    }
}

/// Consumer-domain registers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consumer {
    /// Read pointer.
    pub rptr: u64,
    /// Write pointer as seen through the synchronizer.
    pub wptr_sync: Synchronizer,
    /// Consumer edges since reset, saturating at the synchronizer depth.
    pub bring_up: usize,
    /// Underflow pulse.
    pub underflow: bool,
}

impl Consumer {
    /// Reset value.
    pub fn new(window: &PointerWindow) -> Self {
        Self { rptr: window.start(), wptr_sync: Synchronizer::new(), bring_up: 0, underflow: false }
    }

    /// Synchronized write pointer.
    pub fn wptr_seen(&self, window: &PointerWindow) -> u64 { self.wptr_sync.binary(window.width()) }

    /// No readable slot as far as the consumer knows.
    ///
    /// Held high until the synchronizer has been filled with real samples: its reset value decodes to a pointer
    /// outside a centered window.
    pub fn empty(&self, window: &PointerWindow) -> bool {
        bring_up_active(self.bring_up) || window.is_empty(self.wptr_seen(window), self.rptr)
    }

    /// Occupancy as far as the consumer knows. Never higher than the true occupancy.
    pub fn occupancy(&self, window: &PointerWindow) -> usize {
        if bring_up_active(self.bring_up) {
            return 0;
        }
        window.occupancy(self.wptr_seen(window), self.rptr)
    }

    /// One consumer edge. `wptr_gray` is the producer's Gray pointer before the edge. Returns the address read.
    pub fn step(&mut self, window: &PointerWindow, deq: bool, wptr_gray: u64) -> Option<usize> {
        let empty = self.empty(window);
        let rptr_r = self.rptr;

        let commit = deq && !empty;
        if commit {
            self.rptr = window.advance(self.rptr);
            debug_assert_eq!(hamming(window.to_gray(rptr_r), window.to_gray(self.rptr)), 1);
        }
        self.wptr_sync.step(wptr_gray);
        self.bring_up = bring_up_next(self.bring_up);
        self.underflow = deq && empty;

        commit.then(|| window.address(rptr_r))
    }
}
