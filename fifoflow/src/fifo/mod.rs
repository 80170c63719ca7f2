//! Queue facade.
//!
//! [`Fifo`] owns the pointer registers, the backing store and the flag registers of one queue. Every mutating method
//! is one rising edge of a clock; the flags returned by [`Fifo::status`] are always those of the settled state after
//! the last edge.

mod domain;
pub mod tracker;

use std::fmt;

use tracing::{debug, trace};

pub use self::domain::{Consumer, Producer};
use crate::backing::{BackingStore, BackingStoreKind};
use crate::config::{Bypass, FifoConfig, Mode};
use crate::flags::{FlagEvaluator, Status};
use crate::pointer::PointerWindow;
use crate::segment::SegmentMap;
use crate::{ConfigError, Word};

/// Clock domain of a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Write port.
    Producer,
    /// Read port.
    Consumer,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Producer => f.pad("producer"),
            Self::Consumer => f.pad("consumer"),
        }
    }
}

/// Outcome of one combined edge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cycle {
    /// The write was accepted.
    pub written: bool,
    /// Element popped by the read, if any.
    pub read: Option<Word>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Core {
    Synchronous(tracker::S),
    Asynchronous { producer: Producer, consumer: Consumer },
}

impl Core {
    fn new(mode: Mode, window: &PointerWindow) -> Self {
        match mode {
            Mode::Synchronous => Self::Synchronous(tracker::S::new(window)),
            Mode::Asynchronous => Self::Asynchronous { producer: Producer::new(window), consumer: Consumer::new(window) },
        }
    }
}

/// Bounded queue controller.
#[derive(Debug)]
pub struct Fifo {
    config: FifoConfig,
    window: PointerWindow,
    evaluator: FlagEvaluator,
    kind: BackingStoreKind,
    store: Box<dyn BackingStore>,
    core: Core,
    dout_r: Word,
    head: Word,
    status: Status,
}

impl Fifo {
    /// Validates `config` and builds a queue in its reset state.
    pub fn new(config: FifoConfig) -> Result<Self, ConfigError> {
        let window = config.validate()?;
        let kind = config.backing_store_kind();
        let store = kind.build(config.element_width, config.capacity)?;
        debug!(
            backing_store = %kind,
            units = store.segment_map().map_or(0, SegmentMap::units),
            "built backing store"
        );

        let mut fifo = Self {
            evaluator: FlagEvaluator::new(config.capacity, config.watermark),
            core: Core::new(config.mode, &window),
            config,
            window,
            kind,
            store,
            dout_r: 0,
            head: 0,
            status: Status::default(),
        };
        fifo.settle();
        Ok(fifo)
    }

    /// One write edge. Returns `false` and raises `overflow` if the queue is full.
    pub fn write(&mut self, data: Word) -> bool {
        match self.config.mode {
            Mode::Synchronous => self.edge(Some(data), false).written,
            Mode::Asynchronous => self.producer_edge(Some(data)),
        }
    }

    /// One read edge. Returns the head element, or zero with `false` and `underflow` raised if the queue is empty.
    pub fn read(&mut self) -> (Word, bool) {
        let data = match self.config.mode {
            Mode::Synchronous => self.edge(None, true).read,
            Mode::Asynchronous => self.consumer_edge(true),
        };
        match data {
            Some(data) => (data, true),
            None => (0, false),
        }
    }

    /// One edge with optional write and read. In asynchronous mode the producer edge comes first.
    pub fn cycle(&mut self, write: Option<Word>, read: bool) -> Cycle {
        match self.config.mode {
            Mode::Synchronous => self.edge(write, read),
            Mode::Asynchronous => {
                let written = write.map_or(false, |data| self.producer_edge(Some(data)));
                if write.is_none() {
                    self.producer_edge(None);
                }
                let read = self.consumer_edge(read);
                Cycle { written, read }
            }
        }
    }

    /// One idle edge of `domain`. Synchronous queues have a single clock, so the domain is ignored.
    pub fn tick(&mut self, domain: Domain) {
        match (self.config.mode, domain) {
            (Mode::Synchronous, _) => {
                self.edge(None, false);
            }
            (Mode::Asynchronous, Domain::Producer) => {
                self.producer_edge(None);
            }
            (Mode::Asynchronous, Domain::Consumer) => {
                self.consumer_edge(false);
            }
        }
    }

    /// Flags after the last edge.
    pub fn status(&self) -> Status { self.status }

    /// Read data output.
    ///
    /// Registered queues hold the last popped element. First-word-fall-through queues show the head element whenever
    /// the consumer sees a non-empty queue.
    pub fn dout(&self) -> Word {
        match self.config.bypass {
            Bypass::FirstWordFallThrough if !self.status.empty => self.head,
            _ => self.dout_r,
        }
    }

    /// Occupancy as seen from `domain`.
    pub fn occupancy(&self, domain: Domain) -> usize {
        match (&self.core, domain) {
            (Core::Synchronous(state), _) => state.count,
            (Core::Asynchronous { producer, .. }, Domain::Producer) => producer.occupancy(&self.window),
            (Core::Asynchronous { consumer, .. }, Domain::Consumer) => consumer.occupancy(&self.window),
        }
    }

    /// Configuration the queue was built from.
    pub fn config(&self) -> &FifoConfig { &self.config }

    /// Pointer window.
    pub fn window(&self) -> &PointerWindow { &self.window }

    /// Selected storage strategy.
    pub fn backing_store_kind(&self) -> BackingStoreKind { self.kind }

    /// Segment map of a segmented store.
    pub fn segment_map(&self) -> Option<&SegmentMap> { self.store.segment_map() }

    /// Returns all registers to their reset values. Stored data is not cleared.
    pub fn reset(&mut self) {
        trace!(mode = ?self.config.mode, "reset");
        self.core = Core::new(self.config.mode, &self.window);
        self.dout_r = 0;
        self.head = 0;
        self.settle();
    }

    fn edge(&mut self, write: Option<Word>, read: bool) -> Cycle {
        let Core::Synchronous(state) = self.core else {
            return Cycle::default();
        };

        let input = tracker::I { enq: write.is_some(), deq: read };
        let (output, state_next) = tracker::step(&self.window, input, state);

        let read = output.deq.then(|| self.store.read(self.window.address(output.rptr_r)));
        if let (true, Some(data)) = (output.enq, write) {
            self.store.write(self.window.address(output.wptr_r), data);
        }
        if let Some(data) = read {
            self.dout_r = data;
        }
        if state_next.overflow {
            trace!(occupancy = state.count, "write rejected: queue full");
        }
        if state_next.underflow {
            trace!("read rejected: queue empty");
        }

        self.core = Core::Synchronous(state_next);
        self.settle();
        Cycle { written: output.enq, read }
    }

    fn producer_edge(&mut self, write: Option<Word>) -> bool {
        let Core::Asynchronous { producer, consumer } = &mut self.core else {
            return false;
        };

        let rptr_gray = self.window.to_gray(consumer.rptr);
        let addr = producer.step(&self.window, write.is_some(), rptr_gray);
        if producer.overflow {
            trace!(domain = %Domain::Producer, "write rejected: queue full");
        }

        let written = match (addr, write) {
            (Some(addr), Some(data)) => {
                self.store.write(addr, data);
                true
            }
            _ => false,
        };
        self.settle();
        written
    }

    fn consumer_edge(&mut self, read: bool) -> Option<Word> {
        let Core::Asynchronous { producer, consumer } = &mut self.core else {
            return None;
        };

        let wptr_gray = self.window.to_gray(producer.wptr);
        let addr = consumer.step(&self.window, read, wptr_gray);
        if consumer.underflow {
            trace!(domain = %Domain::Consumer, "read rejected: queue empty");
        }

        let data = addr.map(|addr| self.store.read(addr));
        if let Some(data) = data {
            self.dout_r = data;
        }
        self.settle();
        data
    }

    /// Recomputes flags and the fall-through head from the registers.
    fn settle(&mut self) {
        let window = &self.window;
        let (producer, consumer, rptr) = match &self.core {
            Core::Synchronous(state) => (
                self.evaluator.producer(state.count, state.full(window), state.overflow),
                self.evaluator.consumer(state.count, state.empty(), state.underflow),
                state.rptr,
            ),
            Core::Asynchronous { producer, consumer } => (
                self.evaluator.producer(producer.occupancy(window), producer.full(window), producer.overflow),
                self.evaluator.consumer(consumer.occupancy(window), consumer.empty(window), consumer.underflow),
                consumer.rptr,
            ),
        };
        self.status = Status::new(producer, consumer);

        if self.config.bypass == Bypass::FirstWordFallThrough && !self.status.empty {
            self.head = self.store.read(window.address(rptr));
        }
    }
}
