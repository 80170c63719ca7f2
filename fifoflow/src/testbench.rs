//! Two-clock testbench.
//!
//! [`DualClock`] interleaves the rising edges of two free-running clocks. [`Testbench`] pushes a script of words from
//! the producer side and drains the queue greedily from the consumer side.
//!
//! A synchronous queue has a single clock. Its testbench runs on the producer clock only, writing and reading on the
//! same edge, and skips the consumer clock.

use std::cmp::Ordering;

use tracing::debug;

use crate::config::Mode;
use crate::fifo::{Domain, Fifo};
use crate::utils::mask;
use crate::Word;

/// Rising edge of one of the two clocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Producer clock.
    Producer,
    /// Consumer clock.
    Consumer,
}

impl From<Edge> for Domain {
    fn from(edge: Edge) -> Self {
        match edge {
            Edge::Producer => Domain::Producer,
            Edge::Consumer => Domain::Consumer,
        }
    }
}

/// Two free-running clocks, in arbitrary time units.
///
/// Both clocks have their first edge at time zero. Coincident edges yield the producer first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DualClock {
    producer_period: u64,
    consumer_period: u64,
    producer_next: u64,
    consumer_next: u64,
}

impl DualClock {
    /// Creates a new clock pair. Zero periods are treated as one.
    pub fn new(producer_period: u64, consumer_period: u64) -> Self {
        Self {
            producer_period: producer_period.max(1),
            consumer_period: consumer_period.max(1),
            producer_next: 0,
            consumer_next: 0,
        }
    }

    /// Period of the producer clock.
    pub fn producer_period(&self) -> u64 { self.producer_period }

    /// Period of the consumer clock.
    pub fn consumer_period(&self) -> u64 { self.consumer_period }

    /// Ratio of the slower period to the faster one, rounded up.
    pub fn skew(&self) -> u64 {
        let slow = self.producer_period.max(self.consumer_period);
        let fast = self.producer_period.min(self.consumer_period);
        (slow + fast - 1) / fast
    }
}

impl Iterator for DualClock {
    type Item = (u64, Edge);

    fn next(&mut self) -> Option<Self::Item> {
        match self.producer_next.cmp(&self.consumer_next) {
            Ordering::Less | Ordering::Equal => {
                let time = self.producer_next;
                self.producer_next += self.producer_period;
                Some((time, Edge::Producer))
            }
            Ordering::Greater => {
                let time = self.consumer_next;
                self.consumer_next += self.consumer_period;
                Some((time, Edge::Consumer))
            }
        }
    }
}

/// Result of a testbench run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestbenchReport {
    /// Words offered by the producer script, truncated to the element width.
    pub pushed: Vec<Word>,
    /// Words popped by the consumer, in order.
    pub delivered: Vec<Word>,
    /// Producer edges with `overflow` raised.
    pub overflows: usize,
    /// Consumer edges with `underflow` raised.
    pub underflows: usize,
    /// Producer edges simulated.
    pub producer_edges: usize,
    /// Consumer edges simulated.
    pub consumer_edges: usize,
    /// Time of the last simulated edge.
    pub elapsed: u64,
    /// Highest occupancy seen by the producer.
    pub peak_occupancy: usize,
}

impl TestbenchReport {
    /// Every pushed word was delivered, in order.
    pub fn is_lossless(&self) -> bool { self.pushed == self.delivered }
}

/// Producer script and greedy consumer around a queue.
#[derive(Debug)]
pub struct Testbench {
    fifo: Fifo,
    clock: DualClock,
    ignore_flags: bool,
    edge_limit: Option<usize>,
}

impl Testbench {
    /// Creates a new testbench. Both sides respect `full` and `empty`.
    pub fn new(fifo: Fifo, clock: DualClock) -> Self { Self { fifo, clock, ignore_flags: false, edge_limit: None } }

    /// Writes and reads on every edge regardless of flags. Rejected words are retried.
    pub fn ignore_flags(mut self) -> Self {
        self.ignore_flags = true;
        self
    }

    /// Stops after `limit` edges even if words are still in flight.
    pub fn edge_limit(mut self, limit: usize) -> Self {
        self.edge_limit = Some(limit);
        self
    }

    /// Queue under test.
    pub fn fifo(&self) -> &Fifo { &self.fifo }

    /// Releases the queue.
    pub fn into_fifo(self) -> Fifo { self.fifo }

    /// Pushes `words` through the queue.
    pub fn run<W: IntoIterator<Item = Word>>(&mut self, words: W) -> TestbenchReport {
        self.run_with(words, |_, _, _| {})
    }

    /// Pushes `words` through the queue, calling `observe` after every simulated edge.
    ///
    /// Synchronous queues report each shared edge once, as [`Edge::Producer`].
    pub fn run_with<W, F>(&mut self, words: W, mut observe: F) -> TestbenchReport
    where
        W: IntoIterator<Item = Word>,
        F: FnMut(u64, Edge, &Fifo),
    {
        let width = self.fifo.config().element_width;
        let pushed = words.into_iter().map(|word| word & mask(width)).collect::<Vec<_>>();
        let limit = self.edge_limit.unwrap_or_else(|| self.default_edge_limit(pushed.len()));
        let mut report = TestbenchReport { pushed, ..TestbenchReport::default() };
        let mut next_word = 0;

        let shared = self.fifo.config().mode == Mode::Synchronous;

        for (time, edge) in self.clock.by_ref().take(limit) {
            if shared && edge == Edge::Consumer {
                continue;
            }
            report.elapsed = time;
            match edge {
                Edge::Producer if shared => {
                    report.producer_edges += 1;
                    report.consumer_edges += 1;
                    let status = self.fifo.status();
                    let write = report.pushed.get(next_word).copied().filter(|_| self.ignore_flags || !status.full);
                    let cycle = self.fifo.cycle(write, self.ignore_flags || !status.empty);
                    next_word += usize::from(cycle.written);
                    report.delivered.extend(cycle.read);
                    report.overflows += usize::from(self.fifo.status().overflow);
                    report.underflows += usize::from(self.fifo.status().underflow);
                    report.peak_occupancy = report.peak_occupancy.max(self.fifo.occupancy(Domain::Producer));
                }
                Edge::Producer => {
                    report.producer_edges += 1;
                    match report.pushed.get(next_word) {
                        Some(&word) if self.ignore_flags || !self.fifo.status().full => {
                            if self.fifo.write(word) {
                                next_word += 1;
                            }
                        }
                        _ => self.fifo.tick(Domain::Producer),
                    }
                    report.overflows += usize::from(self.fifo.status().overflow);
                    report.peak_occupancy = report.peak_occupancy.max(self.fifo.occupancy(Domain::Producer));
                }
                Edge::Consumer => {
                    report.consumer_edges += 1;
                    if self.ignore_flags || !self.fifo.status().empty {
                        if let (data, true) = self.fifo.read() {
                            report.delivered.push(data);
                        }
                    } else {
                        self.fifo.tick(Domain::Consumer);
                    }
                    report.underflows += usize::from(self.fifo.status().underflow);
                }
            }
            observe(time, edge, &self.fifo);

            if next_word == report.pushed.len() && report.delivered.len() == report.pushed.len() {
                break;
            }
        }

        debug!(
            pushed = report.pushed.len(),
            delivered = report.delivered.len(),
            overflows = report.overflows,
            underflows = report.underflows,
            elapsed = report.elapsed,
            "testbench run finished"
        );
        report
    }

    fn default_edge_limit(&self, words: usize) -> usize {
        let skew = usize::try_from(self.clock.skew()).unwrap_or(usize::MAX);
        (words + self.fifo.config().capacity + 8).saturating_mul(skew.saturating_add(1)).saturating_mul(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FifoConfig;

    #[test]
    fn clock_orders_edges_by_time() {
        let edges = DualClock::new(2, 3).take(7).collect::<Vec<_>>();
        assert_eq!(
            edges,
            vec![
                (0, Edge::Producer),
                (0, Edge::Consumer),
                (2, Edge::Producer),
                (3, Edge::Consumer),
                (4, Edge::Producer),
                (6, Edge::Producer),
                (6, Edge::Consumer),
            ]
        );
    }

    #[test]
    fn clock_skew() {
        assert_eq!(DualClock::new(1, 1).skew(), 1);
        assert_eq!(DualClock::new(3, 10).skew(), 4);
        assert_eq!(DualClock::new(0, 5).producer_period(), 1);
    }

    #[test]
    fn synchronous_run_is_lossless() {
        let fifo = Fifo::new(FifoConfig::new(4, 8)).unwrap();
        let report = Testbench::new(fifo, DualClock::new(1, 1)).run(0..20);
        assert!(report.is_lossless());
        assert_eq!(report.overflows, 0);
        assert_eq!(report.underflows, 0);
    }

    #[test]
    fn synchronous_run_uses_one_clock() {
        let fifo = Fifo::new(FifoConfig::new(4, 8)).unwrap();
        let mut edges = vec![];
        let report = Testbench::new(fifo, DualClock::new(2, 7)).run_with(0..20, |time, edge, _| edges.push((time, edge)));
        assert!(report.is_lossless());
        assert_eq!(report.underflows, 0);
        assert!(edges.iter().all(|&(time, edge)| edge == Edge::Producer && time % 2 == 0));
        assert_eq!(report.producer_edges, edges.len());
        assert_eq!(report.consumer_edges, report.producer_edges);
        // A word written on one edge is read on the next.
        assert_eq!(report.peak_occupancy, 1);
        assert_eq!(report.producer_edges, 21);
    }

    #[test]
    fn slow_consumer_fills_queue() {
        let fifo = Fifo::new(FifoConfig::new(8, 16).mode(Mode::Asynchronous)).unwrap();
        let report = Testbench::new(fifo, DualClock::new(1, 7)).run(0..64);
        assert!(report.is_lossless());
        assert_eq!(report.peak_occupancy, 8);
    }

    #[test]
    fn ignoring_flags_counts_violations() {
        let fifo = Fifo::new(FifoConfig::new(2, 8).mode(Mode::Asynchronous)).unwrap();
        let report = Testbench::new(fifo, DualClock::new(1, 5)).ignore_flags().run(0..10);
        assert!(report.is_lossless());
        assert!(report.overflows > 0);
        // The consumer polls during bring-up.
        assert!(report.underflows > 0);
    }

    #[test]
    fn words_are_truncated_to_width() {
        let fifo = Fifo::new(FifoConfig::new(4, 4)).unwrap();
        let report = Testbench::new(fifo, DualClock::new(1, 1)).run([0x1f, 0x2e]);
        assert_eq!(report.delivered, vec![0xf, 0xe]);
    }
}
