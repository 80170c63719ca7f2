use fifoflow::{BackingStoreKind, Bypass, Domain, Fifo, FifoConfig, Mode};

#[test]
fn synchronous_fill_and_drain() {
    let mut fifo = Fifo::new(FifoConfig::new(8, 8)).unwrap();

    for data in 1..=8 {
        assert!(!fifo.status().full);
        assert!(fifo.write(data));
    }
    let status = fifo.status();
    assert!(status.full && status.almost_full);
    assert!(!status.empty);
    assert_eq!(fifo.occupancy(Domain::Producer), 8);

    for data in 1..=8 {
        assert!(!fifo.status().empty);
        assert_eq!(fifo.read(), (data, true));
    }
    let status = fifo.status();
    assert!(status.empty && status.almost_empty);
    assert!(!status.full && !status.overflow && !status.underflow);
}

#[test]
fn asynchronous_empty_clears_after_synchronizer() {
    let mut fifo = Fifo::new(FifoConfig::new(1024, 8).mode(Mode::Asynchronous)).unwrap();
    assert!(fifo.write(0x5a));
    assert!(fifo.status().empty);

    let mut seen = vec![];
    for _ in 0..6 {
        fifo.tick(Domain::Consumer);
        seen.push(fifo.status().empty);
    }
    // At most two edges of latency, then no flicker.
    let cleared = seen.iter().position(|empty| !empty).unwrap();
    assert!(cleared < 2);
    assert!(seen[cleared..].iter().all(|empty| !empty));

    assert_eq!(fifo.read(), (0x5a, true));
    fifo.tick(Domain::Consumer);
    assert!(fifo.status().empty);
}

#[test]
fn programmable_full_threshold() {
    let mut fifo = Fifo::new(FifoConfig::new(16, 8).full_threshold(12)).unwrap();
    for data in 0..11 {
        fifo.write(data);
    }
    assert!(!fifo.status().prog_full);
    fifo.write(11);
    assert!(fifo.status().prog_full);
    assert!(!fifo.status().almost_full);

    fifo.read();
    assert_eq!(fifo.occupancy(Domain::Consumer), 11);
    assert!(!fifo.status().prog_full);
}

#[test]
fn programmable_empty_threshold() {
    let mut fifo = Fifo::new(FifoConfig::new(16, 8).empty_threshold(3)).unwrap();
    assert!(fifo.status().prog_empty);
    for data in 0..3 {
        fifo.write(data);
        assert!(fifo.status().prog_empty);
    }
    fifo.write(3);
    assert!(!fifo.status().prog_empty);
    fifo.read();
    assert!(fifo.status().prog_empty);
}

#[test]
fn one_slot_margins() {
    let mut fifo = Fifo::new(FifoConfig::new(4, 8)).unwrap();
    fifo.write(0);
    assert!(fifo.status().almost_empty);
    fifo.write(1);
    assert!(!fifo.status().almost_empty && !fifo.status().almost_full);
    fifo.write(2);
    assert!(fifo.status().almost_full && !fifo.status().full);
}

#[test]
fn asynchronous_non_power_of_two_capacity() {
    let mut fifo = Fifo::new(FifoConfig::new(1000, 16).mode(Mode::Asynchronous)).unwrap();
    assert_eq!((fifo.window().start(), fifo.window().end()), (12, 1011));

    for data in 0..1000 {
        assert!(fifo.write(data), "write {data}");
    }
    assert!(fifo.status().full);
    assert!(!fifo.write(1000));
    assert!(fifo.status().overflow);

    fifo.tick(Domain::Consumer);
    fifo.tick(Domain::Consumer);
    assert_eq!(fifo.occupancy(Domain::Consumer), 1000);

    // Two laps around the window.
    for lap in 0..2 {
        for data in 0..1000 {
            assert_eq!(fifo.read(), (data, true), "lap {lap}");
            fifo.tick(Domain::Producer);
            if lap == 0 {
                fifo.tick(Domain::Producer);
                assert!(fifo.write(data));
            }
        }
    }
    assert!(fifo.status().empty);
}

#[test]
fn asynchronous_flags_at_reset() {
    let config = FifoConfig::new(1000, 8).mode(Mode::Asynchronous).full_threshold(5).empty_threshold(0);
    let mut fifo = Fifo::new(config).unwrap();
    assert_ne!(fifo.window().start(), 0);

    let check_idle = |fifo: &Fifo| {
        let status = fifo.status();
        assert!(status.empty && status.almost_empty && status.prog_empty);
        assert!(!status.full && !status.almost_full && !status.prog_full);
        assert_eq!(fifo.occupancy(Domain::Consumer), 0);
    };

    check_idle(&fifo);
    assert_eq!(fifo.occupancy(Domain::Producer), 0);

    assert!(fifo.write(1));
    assert_eq!(fifo.occupancy(Domain::Producer), 1);
    assert!(!fifo.status().prog_full);
    fifo.tick(Domain::Producer);
    assert_eq!(fifo.occupancy(Domain::Producer), 1);
    assert!(!fifo.status().prog_full);

    fifo.reset();
    check_idle(&fifo);
    assert_eq!(fifo.occupancy(Domain::Producer), 0);
    fifo.tick(Domain::Producer);
    fifo.tick(Domain::Producer);
    check_idle(&fifo);
    assert_eq!(fifo.occupancy(Domain::Producer), 0);
}

#[test]
fn asynchronous_flags_across_window_wrap() {
    let config = FifoConfig::new(1000, 16).mode(Mode::Asynchronous).full_threshold(998).empty_threshold(2);
    let mut fifo = Fifo::new(config).unwrap();

    // Park both pointers ten slots before the end of the window.
    for data in 0..990 {
        assert!(fifo.write(data));
    }
    fifo.tick(Domain::Consumer);
    fifo.tick(Domain::Consumer);
    for data in 0..990 {
        assert_eq!(fifo.read(), (data, true));
    }
    fifo.tick(Domain::Producer);
    fifo.tick(Domain::Producer);
    assert_eq!(fifo.occupancy(Domain::Producer), 0);
    assert!(fifo.status().prog_empty && !fifo.status().prog_full);

    for n in 1..=1000 {
        assert!(fifo.write(n as u128));
        let status = fifo.status();
        assert_eq!(fifo.occupancy(Domain::Producer), n, "write {n}");
        assert_eq!(status.prog_full, n >= 998, "write {n}");
        assert_eq!(status.almost_full, n >= 999, "write {n}");
        assert_eq!(status.full, n == 1000, "write {n}");
    }
    assert!(!fifo.write(0));

    fifo.tick(Domain::Consumer);
    fifo.tick(Domain::Consumer);
    assert_eq!(fifo.occupancy(Domain::Consumer), 1000);
    assert!(!fifo.status().prog_empty);

    for n in 1..=1000 {
        assert_eq!(fifo.read(), (n as u128, true));
        let left = 1000 - n;
        let status = fifo.status();
        assert_eq!(fifo.occupancy(Domain::Consumer), left, "read {n}");
        assert_eq!(status.prog_empty, left <= 2, "read {n}");
        assert_eq!(status.almost_empty, left <= 1, "read {n}");
        assert_eq!(status.empty, left == 0, "read {n}");
    }
}

#[test]
fn asynchronous_full_lags_consumer() {
    let mut fifo = Fifo::new(FifoConfig::new(4, 8).mode(Mode::Asynchronous)).unwrap();
    for data in 0..4 {
        assert!(fifo.write(data));
    }
    fifo.tick(Domain::Consumer);
    fifo.tick(Domain::Consumer);
    assert_eq!(fifo.read(), (0, true));

    // The producer needs two edges to see the freed slot.
    assert!(fifo.status().full);
    fifo.tick(Domain::Producer);
    assert!(fifo.status().full);
    fifo.tick(Domain::Producer);
    assert!(!fifo.status().full);
    assert!(fifo.write(4));
}

#[test]
fn segmented_store_round_trip() {
    let mut fifo = Fifo::new(FifoConfig::new(4096, 36)).unwrap();
    assert_eq!(fifo.backing_store_kind(), BackingStoreKind::SegmentedFixedUnits);
    let map = fifo.segment_map().unwrap();
    assert_eq!((map.shape().width, map.shape().depth, map.units()), (9, 4096, 4));

    let word = |n: u128| (n << 20) ^ 0xa_5a5a ^ n;
    for n in 0..4096 {
        assert!(fifo.write(word(n)));
    }
    for n in 0..4096 {
        assert_eq!(fifo.read(), (word(n) & 0xf_ffff_ffff, true));
    }
}

#[test]
fn forced_backing_store() {
    let config = FifoConfig::new(64, 100).backing_store(BackingStoreKind::SingleGenericQueue);
    let mut fifo = Fifo::new(config).unwrap();
    assert_eq!(fifo.backing_store_kind(), BackingStoreKind::SingleGenericQueue);
    assert!(fifo.write(u128::MAX));
    assert_eq!(fifo.read(), (u128::MAX >> 28, true));
}

#[test]
fn fall_through_asynchronous() {
    let config = FifoConfig::new(16, 8).mode(Mode::Asynchronous).bypass(Bypass::FirstWordFallThrough);
    let mut fifo = Fifo::new(config).unwrap();
    fifo.write(0x11);
    fifo.write(0x22);
    assert_eq!(fifo.dout(), 0);

    fifo.tick(Domain::Consumer);
    fifo.tick(Domain::Consumer);
    assert!(!fifo.status().empty);
    assert_eq!(fifo.dout(), 0x11);

    assert_eq!(fifo.read(), (0x11, true));
    assert_eq!(fifo.dout(), 0x22);
    assert_eq!(fifo.read(), (0x22, true));
    assert!(fifo.status().empty);
    assert_eq!(fifo.dout(), 0x22);
}

#[test]
fn reset_returns_to_bring_up() {
    let mut fifo = Fifo::new(FifoConfig::new(16, 8).mode(Mode::Asynchronous)).unwrap();
    fifo.write(1);
    fifo.tick(Domain::Consumer);
    fifo.tick(Domain::Consumer);
    assert!(!fifo.status().empty);

    fifo.reset();
    assert!(fifo.status().empty);
    assert_eq!(fifo.occupancy(Domain::Producer), 0);
    assert_eq!(fifo.occupancy(Domain::Consumer), 0);
    assert_eq!(fifo.read(), (0, false));
    assert!(fifo.status().underflow);
}
