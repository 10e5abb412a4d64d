//! Concurrent adapter calls, with and without a host lock.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use common::*;
use hough_features::{BufferAdapter, CoordinationLock, ExclusiveLock};
use ndarray::Array3;

#[test]
fn test_concurrent_calls_match_sequential() {
    let images: Vec<Array3<u8>> = (0..8).map(|seed| random_rgb(seed, 24, 18)).collect();
    let adapter = BufferAdapter::default();
    let sequential: Vec<Array3<u8>> = images
        .iter()
        .map(|image| adapter.run_image(image.view(), true).unwrap())
        .collect();

    let concurrent: Vec<Array3<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = images
            .iter()
            .map(|image| {
                let adapter = adapter.clone();
                scope.spawn(move || adapter.run_image(image.view(), true).unwrap())
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (a, e) in concurrent.iter().zip(&sequential) {
        assert_same_features(a, e);
    }
}

/// An [`ExclusiveLock`] that counts threads inside released regions.
///
/// Each release waits (bounded) until `expected` threads have released, so
/// the peak only reaches `expected` when regions really run side by side.
struct OverlapLock {
    baton: ExclusiveLock,
    expected: usize,
    arrivals: Mutex<usize>,
    arrived: Condvar,
    inside: AtomicUsize,
    peak: AtomicUsize,
}

impl OverlapLock {
    fn new(expected: usize) -> Self {
        Self {
            baton: ExclusiveLock::new(),
            expected,
            arrivals: Mutex::new(0),
            arrived: Condvar::new(),
            inside: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl CoordinationLock for OverlapLock {
    fn release(&self) {
        self.baton.release();
        let now = self.inside.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        let mut arrivals = self.arrivals.lock().unwrap();
        *arrivals += 1;
        self.arrived.notify_all();
        let _ = self
            .arrived
            .wait_timeout_while(arrivals, Duration::from_secs(5), |n| *n < self.expected)
            .unwrap();
    }

    fn reacquire(&self) {
        self.inside.fetch_sub(1, Ordering::SeqCst);
        self.baton.reacquire();
    }
}

#[test]
fn test_exclusive_lock_holders_overlap_during_extraction() {
    const THREADS: usize = 4;
    let lock = Arc::new(OverlapLock::new(THREADS));
    let adapter = BufferAdapter::new(lock.clone());
    let images: Vec<Array3<u8>> = (0..THREADS as u64)
        .map(|seed| random_rgb(seed, 32, 32))
        .collect();

    // Each thread holds the baton like a host thread would
    let results: Vec<Array3<u8>> = std::thread::scope(|scope| {
        let handles: Vec<_> = images
            .iter()
            .map(|image| {
                let adapter = adapter.clone();
                let lock = Arc::clone(&lock);
                scope.spawn(move || {
                    let _holder = lock.baton.hold();
                    let out = adapter.run_image(image.view(), false).unwrap();
                    assert!(lock.baton.is_held());
                    out
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(lock.peak(), THREADS);
    assert!(!lock.baton.is_held());
    for (image, features) in images.iter().zip(&results) {
        let expected = BufferAdapter::default().run_image(image.view(), false).unwrap();
        assert_same_features(features, &expected);
    }
}

#[test]
fn test_holder_is_not_blocked_while_extraction_runs() {
    let lock = Arc::new(ExclusiveLock::new());
    let adapter = BufferAdapter::new(lock.clone());
    let image = random_rgb(9, 64, 64);

    let _holder = lock.hold();
    let features = adapter.run_image(image.view(), true).unwrap();
    // The calling thread owns the baton again after the call
    assert!(lock.is_held());
    assert_feature_shape(&features, 32, 64, 64);
}
