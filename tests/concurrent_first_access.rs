//! Integration tests for concurrent first access.
//!
//! Many threads hitting a cold singleton at the same instant must trigger
//! exactly one construction, and every thread must come away with the same
//! instance. These tests line threads up behind a barrier so they reach the
//! cold slot as close to simultaneously as possible.
//!
//! NOTE: No #[serial] needed - every test constructs its own registry or
//! cell, so there is no shared state to interfere with.

use lazy_singleton_registry::{define_registry, LazySingleton, SingletonRegistry};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;

const THREADS: usize = 50;

#[derive(Debug)]
struct ExpensiveService {
    creation_index: usize,
}

#[test]
fn test_fifty_threads_single_construction() {
    let registry = SingletonRegistry::new();
    let constructions = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let registry = &registry;
    let constructions = &constructions;
    let barrier = &barrier;

    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    registry
                        .get_or_init(|| ExpensiveService {
                            creation_index: constructions.fetch_add(1, Ordering::SeqCst),
                        })
                        .unwrap()
                })
            })
            .collect();

        let instances: Vec<Arc<ExpensiveService>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        // Exactly one construction happened
        assert_eq!(constructions.load(Ordering::SeqCst), 1);

        // Every thread got the same instance
        for instance in &instances {
            assert!(Arc::ptr_eq(&instances[0], instance));
            assert_eq!(instance.creation_index, 0);
        }
    });
}

#[test]
fn test_fifty_threads_single_initialized_event() {
    let registry = SingletonRegistry::new();
    let barrier = Barrier::new(THREADS);

    let events = Arc::new(Mutex::new(Vec::new()));
    let events_clone = events.clone();
    registry.set_trace_callback(move |event| {
        events_clone.lock().unwrap().push(format!("{}", event));
    });

    let registry = &registry;
    let barrier = &barrier;

    thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(move || {
                barrier.wait();
                let _: Arc<String> = registry.get_or_init(|| "shared".to_string()).unwrap();
            });
        }
    });

    // One event per caller: a single construction, everyone else a lookup
    let captured = events.lock().unwrap();
    assert_eq!(captured.len(), THREADS);

    let initialized = captured.iter().filter(|e| e.contains("initialized")).count();
    let lookups = captured
        .iter()
        .filter(|e| e.contains("get") && e.contains("found: true"))
        .count();

    assert_eq!(initialized, 1);
    assert_eq!(lookups, THREADS - 1);
}

#[test]
fn test_fifty_threads_on_macro_registry() {
    define_registry!(stampede);

    let constructions = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let constructions = &constructions;
    let barrier = &barrier;

    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    stampede::get_or_init(|| {
                        constructions.fetch_add(1, Ordering::SeqCst);
                        vec![0u8; 1024]
                    })
                    .unwrap()
                })
            })
            .collect();

        let instances: Vec<Arc<Vec<u8>>> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        for instance in &instances {
            assert!(Arc::ptr_eq(&instances[0], instance));
        }
    });
}

#[test]
fn test_concurrent_distinct_types_construct_once_each() {
    struct ServiceA;
    struct ServiceB;

    let registry = SingletonRegistry::new();
    let built_a = AtomicUsize::new(0);
    let built_b = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let registry = &registry;
    let built_a = &built_a;
    let built_b = &built_b;
    let barrier = &barrier;

    thread::scope(|s| {
        for i in 0..THREADS {
            s.spawn(move || {
                barrier.wait();
                if i % 2 == 0 {
                    let _: Arc<ServiceA> = registry
                        .get_or_init(|| {
                            built_a.fetch_add(1, Ordering::SeqCst);
                            ServiceA
                        })
                        .unwrap();
                } else {
                    let _: Arc<ServiceB> = registry
                        .get_or_init(|| {
                            built_b.fetch_add(1, Ordering::SeqCst);
                            ServiceB
                        })
                        .unwrap();
                }
            });
        }
    });

    assert_eq!(built_a.load(Ordering::SeqCst), 1);
    assert_eq!(built_b.load(Ordering::SeqCst), 1);
}

#[test]
fn test_fifty_threads_on_cell() {
    let cell: LazySingleton<usize> = LazySingleton::new();
    let constructions = AtomicUsize::new(0);
    let barrier = Barrier::new(THREADS);

    let cell = &cell;
    let constructions = &constructions;
    let barrier = &barrier;

    thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    barrier.wait();
                    let value = cell.get_or_init(|| {
                        constructions.fetch_add(1, Ordering::SeqCst);
                        7usize
                    });
                    value as *const usize as usize
                })
            })
            .collect();

        let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1);
        for address in &addresses {
            assert_eq!(*address, addresses[0]);
        }
    });
}
