//! Singleton logging service example.
//!
//! Demonstrates the **guarded lazy singleton** pattern:
//! - The service lives in a `LazySingleton` cell and is built on first use
//! - The constructor is guarded: once the instance exists, building another
//!   one by hand fails instead of silently forking the singleton
//! - Every accessor, on any thread, sees the same instance
//!
//! Run with: `cargo run --example logging_service`

use lazy_singleton_registry::{LazySingleton, RegistryError};
use std::thread;

static LOG_SERVICE: LazySingleton<LoggingService> = LazySingleton::new();

/// A process-wide logging facade.
struct LoggingService {
    prefix: &'static str,
}

impl LoggingService {
    /// The only constructor; rejected once the singleton exists.
    fn new() -> Result<Self, RegistryError> {
        LOG_SERVICE.guard_construction()?;
        println!("Logging Service Initialized");
        Ok(Self { prefix: "Log" })
    }

    /// Returns the single instance, building it on first call.
    fn instance() -> &'static LoggingService {
        LOG_SERVICE.get_or_init(|| Self::new().expect("cell is empty, guard passes"))
    }

    fn log(&self, message: &str) {
        println!("[{}] : {}", self.prefix, message);
    }
}

fn main() {
    println!("=== lazy-singleton-registry: Logging Service ===\n");

    // -------------------------------------------------------------------------
    // 1. First access builds the service
    // -------------------------------------------------------------------------
    println!("1. First access builds the service...\n");

    let logger = LoggingService::instance();
    logger.log("Application Started");

    // -------------------------------------------------------------------------
    // 2. Later accessors share the instance
    // -------------------------------------------------------------------------
    println!("\n2. A second accessor shares the instance...\n");

    let logger2 = LoggingService::instance();
    logger2.log("Logging from second accessor");

    println!("\n   logger1 == logger2: {}", std::ptr::eq(logger, logger2));

    // -------------------------------------------------------------------------
    // 3. Concurrent accessors share it too
    // -------------------------------------------------------------------------
    println!("\n3. Logging from worker threads...\n");

    thread::scope(|s| {
        for worker in 0..3 {
            s.spawn(move || {
                let logger = LoggingService::instance();
                logger.log(&format!("Worker {} reporting", worker));
            });
        }
    });

    // -------------------------------------------------------------------------
    // 4. Building a second instance by hand is rejected
    // -------------------------------------------------------------------------
    println!("\n4. Trying to construct the service directly...\n");

    match LoggingService::new() {
        Ok(_) => println!("   BUG: a second instance was built"),
        Err(err) => println!("   Rejected: {}", err),
    }

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------
    println!("\n=== Example Complete ===");
    println!("One construction, one instance, any number of callers:");
    println!("  - The constructor printed its banner exactly once");
    println!("  - Accessors on every thread hold the same reference");
    println!("  - Hand-built duplicates are rejected with AlreadyInitialized");
}
