//! Notification factory example.
//!
//! Demonstrates a **factory pinned in a registry**:
//! - The `NotificationFactory` is built lazily on first use
//! - It dispatches on a case-insensitive channel name
//! - Write-once semantics keep anyone from swapping the factory later
//!
//! The example installs a `tracing` subscriber at debug level, so the
//! registry's own structured logs are visible between the printed lines.
//!
//! Run with: `cargo run --example notification_factory`

use lazy_singleton_registry::define_registry;
use std::sync::Arc;

// Create an isolated registry for this example
define_registry!(services);

// =============================================================================
// Notification Contract and Implementations
// =============================================================================

/// Contract for a notification channel.
trait Notification: Send + Sync {
    fn notify_user(&self);
}

struct EmailNotification;

impl Notification for EmailNotification {
    fn notify_user(&self) {
        println!("Sending an Email notification");
    }
}

struct SmsNotification;

impl Notification for SmsNotification {
    fn notify_user(&self) {
        println!("Sending an SMS notification");
    }
}

struct WhatsAppNotification;

impl Notification for WhatsAppNotification {
    fn notify_user(&self) {
        println!("Sending a WhatsApp notification");
    }
}

// =============================================================================
// The Factory Singleton
// =============================================================================

/// Builds notification channels by name.
struct NotificationFactory;

impl NotificationFactory {
    fn create(&self, kind: &str) -> Result<Box<dyn Notification>, String> {
        match kind.to_uppercase().as_str() {
            "EMAIL" => Ok(Box::new(EmailNotification)),
            "SMS" => Ok(Box::new(SmsNotification)),
            "WHATS APP" => Ok(Box::new(WhatsAppNotification)),
            other => Err(format!("Unknown notification type {}", other)),
        }
    }
}

/// Returns the shared factory, constructing it on first call.
fn factory() -> Arc<NotificationFactory> {
    services::get_or_init(|| NotificationFactory).unwrap()
}

fn main() {
    // Surface the registry's debug/warn logs
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .init();

    println!("=== lazy-singleton-registry: Notification Factory ===\n");

    // -------------------------------------------------------------------------
    // 1. Dispatch through the lazily built factory
    // -------------------------------------------------------------------------
    println!("1. Dispatching notifications...\n");

    let notification = factory().create("SMS").unwrap();
    notification.notify_user();

    let notification = factory().create("EMAIL").unwrap();
    notification.notify_user();

    // Channel names are case-insensitive
    let notification = factory().create("whats app").unwrap();
    notification.notify_user();

    // -------------------------------------------------------------------------
    // 2. Unknown channels are rejected
    // -------------------------------------------------------------------------
    println!("\n2. Asking for an unknown channel...\n");

    match factory().create("PIGEON") {
        Ok(_) => println!("   BUG: pigeons are not a channel"),
        Err(err) => println!("   {}", err),
    }

    // -------------------------------------------------------------------------
    // 3. The factory cannot be swapped out
    // -------------------------------------------------------------------------
    println!("\n3. Trying to replace the factory...\n");

    match services::register(NotificationFactory) {
        Ok(_) => println!("   BUG: the factory was replaced"),
        Err(err) => println!("   Rejected: {}", err),
    }

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------
    println!("\n=== Example Complete ===");
    println!("The registry turns a factory into a dependable process-wide service:");
    println!("  - Built on first use, shared by every caller afterwards");
    println!("  - Dispatch stays a plain method call on the shared instance");
    println!("  - Write-once semantics rule out a mid-run replacement");
}
