//! GUI abstract factory example.
//!
//! Demonstrates an **abstract factory pinned as a singleton**:
//! - Two factories (Windows, MacOS) build the same widget family
//! - The application pins one of them in a registry, write-once
//! - Rendering code asks the registry for "the" factory and never learns
//!   which platform it is running on
//!
//! Run with: `cargo run --example gui_factory`

use lazy_singleton_registry::{define_registry, SingletonRegistry};
use std::sync::Arc;

// Create an isolated registry for this example
define_registry!(toolkit);

// =============================================================================
// Widget Contracts
// =============================================================================

trait Button: Send + Sync {
    fn paint(&self);
}

trait TextBox: Send + Sync {
    fn render(&self);
}

// =============================================================================
// Windows Widgets
// =============================================================================

struct WinButton;

impl Button for WinButton {
    fn paint(&self) {
        println!("Rendering a button in Windows style.");
    }
}

struct WinTextBox;

impl TextBox for WinTextBox {
    fn render(&self) {
        println!("Rendering a text box in Windows style.");
    }
}

// =============================================================================
// MacOS Widgets
// =============================================================================

struct MacButton;

impl Button for MacButton {
    fn paint(&self) {
        println!("Rendering a button in MacOS style.");
    }
}

struct MacTextBox;

impl TextBox for MacTextBox {
    fn render(&self) {
        println!("Rendering a text box in MacOS style.");
    }
}

// =============================================================================
// The Abstract Factory
// =============================================================================

/// Contract for a widget-family factory.
trait GuiFactory: Send + Sync {
    fn create_button(&self) -> Box<dyn Button>;
    fn create_text_box(&self) -> Box<dyn TextBox>;
    fn platform(&self) -> &str;
}

struct WinFactory;

impl GuiFactory for WinFactory {
    fn create_button(&self) -> Box<dyn Button> {
        Box::new(WinButton)
    }

    fn create_text_box(&self) -> Box<dyn TextBox> {
        Box::new(WinTextBox)
    }

    fn platform(&self) -> &str {
        "Windows"
    }
}

struct MacFactory;

impl GuiFactory for MacFactory {
    fn create_button(&self) -> Box<dyn Button> {
        Box::new(MacButton)
    }

    fn create_text_box(&self) -> Box<dyn TextBox> {
        Box::new(MacTextBox)
    }

    fn platform(&self) -> &str {
        "MacOS"
    }
}

type SharedFactory = Arc<dyn GuiFactory>;

// =============================================================================
// Application Code (Platform-Agnostic)
// =============================================================================

/// Renders a screen with whatever factory it is handed.
fn render_login_screen(factory: &SharedFactory) {
    factory.create_button().paint();
    factory.create_text_box().render();
}

fn main() {
    println!("=== lazy-singleton-registry: GUI Abstract Factory ===\n");

    // -------------------------------------------------------------------------
    // 1. Pin the platform's factory at startup
    // -------------------------------------------------------------------------
    println!("1. Pinning the Windows factory for this run...\n");

    toolkit::register(Arc::new(WinFactory) as SharedFactory).unwrap();

    // -------------------------------------------------------------------------
    // 2. Render without knowing the platform
    // -------------------------------------------------------------------------
    println!("2. Rendering the login screen...\n");

    let factory: SharedFactory = toolkit::get_cloned().unwrap();
    render_login_screen(&factory);

    // -------------------------------------------------------------------------
    // 3. The look and feel cannot change mid-run
    // -------------------------------------------------------------------------
    println!("\n3. Trying to switch to the MacOS factory...\n");

    match toolkit::register(Arc::new(MacFactory) as SharedFactory) {
        Ok(_) => println!("   BUG: the factory was replaced"),
        Err(err) => println!("   Rejected: {}", err),
    }

    let factory: SharedFactory = toolkit::get_cloned().unwrap();
    println!("   Still rendering with: {}\n", factory.platform());
    render_login_screen(&factory);

    // -------------------------------------------------------------------------
    // 4. A separate registry instance can make its own choice
    // -------------------------------------------------------------------------
    println!("\n4. A preview sandbox pins its own factory...\n");

    let sandbox = SingletonRegistry::new();
    sandbox
        .register(Arc::new(MacFactory) as SharedFactory)
        .unwrap();

    let preview: SharedFactory = sandbox.get_cloned().unwrap();
    println!("   Sandbox renders with: {}\n", preview.platform());
    render_login_screen(&preview);

    // -------------------------------------------------------------------------
    // Summary
    // -------------------------------------------------------------------------
    println!("\n=== Example Complete ===");
    println!("The registry holds the factory, the factory hides the platform:");
    println!("  - Rendering code depends only on the GuiFactory contract");
    println!("  - The pinned factory is immutable for the registry's lifetime");
    println!("  - Fresh registry instances make fresh choices, ideal for tests");
}
