//! WASM module for a browser-based override editor
//!
//! A web UI (banner plus override modal) links this module to get the same
//! resolution rules as the CLI. Rendering stays in JavaScript; everything that
//! decides a flag's value lives here.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │            JavaScript Layer              │
//! │  - Banner and override modal             │
//! │  - Session storage / URL query param     │
//! └────────────────┬─────────────────────────┘
//!                  │ wasm-bindgen
//! ┌────────────────▼─────────────────────────┐
//! │              FlagDeck                     │
//! │  - Effective values                      │
//! │  - Override set / reset                  │
//! │  - Visibility and persistence signals    │
//! └──────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```javascript
//! import init, { FlagDeck } from './flagdeck.js';
//!
//! await init();
//! const deck = new FlagDeck(defined, config, devFlags, sessionStorage.getItem('flags') ?? '', false);
//! deck.setOverride('disableHome', true);
//! sessionStorage.setItem('flags', deck.export());
//! ```

// Bindings compile on every target so they can be tested natively
mod bindings;

pub use bindings::*;

/// Initialize WASM panic hook for better error messages in browser console
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(js_name = initPanicHook)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Version information for the WASM module
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
