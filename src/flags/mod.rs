//! Flag resolution and session override engine.
//!
//! Three layers feed a flag's effective value, highest precedence first:
//!
//! 1. Session overrides ([`SessionOverrideStore`])
//! 2. Configured registry defaults ([`FlagRegistry`])
//! 3. Nothing (dev flags discovered outside the registry have no default)
//!
//! [`FlagResolver`] is the read side and never mutates. [`FlagSession`] owns
//! the override store and the visibility state and is the only place writes
//! happen.

pub mod registry;
pub mod resolver;
pub mod session;
pub mod store;

pub use registry::{DevFlagSet, FlagRegistry};
pub use resolver::FlagResolver;
pub use session::{FlagSession, SessionOptions, SessionSignal, Visibility};
pub use store::SessionOverrideStore;
