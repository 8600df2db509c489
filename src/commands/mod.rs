//! Commands Layer
//!
//! Handlers the host bridge calls. Each takes the shared `AppState` and
//! returns `Result<_, String>`, the shape the bridge marshals.

mod item_cmd;
mod presentation_cmd;
mod settings_cmd;


pub use item_cmd::*;
pub use presentation_cmd::*;
pub use settings_cmd::*;
