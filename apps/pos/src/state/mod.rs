//! # State Module
//!
//! Host-side state, split by concern the same way commands consume it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────┐              │
//! │  │    SessionState      │        │     ConfigState      │              │
//! │  │                      │        │                      │              │
//! │  │  Arc<Mutex<          │        │  store_name          │              │
//! │  │    Session           │        │  receipt_width       │              │
//! │  │  >>                  │        │  receipt_dir         │              │
//! │  └──────────────────────┘        └──────────────────────┘              │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • SessionState: Protected by Arc<Mutex<T>> for exclusive access       │
//! │  • ConfigState: Read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{format_currency, ConfigState, RECEIPT_WIDTH_RANGE};
pub use session::{Session, SessionState};
