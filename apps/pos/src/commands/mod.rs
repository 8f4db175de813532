//! # Commands Module
//!
//! Every operation the UI invokes.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs        ◄─── You are here (exports)
//! ├── cart.rs       ◄─── Ventas: cart lines and adjustment
//! ├── inventory.rs  ◄─── Ventas search, Inventario table, bulk %
//! ├── sale.rs       ◄─── Checkout hand-off, Historial search
//! └── dashboard.rs  ◄─── Panel de Control
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  UI event ("click size M")                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  add_to_cart(&session, "1", "M")                                        │
//! │         │                                                               │
//! │         │  lock session ─► activa-core rule ─► unlock                   │
//! │         ▼                                                               │
//! │  Result<CartResponse, ApiError>  ─── serialized for the UI ───►         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Commands take only the state they need (`&SessionState`, `&ConfigState`,
//! a collaborator) and run to completion before returning.

pub mod cart;
pub mod dashboard;
pub mod inventory;
pub mod sale;
