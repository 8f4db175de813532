//! # Activa POS Entry Point
//!
//! Walkthrough binary: seeds the demo catalog, rings up a sale with a 10%
//! discount, writes the ticket and logs the dashboard.
//!
//! ## Startup Sequence
//! 1. Initialize tracing (logging)
//! 2. Read `ACTIVA_*` configuration
//! 3. Build the session over the demo catalog
//! 4. Run the checkout and save the ticket
//!
//! The actual setup is in lib.rs so it can be tested.

use std::process::ExitCode;

fn main() -> ExitCode {
    match activa_pos::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "walkthrough failed");
            ExitCode::FAILURE
        }
    }
}
