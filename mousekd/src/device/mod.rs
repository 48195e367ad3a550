// SPDX-License-Identifier: MIT
//
// Author: Johannes Leupolz <dev@leupolz.eu>
//! # Lifecycle of the virtual pointer
//!
//! ```text
//!  Uninitialized --start--> Registered --open--> Open --release--> Closed
//!                               |                  |
//!                               +------stop--------+-----> Destroyed
//! ```
//!
//! - `start` registers the sink. A failure aborts the start-up.
//! - Only one client may hold the device open.
//! - `release` unregisters the sink. The device is not created again.
//! - `stop` unregisters whatever is still registered and may be repeated.
//! - `write` is only accepted while `Open`.

pub mod service;
pub mod state;

pub use service::{DeviceError, MousekService};
pub use state::LifecycleState;

#[cfg(test)]
mod tests;
