#![forbid(unsafe_code)]

//! Test support for Spyglass.
//!
//! - **Mock toolkit**: [`MockWidget`] and [`MockToolkit`] implement the host
//!   contract in memory, with knobs for rejecting writes and counting
//!   listeners.
//! - **Fixtures**: [`fixtures::sample_app`] builds a small window tree.
//! - **Snapshots**: [`assert_snapshot!`] compares rendered text against
//!   files under `tests/snapshots/`; run with `BLESS=1` to update them.

pub mod fixtures;
pub mod mock;
pub mod snapshot;

pub use fixtures::{SampleApp, sample_app};
pub use mock::{MockToolkit, MockWidget};
pub use snapshot::{assert_text_snapshot, diff_text};
