#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Turn and phase sequencing for Origin Defence.
//!
//! [`TurnController`] is the synchronous state machine that decides which
//! inputs are legal and how an attack unfolds. [`Session`] drives it from a
//! single tokio task, multiplexing player input with the alert timer and the
//! pursuit ticks.

mod controller;
mod session;

pub use controller::TurnController;
pub use session::{Observer, Session};
