//! Validator outcomes and their classification.
//!
//! A validator returns a [`ValidationOutcome`]. [`classify`] turns it into a
//! [`Classified`] result that knows the patch to apply immediately and, for
//! deferred outcomes, how the field settles later.

mod classify;
mod outcome;

pub use classify::*;
pub use outcome::*;
