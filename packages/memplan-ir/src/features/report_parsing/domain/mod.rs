//! Report parsing domain: state machine types

pub mod mode;

pub use mode::{ParseContext, ParseMode, Transition, UsesMode};
