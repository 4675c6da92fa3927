//! CLI operation mode handlers.
//!
//! This module contains the implementations for the three operation modes:
//! - [`check`]: Poll the watched repositories once and exit
//! - [`watch`]: Poll the watched repositories on an interval
//! - [`checkout_pr`]: Check out a single pull request by URL
//!
//! Output formatting utilities are in [`output`].

pub mod check;
pub mod checkout_pr;
pub mod output;
pub mod watch;
