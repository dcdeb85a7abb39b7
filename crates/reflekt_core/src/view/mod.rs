//! Derived views over an already-fetched entry list.
//!
//! # Responsibility
//! - Provide pure, read-only transforms: ordering, text filter, calendar
//!   grouping and date labels.
//!
//! # Invariants
//! - No function here performs I/O or mutates its input.
//! - Local-date math goes through an explicit `TimeZone`; the `Local`
//!   wrappers bind to the deployment clock.

pub mod calendar;
pub mod dates;
pub mod filter;
pub mod order;
