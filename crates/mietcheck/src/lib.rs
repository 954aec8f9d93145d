//! Rent-increase compliance checks for German residential tenancies, with
//! the subscription billing endpoints of the hosted calculator.

pub mod billing;
pub mod config;
pub mod error;
pub mod rent_increase;
pub mod telemetry;
