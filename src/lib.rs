//! ClubSphere - club and event membership backend.
//!
//! Members browse clubs and events, pay through Stripe hosted checkout and
//! join clubs. Payments are reconciled into entitlement records exactly once
//! per processor transaction; every mutating operation sits behind a
//! role-based authorization gate.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
