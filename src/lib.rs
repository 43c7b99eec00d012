//! evotrader — trading strategy evolution engine.
//!
//! Simulates strategy performance against daily price bars and proposes
//! parameter variants for iterative search. Hexagonal architecture:
//! engine logic in [`domain`], port traits in [`ports`], concrete
//! implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
