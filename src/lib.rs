//! # pokedex
//!
//! Paginated list/detail browser over the public creature API, plus a
//! three-step form wizard whose steps persist through an injected store.
//!
//! The two feature areas share nothing but configuration: `catalog` and
//! `query` cover remote reads, `wizard` covers the form.

pub mod catalog;
pub mod config;
pub mod query;
pub mod wizard;
