//! Clarigen - ambiguous query detection, clarification and reformulation.
//!
//! A query is checked by a cheap detector model; ambiguous queries get a
//! clarifying question from a more capable resolver model, the user's answer
//! is validated, and the query is rewritten into an unambiguous form.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
