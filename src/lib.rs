//! visgraph application layer
//!
//! Configuration loading and a headless demo scene built on
//! [`visgraph_core`].

pub mod config;
pub mod demo;
