//! Renderer discovery, command-line assembly and process supervision.

pub(crate) mod command;
pub(crate) mod driver;
