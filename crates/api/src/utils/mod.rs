//! Utilities for the worker process

pub mod logging;
