//! Background Tasks Module
//!
//! Contains background tasks that run alongside a cache handle.
//!
//! # Tasks
//! - Expiration Sweeper: evicts expired entries at a fixed interval

mod sweeper;

pub(crate) use sweeper::spawn_sweeper_task;
