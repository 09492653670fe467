//! # herald-std
//!
//! Listener resolution and dispatch for the Herald event manager.
//!
//! This crate provides:
//! - **Ordering**: [`priority::PriorityRegistry`], the per-event priority queue
//! - **Local storage**: [`local::LocalRegistry`], with lazy wildcard
//!   materialization
//! - **Shared listeners**: [`shared::SharedEventManager`], keyed by
//!   `(identifier, event)`
//! - **Reconciliation**: [`sync::SharedListenerSync`], keeping a manager's view
//!   of shared listeners current
//! - **Dispatch**: [`manager::EventManager`]
//! - **Stock listeners** and **testing** helpers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use herald_core;

pub mod listeners;
pub mod local;
pub mod manager;
pub mod priority;
pub mod shared;
pub mod sync;
pub mod testing;
