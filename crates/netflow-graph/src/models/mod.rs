//! Graph data models.
//!
//! This module provides the core data structures for representing networks:
//! - [`ForwardStar`]: compact forward/reverse star arc storage
//! - [`NodeId`], [`Cost`], [`Capacity`]: node and arc attribute types

pub mod node;
pub mod star;

pub use node::{Capacity, Cost, NodeId};
pub use star::{ArcRef, ForwardStar, ForwardStarBuilder, IncomingArcs, OutgoingArcs};
