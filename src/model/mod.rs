//! Data model of a structure under construction.
//!
//! - [`atom`] – Atoms, atom types and virtual-site constructions.
//! - [`types`] – Bond orders and strand directions.
//! - [`stretch`] – Bond stretch terms and their force field constants.
//! - [`part`] – The molecule itself, with its queues of pending atoms and
//!   bonds and its failure state.

pub mod atom;
pub mod part;
pub mod stretch;
pub mod types;
