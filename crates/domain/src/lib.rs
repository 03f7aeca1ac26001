//! # parlor-domain
//!
//! Pure domain model for the parlor conversation engine.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define **Entities** (state holders with identity: lights, sensors, switches, …)
//! - Define **Devices** (physical or virtual things that expose one or more entities)
//! - Define **Areas** (logical groupings such as rooms, with aliases)
//! - Define **Registry snapshots** (read-only views over entities/areas/devices
//!   with per-assistant exposure settings)
//! - Define **Utterances** (one text input plus its invocation context)
//! - Define the **Response** model returned by a conversation turn
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `agent`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `agent` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod area;
pub mod device;
pub mod entity;
pub mod registry;
pub mod response;
pub mod state;
pub mod utterance;
