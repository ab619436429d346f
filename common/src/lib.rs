//! Rendering core for a G5-style glass panel.
//!
//! This crate turns a [`FlightState`] snapshot into two instrument frames:
//!
//! - [`screens::paint_attitude`]: artificial horizon, pitch ladder, roll arc,
//!   airspeed/altitude/vertical-speed tapes and turn coordinator
//! - [`screens::paint_hsi`]: compass rose, heading bug, course deviation
//!   indicator, wind/distance boxes
//!
//! Both share the glideslope ladder in [`widgets`] and consume the
//! [`nav::NavBundle`] derived fresh on every paint pass.
//!
//! - [`scale`]: pure value-to-pixel mappings shared by every tape and needle
//! - [`nav`]: navigation source selection and annunciator decoding
//! - [`parameters`]: flight parameter store and name-keyed batch updates
//! - [`canvas`]: transform-stack drawing surface over any `DrawTarget`
//! - [`debug_log`]: injected log sink and the ring-buffer log
//!
//! # no_std Compatibility
//!
//! The crate is `no_std` so the same renderer can drive an embedded panel.
//! Trigonometry goes through `micromath`, text formatting through `heapless`.

#![cfg_attr(not(test), no_std)]
// Crate-level lints
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]

pub mod canvas;
pub mod colors;
pub mod config;
pub mod debug_log;
pub mod nav;
pub mod parameters;
pub mod scale;
pub mod screens;
pub mod styles;
pub mod widgets;

#[cfg(test)]
mod testing;

pub use debug_log::{DebugLog, LogSink, NullLog};
pub use nav::{NavBundle, derive_nav_bundle};
pub use parameters::{FlightState, Parameter, ParameterStore};
