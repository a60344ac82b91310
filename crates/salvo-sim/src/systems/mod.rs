//! Per-tick systems that operate on the engagement world.
//!
//! Systems are free functions over `&mut World`. They own no state; ships and
//! munitions carry everything in components, and the engine threads the tick's
//! report and running stats through.

pub mod cleanup;
pub mod fire_control;
pub mod munitions;
pub mod shields;
pub mod strike;
