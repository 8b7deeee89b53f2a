//! Rotation: the per-type scheme registry and the duty-squad resolver.
//!
//! The resolver is pure with respect to roster state: it reads the store
//! and the registry, never mutates them, so `duty_squad` is a function of
//! (roster state, date) only.

pub mod registry;
pub mod resolver;

pub use registry::SchemeRegistry;
pub use resolver::RotationResolver;
