//! Geometric algebra companion types for the tics physics engine.
//!
//! Builds on `glam` rather than replacing it: vectors are `glam::Vec3`
//! and rotors are `glam::Quat`. This crate adds the pieces glam does not
//! have:
//!
//! - `rotor_scale` - cheap lerp-and-normalize rotor scaling
//! - `Motor3` - rigid motion (rotation + translation) as one value
//! - `Line3` - 3D projective line with wedge/antiwedge products

pub mod line;
pub mod motor;
pub mod rotor;

pub use line::Line3;
pub use motor::Motor3;
pub use rotor::rotor_scale;
