//! Flattening algorithms.
//!
//! Everything that turns a half-edge mesh into UV coordinates lives under
//! [`parameterize`].

pub mod parameterize;
