//! Configuration sources layered by [`super::ConfigLoader`].

pub mod environment;
pub mod file;
