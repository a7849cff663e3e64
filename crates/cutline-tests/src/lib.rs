//! Integration test crate for Cutline.
//!
//! This crate exists solely to hold cross-crate integration tests.
//! It depends on the cutline crates to verify they work together.

#[cfg(test)]
mod editor;

#[cfg(test)]
mod timeline;
