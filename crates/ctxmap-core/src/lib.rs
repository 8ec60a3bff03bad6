//! Ctxmap Core Types and Definitions
//!
//! This crate provides the foundational types shared by the context map
//! parser and layout engine:
//!
//! - **Graph**: The canonical context map model ([`graph`] module)
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Text**: Font descriptors and text measurement ([`text`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])

pub mod color;
pub mod geometry;
pub mod graph;
pub mod text;
