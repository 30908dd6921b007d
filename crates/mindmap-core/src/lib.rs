//! Mind Map Core Types and Definitions
//!
//! This crate provides the foundational types for editable mind maps. It
//! includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Colors**: CSS color validation for node styles ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Graph**: The arena graph with an adjacency index ([`graph`] module)
//! - **Model**: The canonical mind map model ([`model`] module)
//! - **Document**: The canonical JSON wire schema ([`document`] module)

pub mod color;
pub mod document;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod identifier;
pub mod model;
pub mod style;
