//! Trait seams between the Studiolo orchestration layers and their backends.
//!
//! [`StudioloDriver`] is the contract a model backend implements; everything
//! above it (the admission layer, the analysis pipeline, the tutor) is
//! generic over it, which is also what makes those layers testable against
//! scripted fakes. [`DocumentSource`] plays the same role for study material.

mod documents;
mod driver;

pub use documents::{DocumentSource, InMemoryDocuments};
pub use driver::{ChunkStream, StudioloDriver};
