//! Editor-surface widgets built on the item contract.
//!
//! These are consumers of the canvas core, not part of the layout algorithm:
//! each one is a custom [`crate::Item`] that draws a specific editor
//! decoration and hit-tests against it. The UI scale factor reaches them as
//! an explicit render/hit-test parameter.

mod boundary;
mod section;

pub use boundary::{BoundaryEdge, BoundaryMarker};
pub use section::SectionBox;
