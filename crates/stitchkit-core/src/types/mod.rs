//! Type system utilities, aliases and geometry values.
//!
//! ## Modules
//!
//! - [`aliases`]: `Arc<RwLock<T>>` style aliases
//! - [`geometry`]: points, rectangles, affine matrices and colours

pub mod aliases;
pub mod geometry;

pub use aliases::*;
pub use geometry::*;
