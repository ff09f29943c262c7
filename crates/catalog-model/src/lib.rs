//! CareLab Catalog Model
//!
//! Defines the data the rest of the workspace renders:
//! - **Catalog:** the discounted packages, contact record, and campaign copy
//! - **Carousel:** the wrap-around cursor over packages plus the CTA slide
//! - **Layout:** off-screen nodes, one per package plus one CTA, per target
//!
//! Everything here is immutable once loaded except the carousel cursor.

pub mod carousel;
pub mod catalog;
pub mod layout;

pub use carousel::*;
pub use catalog::*;
pub use layout::*;
