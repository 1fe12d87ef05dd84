pub mod hit;
pub mod tree;

pub use hit::hit_test;
pub use tree::{RenderContent, RenderItem, RenderTree};
