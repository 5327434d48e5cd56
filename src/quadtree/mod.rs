mod node;
mod linear_quadtree;

pub use node::*;
pub use linear_quadtree::*;

#[cfg(test)]
mod linear_quadtree_tests;
