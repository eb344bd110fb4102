// Accessories drawn on top of the eyes
pub mod tear;

pub use tear::teardrops;
