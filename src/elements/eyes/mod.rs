// Eye geometry shared by every expression
pub mod base;

// One module per expression
pub mod happy;
pub mod neutral;
pub mod sad;

// Re-export the shared geometry
pub use base::eye_centers;
