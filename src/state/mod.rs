pub mod artifact;
pub mod capture;
pub mod loader;
