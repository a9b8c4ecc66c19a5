//! Domain models for the Leather Factory Tracker

mod article;
mod bank;
mod batch;
mod lot;
mod vendor;

pub use article::*;
pub use bank::*;
pub use batch::*;
pub use lot::*;
pub use vendor::*;
