//! HTTP handlers

pub mod article;
pub mod bank;
pub mod batch;
pub mod costing;
pub mod health;
pub mod lot;
pub mod vendor;

pub use article::*;
pub use bank::*;
pub use batch::*;
pub use costing::*;
pub use health::*;
pub use lot::*;
pub use vendor::*;
