//! Business logic services for the Leather Factory Tracker

pub mod article;
pub mod bank;
pub mod batch;
pub mod chemical;
pub mod costing;
pub mod lot;
pub mod process;
pub mod vendor;

pub use article::ArticleService;
pub use bank::BankService;
pub use batch::BatchService;
pub use chemical::ChemicalService;
pub use costing::CostingService;
pub use lot::LotService;
pub use process::ProcessService;
pub use vendor::VendorService;
