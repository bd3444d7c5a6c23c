pub mod error;
pub mod services;

pub use services::{
    DedupService, DedupServiceImpl, HealthService, HealthServiceImpl, MergeService,
    MergeServiceImpl, SearchService, SearchServiceImpl,
};
