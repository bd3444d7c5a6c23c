pub mod dedup_service;
pub mod dedup_service_impl;
pub mod factory;
pub mod health_service;
pub mod health_service_impl;
pub mod merge_service;
pub mod merge_service_impl;
pub mod search_service;
pub mod search_service_impl;

pub use dedup_service::DedupService;
pub use dedup_service_impl::DedupServiceImpl;
pub use health_service::HealthService;
pub use health_service_impl::HealthServiceImpl;
pub use merge_service::{MergeFailure, MergeOutcome, MergeService};
pub use merge_service_impl::MergeServiceImpl;
pub use search_service::SearchService;
pub use search_service_impl::SearchServiceImpl;
