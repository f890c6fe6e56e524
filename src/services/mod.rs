pub mod analysis;
pub mod dispatcher;
pub mod store;

pub use dispatcher::AnalysisDispatcher;
pub use store::{DatabaseStore, MemoryStore, ResearchStore, StoreError, SubscriptionTiers};
