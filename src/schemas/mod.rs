pub mod research_project;
pub mod restaurant_profile;

pub use research_project::*;
pub use restaurant_profile::*;
