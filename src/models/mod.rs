pub mod report;
pub mod research_project;
pub mod restaurant_profile;
pub mod user;

#[allow(unused_imports)]
pub mod prelude {
    pub use super::report::{self, Entity as Report};
    pub use super::research_project::{self, Entity as ResearchProject};
    pub use super::restaurant_profile::{self, Entity as RestaurantProfile};
    pub use super::user::{self, Entity as User};
}
