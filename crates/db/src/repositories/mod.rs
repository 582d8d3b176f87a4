//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument, or an open transaction for
//! operations that must run under row locks.

pub mod action_repo;
pub mod campaign_action_repo;
pub mod campaign_repo;
pub mod company_repo;
pub mod deadline_confirmation_repo;
pub mod magazine_edition_repo;
pub mod medium_repo;
pub mod user_repo;

pub use action_repo::ActionRepo;
pub use campaign_action_repo::CampaignActionRepo;
pub use campaign_repo::CampaignRepo;
pub use company_repo::CompanyRepo;
pub use deadline_confirmation_repo::DeadlineConfirmationRepo;
pub use magazine_edition_repo::MagazineEditionRepo;
pub use medium_repo::MediumRepo;
pub use user_repo::UserRepo;
