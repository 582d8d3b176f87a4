pub mod auth;
pub mod campaigns;
pub mod deadlines;
pub mod magazines;
pub mod mediums;
