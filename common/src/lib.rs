pub mod analytics;
pub mod model;
pub mod query;
pub mod requests;
pub mod review;
pub mod session;
pub mod validation;
