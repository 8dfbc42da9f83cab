mod admin;
mod assessments;
mod auth;
mod catalog;
pub(crate) mod errors;
pub(crate) mod guards;
mod handlers;
pub(crate) mod pagination;
pub(crate) mod router;
pub(crate) mod validation;
