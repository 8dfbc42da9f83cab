pub(crate) mod answer_key;
pub(crate) mod assessment_import;
pub(crate) mod auth_provider;
pub(crate) mod catalog;
pub(crate) mod session;
