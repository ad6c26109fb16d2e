pub mod auth;
pub mod authz;
pub mod i18n;
