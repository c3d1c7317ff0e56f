pub(crate) mod auth;
pub(crate) mod crop;
pub(crate) mod notice;
