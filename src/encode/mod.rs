pub(crate) mod jpeg;
pub(crate) mod naming;
