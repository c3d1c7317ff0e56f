pub(crate) mod crop;
pub(crate) mod letterbox;
pub(crate) mod planner;
