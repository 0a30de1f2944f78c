pub(crate) mod callbacks;
#[allow(clippy::module_inception)]
pub(crate) mod engine;
