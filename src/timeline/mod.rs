pub(crate) mod clock;
#[allow(clippy::module_inception)]
pub(crate) mod timeline;
