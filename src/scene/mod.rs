pub(crate) mod model;
pub(crate) mod normalize;
pub(crate) mod selector;
