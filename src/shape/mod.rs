pub(crate) mod kinds;
pub(crate) mod model;
pub(crate) mod props;
pub(crate) mod registry;
