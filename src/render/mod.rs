pub(crate) mod cpu;
pub(crate) mod export;
pub(crate) mod renderer;
pub(crate) mod surface;
