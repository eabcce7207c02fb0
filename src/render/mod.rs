pub(crate) mod pipeline;
pub(crate) mod quality;
pub(crate) mod raster;
