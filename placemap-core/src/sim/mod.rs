pub(crate) mod canvas;
pub(crate) mod config;
pub(crate) mod driver;
pub(crate) mod heat;
pub(crate) mod timeline;
