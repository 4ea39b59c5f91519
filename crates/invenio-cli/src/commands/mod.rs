pub(crate) mod assets;
pub(crate) mod config;
pub(crate) mod instance;
