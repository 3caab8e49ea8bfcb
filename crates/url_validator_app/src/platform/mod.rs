pub(crate) mod config;
pub(crate) mod console;
pub(crate) mod coordinator;
pub(crate) mod effects;
pub(crate) mod logging;
pub(crate) mod render;
