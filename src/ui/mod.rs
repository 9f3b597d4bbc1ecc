pub(crate) mod app;
pub(crate) mod commands;
pub(crate) mod render;
pub(crate) mod theme;
pub(crate) mod util;
pub(crate) mod widgets;
