pub(crate) mod composer;
pub(crate) mod config;
pub(crate) mod decor;
pub(crate) mod grid;
pub(crate) mod latent_graph;
pub(crate) mod layout;
pub(crate) mod params;
pub(crate) mod transition;
