pub(crate) mod latent;
pub(crate) mod pattern;
