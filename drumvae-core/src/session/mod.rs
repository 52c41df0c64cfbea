pub(crate) mod fixture;
pub(crate) mod headless;
pub(crate) mod script;
