pub(crate) mod fonts;
pub(crate) mod layout;
pub(crate) mod script;
