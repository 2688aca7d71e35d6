pub(crate) mod plan;
pub(crate) mod recap;
pub(crate) mod theme;
