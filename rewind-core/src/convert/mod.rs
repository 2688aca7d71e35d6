pub(crate) mod webp;
