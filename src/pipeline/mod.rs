//! Frame-generation pipeline: timeline -> template -> render -> trim -> encode.

pub(crate) mod driver;
pub(crate) mod workspace;
