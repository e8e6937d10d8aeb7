//! `{{name}}` placeholder substitution.

pub(crate) mod engine;
