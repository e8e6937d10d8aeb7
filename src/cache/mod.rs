//! Render-or-reuse decisions across consecutive frames.

pub(crate) mod frame_cache;
