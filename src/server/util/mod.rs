//! Small helpers shared by services: time conversions and run cancellation.

pub mod stop;
pub mod time;
