pub mod buffer;
pub mod draw_buffer;
pub mod event;
pub mod platform;
pub mod style;
pub mod units;
