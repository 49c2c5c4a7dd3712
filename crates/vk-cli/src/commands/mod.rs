pub mod list;
pub mod play;
pub mod show;
