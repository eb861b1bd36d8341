pub mod apply;
pub mod init;
pub mod render;
pub mod replay;

pub use apply::{apply, ApplyArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};
pub use replay::{replay, ReplayArgs};
