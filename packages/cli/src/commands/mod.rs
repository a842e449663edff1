pub mod blocks;
pub mod init;
pub mod render;
pub mod validate;

pub use blocks::{blocks, BlocksArgs};
pub use init::{init, InitArgs};
pub use render::{render, RenderArgs};
pub use validate::{validate, ValidateArgs};
