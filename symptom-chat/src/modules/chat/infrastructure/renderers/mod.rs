// Renderers
// RenderPort 的实现：终端输出和内存记录

mod memory;
mod terminal;

pub use memory::*;
pub use terminal::*;
