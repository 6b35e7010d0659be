// Chat Domain - Entities

mod message;
mod transcript;

pub use message::*;
pub use transcript::*;
