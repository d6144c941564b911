//! 마켓 모니터 도메인 모델.

mod mover;
mod news;
mod price;

pub use mover::*;
pub use news::*;
pub use price::*;
