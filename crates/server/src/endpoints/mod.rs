//! # エンドポイント

pub mod fallback;
pub mod index;
pub mod sign;

pub use fallback::{handle_favicon, handle_unrouted};
pub use index::handle_index;
pub use sign::handle_sign;
