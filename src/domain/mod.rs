pub mod contribution;
pub mod member;

pub use contribution::*;
pub use member::*;
