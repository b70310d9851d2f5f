pub mod contributions;
pub mod root;
