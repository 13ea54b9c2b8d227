pub mod backend;
pub mod spans;
pub mod text;
