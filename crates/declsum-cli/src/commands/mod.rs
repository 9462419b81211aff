pub mod extract;
pub mod options;
