pub mod canvas;
pub mod colors;
pub mod layout;
