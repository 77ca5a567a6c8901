pub mod headless;
pub mod terminal;
