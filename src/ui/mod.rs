pub mod console;
pub mod form;
pub mod results;
