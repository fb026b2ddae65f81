pub mod clock;
pub mod localtime;
pub mod screen;
