pub mod assemble;
pub mod budget;
pub mod catalog;
pub mod config_cmd;
pub mod doctor;
pub mod screen;
pub mod select;
