pub mod dtos;
pub mod structs;
pub mod wire;
