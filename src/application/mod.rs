pub mod dto;
pub mod identity;
pub mod ports;
pub mod use_cases;
