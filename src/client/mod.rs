pub mod bridge;
pub mod controller;
pub mod memory;
pub mod plc_types;
