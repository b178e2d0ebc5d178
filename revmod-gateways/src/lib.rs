#[macro_use]
extern crate log;

pub mod email;
pub mod notify;
pub mod user_communication;
