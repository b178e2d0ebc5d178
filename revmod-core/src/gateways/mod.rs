pub mod email;
pub mod identity;
pub mod notify;
pub mod rating;
