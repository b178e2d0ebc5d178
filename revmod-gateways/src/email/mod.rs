pub use revmod_core::gateways::email::EmailGateway;

pub mod send_to_json_file;
pub mod sendmail;
