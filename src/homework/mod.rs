pub mod response;
pub mod status;
pub mod verdicts;

pub use response::check_response;
pub use status::parse_status;
