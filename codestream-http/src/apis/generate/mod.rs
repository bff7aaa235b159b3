mod handler;
mod types;

pub use handler::handle_generate;
pub use types::GenerateRequest;
