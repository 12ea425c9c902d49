pub mod api;
pub mod rejection;
pub mod server;

pub use api::routes;
pub use server::WebServer;
