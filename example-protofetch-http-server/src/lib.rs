mod demo_server;
pub use demo_server::DemoHttpServer;

pub mod utils;
