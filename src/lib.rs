pub mod db;
pub mod seed;
pub mod server;
pub mod settings;
pub mod telemetry;
pub mod trivia;
