// Infrastructure layer - Definition files and host document decoding
pub mod config;
pub mod definition;
