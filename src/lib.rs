//! Backend for a meme generator: composes images from Imgflip templates plus
//! free-text captions, records created memes and uploads in DynamoDB, and
//! ingests uploaded images as inline `data:` URLs.

pub mod aws_clients;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod errors;
pub mod handlers;
pub mod imgflip;
pub mod ingest;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod startup;
pub mod state;
