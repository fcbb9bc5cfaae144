mod client;

pub use client::CampApiClient;
