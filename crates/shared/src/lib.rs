pub mod basemap;
pub mod cache;
pub mod claims;
pub mod config;
pub mod drawing;
pub mod error;
pub mod filter;
pub mod geo;
pub mod layers;
pub mod navigator;
pub mod region;
pub mod render;
pub mod search;
pub mod selection;
pub mod source;
pub mod viewport;
