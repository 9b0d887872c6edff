// API endpoint handlers

pub mod articles;
