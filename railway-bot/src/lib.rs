//! Railway seat availability bot.
//!
//! A chat bot that walks a user through picking an origin city, a
//! destination and a travel date, then looks up which trains still have
//! seats and what they cost. Searched routes can be monitored in the
//! background for newly appearing trains.

pub mod clock;
pub mod config;
pub mod dialog;
pub mod domain;
pub mod format;
pub mod message;
pub mod monitor;
pub mod railway;
pub mod web;
