#[macro_use]
mod label;

pub mod adoption;
pub mod config;
pub mod contact;
pub mod db;
pub mod environment;
pub mod errors;
pub mod filter;
pub mod normalization;
pub mod notification;
pub mod pet;
pub mod routes;
pub mod session;
pub mod urls;
pub mod validation;
pub mod workflow;
