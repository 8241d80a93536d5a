//! Command handlers, one module per concern

pub mod navigation;
pub mod whitelist;
