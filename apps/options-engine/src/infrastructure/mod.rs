//! Infrastructure Layer
//!
//! Driven adapters implementing the ports defined in the application layer.
//!
//! - `marketdata/`: in-memory and Polygon REST providers

pub mod marketdata;
