//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the sampling cycle for the Inator agent: reading
//! assembly, classification, telemetry encoding and the resilient publish
//! loop.  All interaction with hardware and the network happens through
//! **port traits** defined in [`ports`], keeping this layer fully testable
//! without real peripherals.

pub mod events;
pub mod ports;
pub mod publisher;
pub mod service;
pub mod telemetry;
