//! # Sonar Core
//!
//! The discovery pipeline: interface bootstrap, the ARP transceiver
//! ([`scanner::local`]), liveness probes ([`prober`]), output sinks
//! ([`sink`]) and the loop that ties them together ([`scanner`]).

pub mod bootstrap;
pub mod network;
pub mod prober;
pub mod scanner;
pub mod sink;
