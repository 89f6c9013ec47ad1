//! Camera stream negotiation under degrading hardware constraints.

/// Negotiation state machine and frame capture.
pub mod negotiator;
/// Constraint profiles, frames, and the hardware port seam.
pub mod port;
