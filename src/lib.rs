//! Public library API for marshaling values into the message-bus wire format.

/// Wire types, value trees, the position-tracked sink and the encoder.
pub mod wire;
