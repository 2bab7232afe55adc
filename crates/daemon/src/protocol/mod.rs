// SPDX-License-Identifier: MIT

//! Control protocol for client communication.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

mod request;
mod response;
mod wire;

pub use request::Request;
pub use response::Response;
pub use wire::{
    decode, encode, read_request, write_response, ProtocolError, MAX_MESSAGE_SIZE,
};

// Used by client tooling and the workspace integration tests.
#[allow(unused_imports)]
pub use wire::{read_response, write_request};
