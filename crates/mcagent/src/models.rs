//! These models represent the objects passed between the agent and the Messages API
//!
//! Every type here serializes to the JSON the API expects and parses from the JSON it
//! returns. Parsing happens once, at the boundary, into closed enums.
pub mod content;
pub mod conversation;
pub mod message;
pub mod response;
pub mod role;
pub mod tool;
