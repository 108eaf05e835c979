//! The value-wrapping layer
//!
//! Raw request or response values pair up with their resolved schemas into
//! typed nodes. Nodes are built fresh per call, carry their own attribute
//! path, and know how to validate themselves and cast into typed output.
//! Nothing here is shared or persisted; wrapping passes over independent
//! values are safely parallelizable as long as the definitions registry they
//! resolve against is not concurrently mutated.
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

mod node;
mod wrap;

pub use node::{ArrayNode, Node, NullNode, ObjectNode, ScalarNode, StringValue};
pub use wrap::wrap;
