//! Encoding of rules into their canonical `FREQ=...` text form.
//!
//! Parts are written in a fixed order: FREQ, INTERVAL (when not 1), UNTIL,
//! COUNT, WKST (when not Monday), then the BYxxx parts in RFC order.

mod serializer;

pub use serializer::{UNTIL_FORMAT, serialize_rule};
