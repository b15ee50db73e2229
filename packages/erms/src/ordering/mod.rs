//! Schema-order placement of child elements.
//!
//! Each table-bearing ERMS container (`control`, `aggregation`, `record`,
//! `restriction`) has a fixed child sequence. Builders insert every new
//! child through [`insert_in_schema_order`], so the output order does not
//! depend on the order of builder calls.

mod engine;
mod tables;

pub use engine::{
    insert_in_schema_order, insert_with_policy, ContainerPolicy, OrderingEngine, Placement,
};
pub use tables::{
    create_erms_registry, SchemaOrderRegistry, AGGREGATION_ORDER, CONTROL_ORDER, RECORD_ORDER,
    RESTRICTION_ORDER,
};
