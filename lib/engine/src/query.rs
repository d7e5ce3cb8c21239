//! Builds the SPARQL statements the services send to the store.
//!
//! Caller-provided values reach statements through two paths only: identifiers must parse as IRIs
//! and are written as `<iri>`, and free text is written as an escaped simple literal. Whitespace
//! in both is normalized first.

use osfws_model::{IriParseError, Literal, NamedNode, Triple};

/// Trims `value` and collapses inner runs of whitespace into single spaces.
pub fn normalize_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses a caller-provided identifier.
pub fn parse_iri(value: &str) -> Result<NamedNode, IriParseError> {
    NamedNode::new(normalize_whitespace(value))
}

/// Turns caller-provided text into a literal.
pub fn literal(value: &str) -> Literal {
    Literal::new_simple_literal(normalize_whitespace(value))
}

/// `INSERT DATA` of `triples` into `graph`.
pub fn insert_data(graph: &NamedNode, triples: &[Triple]) -> String {
    format!("INSERT DATA {{ GRAPH {graph} {{\n{}\n}} }}", data_block(triples))
}

/// `DELETE DATA` of `triples` from `graph`.
pub fn delete_data(graph: &NamedNode, triples: &[Triple]) -> String {
    format!("DELETE DATA {{ GRAPH {graph} {{\n{}\n}} }}", data_block(triples))
}

fn data_block(triples: &[Triple]) -> String {
    triples
        .iter()
        .map(|triple| format!("  {triple} ."))
        .collect::<Vec<_>>()
        .join("\n")
}
