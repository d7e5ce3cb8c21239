use std::fmt;

/// A response representation a service can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    RdfXml,
    Turtle,
    N3,
    NTriples,
    SparqlResultsJson,
    SparqlResultsXml,
    Json,
    Csv,
    Tsv,
    Xml,
    PlainText,
}

impl Representation {
    /// The media type of the representation, without parameters.
    pub fn media_type(self) -> &'static str {
        match self {
            Representation::RdfXml => "application/rdf+xml",
            Representation::Turtle => "text/turtle",
            Representation::N3 => "text/rdf+n3",
            Representation::NTriples => "application/n-triples",
            Representation::SparqlResultsJson => "application/sparql-results+json",
            Representation::SparqlResultsXml => "application/sparql-results+xml",
            Representation::Json => "application/json",
            Representation::Csv => "text/csv",
            Representation::Tsv => "text/tab-separated-values",
            Representation::Xml => "text/xml",
            Representation::PlainText => "text/plain",
        }
    }

    /// Splits the media type into its type and subtype.
    pub fn type_and_subtype(self) -> (&'static str, &'static str) {
        self.media_type()
            .split_once('/')
            .unwrap_or((self.media_type(), ""))
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.media_type())
    }
}

/// Representations of services that describe RDF resources.
pub const RDF_DOCUMENTS: &[Representation] = &[
    Representation::RdfXml,
    Representation::Turtle,
    Representation::N3,
    Representation::Json,
];

/// Representations of services that return tabular query results.
pub const TABULAR_RESULTS: &[Representation] = &[
    Representation::SparqlResultsJson,
    Representation::SparqlResultsXml,
    Representation::Json,
    Representation::Csv,
    Representation::Tsv,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_type_and_subtype() {
        assert_eq!(
            Representation::N3.type_and_subtype(),
            ("text", "rdf+n3")
        );
    }
}
