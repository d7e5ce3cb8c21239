use axum::http::header::{CONTENT_ENCODING, CONTENT_LANGUAGE, CONTENT_TYPE, VARY};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use flate2::write::GzEncoder;
use flate2::Compression;
use osfws_model::vocab::{rdf, wsf};
use osfws_model::{
    BlankNode, ContentEncoding, IriParseError, Literal, Negotiated, OperationResult, Payload,
    Representation, ServiceError, Solutions, Subject, Term, Triple,
};
use oxrdfio::{RdfFormat, RdfSerializer};
use serde_json::{json, Map, Value};
use sparesults::{QueryResultsFormat, QueryResultsSerializer};
use std::io::{self, Write};
use tracing::error;

const PREFIXES: [(&str, &str); 5] = [
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("void", "http://rdfs.org/ns/void#"),
    ("sioc", "http://rdfs.org/sioc/ns#"),
    ("wsf", "http://purl.org/ontology/wsf#"),
];

/// A fully rendered HTTP response.
#[derive(Debug)]
pub struct ResponseEnvelope {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl ResponseEnvelope {
    /// A plain-text response, used when nothing better can be produced.
    pub fn plain_text(status: StatusCode, message: impl Into<String>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        Self {
            status,
            headers,
            body: message.into().into_bytes(),
        }
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        (self.status, self.headers, self.body).into_response()
    }
}

#[derive(Debug, thiserror::Error)]
enum SerializationError {
    #[error("A {payload} payload cannot be represented as {representation}")]
    Unrepresentable {
        payload: &'static str,
        representation: Representation,
    },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Prefix(#[from] IriParseError),
    #[error(transparent)]
    Header(#[from] axum::http::header::InvalidHeaderValue),
}

/// Renders the outcome of an operation in the negotiated representation.
///
/// Payloads are rendered in the first negotiated representation able to hold them. Errors use
/// the selected representation and their catalog status. This never fails: if rendering is
/// impossible, the response is a plain-text 500 error.
pub fn serialize(result: &OperationResult, negotiated: &Negotiated) -> ResponseEnvelope {
    let rendered = match result {
        Ok(payload) => render_payload(payload, negotiated)
            .map(|(representation, body)| (StatusCode::OK, representation, body)),
        Err(e) => {
            let representation = negotiated.representation();
            let status =
                StatusCode::from_u16(e.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            render_error(e, representation).map(|body| (status, representation, body))
        }
    }
    .and_then(|(status, representation, body)| {
        envelope(status, negotiated, representation, body)
    });

    match rendered {
        Ok(envelope) => envelope,
        Err(e) => {
            error!(error = %e, "Failed to serialize the response");
            ResponseEnvelope::plain_text(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: the response could not be serialized. {e}"),
            )
        }
    }
}

fn envelope(
    status: StatusCode,
    negotiated: &Negotiated,
    representation: Representation,
    body: Vec<u8>,
) -> Result<ResponseEnvelope, SerializationError> {
    let mut headers = HeaderMap::new();
    headers.insert(
        CONTENT_TYPE,
        HeaderValue::from_str(&negotiated.content_type(representation))?,
    );
    headers.insert(
        CONTENT_LANGUAGE,
        HeaderValue::from_static(negotiated.language),
    );
    headers.insert(
        VARY,
        HeaderValue::from_static("Accept, Accept-Charset, Accept-Encoding, Accept-Language"),
    );

    let body = match negotiated.encoding {
        ContentEncoding::Identity => body,
        ContentEncoding::Gzip => {
            headers.insert(CONTENT_ENCODING, HeaderValue::from_static("gzip"));
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&body)?;
            encoder.finish()?
        }
    };

    Ok(ResponseEnvelope {
        status,
        headers,
        body,
    })
}

fn render_payload(
    payload: &Payload,
    negotiated: &Negotiated,
) -> Result<(Representation, Vec<u8>), SerializationError> {
    let representation = negotiated
        .representations()
        .iter()
        .copied()
        .find(|representation| can_represent(payload, *representation))
        .ok_or_else(|| SerializationError::Unrepresentable {
            payload: payload_kind(payload),
            representation: negotiated.representation(),
        })?;

    let body = match payload {
        Payload::Graph(triples) => match representation {
            Representation::Json => graph_to_json(triples)?,
            _ => graph_to_rdf(triples, representation)?,
        },
        Payload::Solutions(solutions) => solutions_to_results(solutions, representation)?,
        Payload::Boolean(value) => QueryResultsSerializer::from_format(results_format(representation))
            .serialize_boolean_to_writer(Vec::new(), *value)?,
        Payload::Empty => match representation {
            Representation::Json | Representation::SparqlResultsJson => b"{}".to_vec(),
            _ if rdf_format(representation).is_some() => graph_to_rdf(&[], representation)?,
            _ => Vec::new(),
        },
    };
    Ok((representation, body))
}

fn can_represent(payload: &Payload, representation: Representation) -> bool {
    match payload {
        Payload::Graph(_) => {
            representation == Representation::Json || rdf_format(representation).is_some()
        }
        Payload::Solutions(_) | Payload::Boolean(_) => !matches!(
            representation,
            Representation::RdfXml
                | Representation::Turtle
                | Representation::N3
                | Representation::NTriples
        ),
        Payload::Empty => true,
    }
}

fn payload_kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::Graph(_) => "graph",
        Payload::Solutions(_) => "solutions",
        Payload::Boolean(_) => "boolean",
        Payload::Empty => "empty",
    }
}

/// N3 documents are written in Turtle, which is a subset of N3.
fn rdf_format(representation: Representation) -> Option<RdfFormat> {
    match representation {
        Representation::RdfXml => Some(RdfFormat::RdfXml),
        Representation::Turtle | Representation::N3 => Some(RdfFormat::Turtle),
        Representation::NTriples | Representation::PlainText => Some(RdfFormat::NTriples),
        _ => None,
    }
}

fn results_format(representation: Representation) -> QueryResultsFormat {
    match representation {
        Representation::SparqlResultsXml | Representation::Xml => QueryResultsFormat::Xml,
        Representation::Csv => QueryResultsFormat::Csv,
        Representation::Tsv | Representation::PlainText => QueryResultsFormat::Tsv,
        _ => QueryResultsFormat::Json,
    }
}

fn graph_to_rdf(
    triples: &[Triple],
    representation: Representation,
) -> Result<Vec<u8>, SerializationError> {
    let format = rdf_format(representation).ok_or(SerializationError::Unrepresentable {
        payload: "graph",
        representation,
    })?;
    let mut serializer = RdfSerializer::from_format(format);
    if format != RdfFormat::NTriples {
        for (prefix, namespace) in PREFIXES {
            serializer = serializer.with_prefix(prefix, namespace)?;
        }
    }
    let mut writer = serializer.for_writer(Vec::new());
    for triple in triples {
        writer.serialize_triple(triple)?;
    }
    Ok(writer.finish()?)
}

/// Writes a graph in the `resultset` JSON structure: one record per subject, listing its types
/// and the values of its other properties.
fn graph_to_json(triples: &[Triple]) -> Result<Vec<u8>, SerializationError> {
    let mut subjects: Vec<(&Subject, Vec<&Triple>)> = Vec::new();
    for triple in triples {
        match subjects.iter_mut().find(|(s, _)| *s == &triple.subject) {
            Some((_, group)) => group.push(triple),
            None => subjects.push((&triple.subject, vec![triple])),
        }
    }

    let records = subjects
        .into_iter()
        .map(|(subject, group)| {
            let types = group
                .iter()
                .filter(|t| t.predicate == rdf::TYPE)
                .map(|t| Value::String(term_value(&t.object)))
                .collect::<Vec<_>>();
            let predicates = group
                .iter()
                .filter(|t| t.predicate != rdf::TYPE)
                .map(|t| {
                    let value = match &t.object {
                        Term::Literal(literal) => Value::String(literal.value().to_owned()),
                        other => json!({ "uri": term_value(other) }),
                    };
                    let mut entry = Map::new();
                    entry.insert(t.predicate.as_str().to_owned(), value);
                    Value::Object(entry)
                })
                .collect::<Vec<_>>();
            json!({
                "uri": subject_value(subject),
                "type": types,
                "predicate": predicates,
            })
        })
        .collect::<Vec<_>>();

    let prefixes = PREFIXES
        .iter()
        .map(|(prefix, namespace)| ((*prefix).to_owned(), Value::from(*namespace)))
        .collect::<Map<String, Value>>();
    Ok(serde_json::to_vec_pretty(&json!({
        "prefixes": prefixes,
        "resultset": { "subject": records },
    }))?)
}

fn subject_value(subject: &Subject) -> String {
    match subject {
        Subject::NamedNode(node) => node.as_str().to_owned(),
        other => other.to_string(),
    }
}

fn term_value(term: &Term) -> String {
    match term {
        Term::NamedNode(node) => node.as_str().to_owned(),
        Term::Literal(literal) => literal.value().to_owned(),
        other => other.to_string(),
    }
}

fn solutions_to_results(
    solutions: &Solutions,
    representation: Representation,
) -> Result<Vec<u8>, SerializationError> {
    let mut serializer = QueryResultsSerializer::from_format(results_format(representation))
        .serialize_solutions_to_writer(Vec::new(), solutions.variables.clone())?;
    for row in &solutions.rows {
        serializer.serialize(
            solutions
                .variables
                .iter()
                .zip(row)
                .filter_map(|(variable, value)| value.as_ref().map(|value| (variable, value))),
        )?;
    }
    Ok(serializer.finish()?)
}

fn render_error(
    error: &ServiceError,
    representation: Representation,
) -> Result<Vec<u8>, SerializationError> {
    match representation {
        Representation::Json | Representation::SparqlResultsJson => {
            Ok(serde_json::to_vec_pretty(error)?)
        }
        Representation::Xml | Representation::SparqlResultsXml => Ok(error_to_xml(error)),
        Representation::Csv => error_to_csv(error, b','),
        Representation::Tsv => error_to_csv(error, b'\t'),
        Representation::PlainText => Ok(error_to_text(error)),
        Representation::RdfXml
        | Representation::Turtle
        | Representation::N3
        | Representation::NTriples => graph_to_rdf(&error_to_graph(error), representation),
    }
}

fn error_fields(error: &ServiceError) -> [(&'static str, &str); 6] {
    [
        ("id", error.id.as_str()),
        ("webservice", error.webservice.as_str()),
        ("name", error.name.as_str()),
        ("description", error.description.as_str()),
        ("debugInfo", error.debug_info.as_deref().unwrap_or_default()),
        ("level", error.level.as_str()),
    ]
}

fn error_to_graph(error: &ServiceError) -> Vec<Triple> {
    let subject = BlankNode::default();
    let mut graph = vec![Triple::new(subject.clone(), rdf::TYPE, wsf::ERROR.into_owned())];
    let properties = [
        (wsf::ID, Some(error.id.as_str())),
        (wsf::WEBSERVICE, Some(error.webservice.as_str())),
        (wsf::NAME, Some(error.name.as_str())),
        (wsf::DESCRIPTION, Some(error.description.as_str())),
        (wsf::DEBUG_INFO, error.debug_info.as_deref()),
        (wsf::LEVEL, Some(error.level.as_str())),
    ];
    for (predicate, value) in properties {
        if let Some(value) = value {
            graph.push(Triple::new(
                subject.clone(),
                predicate,
                Literal::new_simple_literal(value),
            ));
        }
    }
    graph
}

fn error_to_xml(error: &ServiceError) -> Vec<u8> {
    let elements = error_fields(error)
        .into_iter()
        .filter(|(name, value)| *name != "debugInfo" || !value.is_empty())
        .map(|(name, value)| format!("  <{name}>{}</{name}>\n", escape_xml(value)))
        .collect::<String>();
    format!("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<error>\n{elements}</error>\n").into_bytes()
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn error_to_csv(error: &ServiceError, delimiter: u8) -> Result<Vec<u8>, SerializationError> {
    let fields = error_fields(error);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(fields.iter().map(|(name, _)| *name))?;
    writer.write_record(fields.iter().map(|(_, value)| *value))?;
    writer
        .into_inner()
        .map_err(|e| SerializationError::Io(e.into_error()))
}

fn error_to_text(error: &ServiceError) -> Vec<u8> {
    let mut text = format!(
        "{} ({}): {}\n{}\n",
        error.id,
        error.level.as_str(),
        error.name,
        error.description
    );
    if let Some(debug_info) = &error.debug_info {
        text.push_str(debug_info);
        text.push('\n');
    }
    text.into_bytes()
}
