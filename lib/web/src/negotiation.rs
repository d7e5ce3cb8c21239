use mediatype::names::{Q, _STAR};
use mediatype::{MediaType, MediaTypeList, ReadParams};
use osfws_model::{
    AcceptHeaders, ContentEncoding, Negotiated, NegotiatedHeader, NegotiationError,
    Representation,
};
use tracing::debug;

const CHARSETS: [&str; 1] = ["utf-8"];
const ENCODINGS: [ContentEncoding; 2] = [ContentEncoding::Identity, ContentEncoding::Gzip];
const LANGUAGES: [&str; 1] = ["en"];

/// A quality value in thousandths, i.e., `q=0.5` is stored as `500`.
type Quality = u16;

const MAX_QUALITY: Quality = 1000;

/// One entry of an `Accept*` header.
#[derive(Debug, PartialEq, Eq)]
struct Range<V> {
    value: V,
    quality: Quality,
}

/// Selects the representation, charset, encoding and language of a response.
///
/// Each header is handled independently. An absent header accepts every supported value. For
/// every supported value, the most specific range of the header that matches it determines its
/// weight. The value with the highest weight wins and ties go to the value that is declared
/// first. A weight of zero means "not acceptable".
pub fn negotiate(
    headers: &AcceptHeaders,
    supported: &[Representation],
) -> Result<Negotiated, NegotiationError> {
    let representations = rank(
        present(headers.accept.as_deref())
            .map(parse_accept)
            .transpose()?,
        supported,
        media_range_specificity,
        |_| 0,
    );
    let charset = best(
        NegotiatedHeader::AcceptCharset,
        headers.accept_charset.as_deref(),
        &CHARSETS,
        |charset, range| token_specificity(charset, range),
        |_| 0,
    )?;
    let encoding = match present(headers.accept_encoding.as_deref()) {
        None => ContentEncoding::Identity,
        header => best(
            NegotiatedHeader::AcceptEncoding,
            header,
            &ENCODINGS,
            encoding_specificity,
            // identity stays acceptable unless a range excludes it
            |encoding| Quality::from(encoding == ContentEncoding::Identity),
        )?,
    };
    let language = best(
        NegotiatedHeader::AcceptLanguage,
        headers.accept_language.as_deref(),
        &LANGUAGES,
        |language, range| language_specificity(language, range),
        |_| 0,
    )?;

    let negotiated = Negotiated::new(representations, charset, encoding, language).ok_or_else(
        || NegotiationError::NotAcceptable {
            header: NegotiatedHeader::Accept,
            supported: list(supported),
        },
    )?;
    debug!(
        representation = %negotiated.representation(),
        charset,
        %encoding,
        language,
        "Negotiated response format"
    );
    Ok(negotiated)
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}

/// Orders the acceptable values of `supported`, best first.
///
/// `specificity` returns how specifically a range names a value, or `None` if the range does not
/// match it. `fallback` is the weight of values that no range matches. Without ranges, every
/// supported value is acceptable.
fn rank<T: Copy, V>(
    ranges: Option<Vec<Range<V>>>,
    supported: &[T],
    specificity: impl Fn(T, &V) -> Option<u8>,
    fallback: impl Fn(T) -> Quality,
) -> Vec<T> {
    let Some(ranges) = ranges else {
        return supported.to_vec();
    };

    let mut weighted = supported
        .iter()
        .map(|candidate| {
            let mut best_match: Option<(u8, Quality)> = None;
            for range in &ranges {
                if let Some(specificity) = specificity(*candidate, &range.value) {
                    if best_match.map_or(true, |(current, _)| specificity > current) {
                        best_match = Some((specificity, range.quality));
                    }
                }
            }
            let quality = best_match.map_or_else(|| fallback(*candidate), |(_, q)| q);
            (*candidate, quality)
        })
        .filter(|(_, quality)| *quality > 0)
        .collect::<Vec<_>>();
    // The sort is stable: ties keep the declaration order.
    weighted.sort_by(|(_, a), (_, b)| b.cmp(a));
    weighted.into_iter().map(|(candidate, _)| candidate).collect()
}

/// Picks the best value of a token header (`Accept-Charset`, `Accept-Encoding`, `Accept-Language`).
fn best<T: Copy + ToString>(
    header: NegotiatedHeader,
    value: Option<&str>,
    supported: &[T],
    specificity: impl Fn(T, &str) -> Option<u8>,
    fallback: impl Fn(T) -> Quality,
) -> Result<T, NegotiationError> {
    let ranges = present(value)
        .map(|value| parse_tokens(header, value))
        .transpose()?;
    rank(
        ranges,
        supported,
        |candidate, range| specificity(candidate, *range),
        fallback,
    )
    .first()
    .copied()
    .ok_or_else(|| NegotiationError::NotAcceptable {
        header,
        supported: list(supported),
    })
}

fn list<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn media_range_specificity(representation: Representation, range: &MediaType<'_>) -> Option<u8> {
    let (ty, subty) = representation.type_and_subtype();
    let range_subty = match range.suffix {
        Some(suffix) => format!("{}+{}", range.subty, suffix),
        None => range.subty.as_str().to_owned(),
    };
    if range.ty == _STAR && range.subty == _STAR {
        Some(0)
    } else if !range.ty.as_str().eq_ignore_ascii_case(ty) {
        None
    } else if range.subty == _STAR {
        Some(1)
    } else if range_subty.eq_ignore_ascii_case(subty) {
        Some(2)
    } else {
        None
    }
}

fn token_specificity(token: &str, range: &str) -> Option<u8> {
    if range == "*" {
        Some(0)
    } else if range.eq_ignore_ascii_case(token) {
        Some(1)
    } else {
        None
    }
}

fn encoding_specificity(encoding: ContentEncoding, range: &str) -> Option<u8> {
    match encoding {
        ContentEncoding::Gzip if range.eq_ignore_ascii_case("x-gzip") => Some(1),
        _ => token_specificity(encoding.as_str(), range),
    }
}

/// A language range matches a tag if it equals the tag or is one of its prefixes.
fn language_specificity(language: &str, range: &str) -> Option<u8> {
    if range == "*" {
        return Some(0);
    }
    let matches = language.eq_ignore_ascii_case(range)
        || (language.len() > range.len()
            && language.as_bytes()[range.len()] == b'-'
            && language[..range.len()].eq_ignore_ascii_case(range));
    matches.then(|| u8::try_from(range.split('-').count()).unwrap_or(u8::MAX))
}

/// Parses the media ranges of an `Accept` header. Quoted parameter values may contain commas.
fn parse_accept(value: &str) -> Result<Vec<Range<MediaType<'_>>>, NegotiationError> {
    let malformed = || NegotiationError::MalformedHeader {
        header: NegotiatedHeader::Accept,
        value: value.to_owned(),
    };

    MediaTypeList::new(value)
        .map(|media_range| {
            let media_range = media_range.map_err(|_| malformed())?;
            let quality = match media_range.get_param(Q) {
                Some(q) => parse_quality(&q.unquoted_str()).ok_or_else(malformed)?,
                None => MAX_QUALITY,
            };
            Ok(Range {
                value: media_range,
                quality,
            })
        })
        .collect()
}

fn parse_tokens(
    header: NegotiatedHeader,
    value: &str,
) -> Result<Vec<Range<&str>>, NegotiationError> {
    let malformed = || NegotiationError::MalformedHeader {
        header,
        value: value.to_owned(),
    };

    let mut ranges = Vec::new();
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let mut parts = entry.split(';').map(str::trim);
        let range = parts.next().unwrap_or_default();
        if !is_token(range) {
            return Err(malformed());
        }

        let mut quality = MAX_QUALITY;
        for parameter in parts.filter(|p| !p.is_empty()) {
            let (name, value) = parameter.split_once('=').ok_or_else(malformed)?;
            if name.trim().eq_ignore_ascii_case("q") {
                quality = parse_quality(value.trim()).ok_or_else(malformed)?;
            }
        }
        ranges.push(Range {
            value: range,
            quality,
        });
    }
    Ok(ranges)
}

/// Parses a quality value: a number in `[0, 1]` with at most three decimals.
fn parse_quality(value: &str) -> Option<Quality> {
    let (integer, decimals) = value.split_once('.').unwrap_or((value, ""));
    if decimals.len() > 3 || !decimals.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let fraction = format!("{decimals:0<3}").parse::<Quality>().ok()?;
    match integer {
        "0" => Some(fraction),
        "1" if fraction == 0 => Some(MAX_QUALITY),
        _ => None,
    }
}

fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_.+!*".contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use osfws_model::{RDF_DOCUMENTS, TABULAR_RESULTS};

    fn accept(value: &str) -> AcceptHeaders {
        AcceptHeaders {
            accept: Some(value.to_owned()),
            ..AcceptHeaders::default()
        }
    }

    #[test]
    fn absent_headers_select_first_declared_values() {
        let negotiated = negotiate(&AcceptHeaders::default(), RDF_DOCUMENTS).unwrap();
        assert_eq!(negotiated.representation(), Representation::RdfXml);
        assert_eq!(negotiated.representations(), RDF_DOCUMENTS);
        assert_eq!(negotiated.charset, "utf-8");
        assert_eq!(negotiated.encoding, ContentEncoding::Identity);
        assert_eq!(negotiated.language, "en");
    }

    #[test]
    fn highest_quality_wins() {
        let negotiated = negotiate(
            &accept("application/rdf+xml;q=0.5, text/turtle;q=0.9"),
            RDF_DOCUMENTS,
        )
        .unwrap();
        assert_eq!(
            negotiated.representations(),
            [Representation::Turtle, Representation::RdfXml]
        );
    }

    #[test]
    fn ties_go_to_first_declared_representation() {
        let negotiated = negotiate(&accept("text/turtle, application/rdf+xml"), RDF_DOCUMENTS)
            .unwrap();
        assert_eq!(negotiated.representation(), Representation::RdfXml);
    }

    #[test]
    fn specific_ranges_override_wildcards() {
        let negotiated = negotiate(
            &accept("*/*;q=0.8, application/rdf+xml;q=0, text/*;q=0.9"),
            RDF_DOCUMENTS,
        )
        .unwrap();
        assert_eq!(
            negotiated.representations(),
            [
                Representation::Turtle,
                Representation::N3,
                Representation::Json
            ]
        );
    }

    #[test]
    fn json_is_not_acceptable_for_rdf_only_services() {
        let supported = [Representation::RdfXml, Representation::Turtle];
        assert_eq!(
            negotiate(&accept("application/json"), &supported),
            Err(NegotiationError::NotAcceptable {
                header: NegotiatedHeader::Accept,
                supported: "application/rdf+xml, text/turtle".to_owned(),
            })
        );
    }

    #[test]
    fn zero_quality_means_not_acceptable() {
        assert!(negotiate(&accept("text/csv;q=0"), TABULAR_RESULTS).is_err());
    }

    #[test]
    fn malformed_headers_are_rejected() {
        for value in ["text/csv;q=2", "text/csv;q=0.1234", "text/csv;q=abc", "csv"] {
            assert!(
                matches!(
                    negotiate(&accept(value), TABULAR_RESULTS),
                    Err(NegotiationError::MalformedHeader { .. })
                ),
                "{value} should be malformed"
            );
        }
    }

    #[test]
    fn quoted_commas_stay_inside_their_media_range() {
        let negotiated = negotiate(
            &accept("text/turtle;profile=\"urn:a,urn:b\", application/rdf+xml;q=0.5"),
            RDF_DOCUMENTS,
        )
        .unwrap();
        assert_eq!(
            negotiated.representations(),
            [Representation::Turtle, Representation::RdfXml]
        );
    }

    #[test]
    fn quality_may_be_quoted() {
        let negotiated = negotiate(
            &accept("application/rdf+xml;q=\"0.2\", text/turtle"),
            RDF_DOCUMENTS,
        )
        .unwrap();
        assert_eq!(negotiated.representation(), Representation::Turtle);
    }

    #[test]
    fn negotiates_encoding() {
        let headers = |value: &str| AcceptHeaders {
            accept_encoding: Some(value.to_owned()),
            ..AcceptHeaders::default()
        };
        let encoding = |value: &str| negotiate(&headers(value), RDF_DOCUMENTS).map(|n| n.encoding);

        assert_eq!(encoding("gzip, deflate"), Ok(ContentEncoding::Gzip));
        assert_eq!(encoding("gzip;q=0.5"), Ok(ContentEncoding::Gzip));
        assert_eq!(encoding("deflate, br"), Ok(ContentEncoding::Identity));
        assert_eq!(encoding("*"), Ok(ContentEncoding::Identity));
        assert_eq!(encoding("gzip, identity;q=0"), Ok(ContentEncoding::Gzip));
        assert!(encoding("*;q=0").is_err());
    }

    #[test]
    fn negotiates_charset_and_language() {
        let headers = AcceptHeaders {
            accept_charset: Some("iso-8859-1;q=0.9, UTF-8".to_owned()),
            accept_language: Some("fr;q=0.9, en".to_owned()),
            ..AcceptHeaders::default()
        };
        let negotiated = negotiate(&headers, RDF_DOCUMENTS).unwrap();
        assert_eq!(negotiated.charset, "utf-8");
        assert_eq!(negotiated.language, "en");

        let french_only = AcceptHeaders {
            accept_language: Some("fr-CA, en-US".to_owned()),
            ..AcceptHeaders::default()
        };
        assert!(matches!(
            negotiate(&french_only, RDF_DOCUMENTS),
            Err(NegotiationError::NotAcceptable {
                header: NegotiatedHeader::AcceptLanguage,
                ..
            })
        ));
    }

    #[test]
    fn parses_quality_values() {
        assert_eq!(parse_quality("1"), Some(1000));
        assert_eq!(parse_quality("1.000"), Some(1000));
        assert_eq!(parse_quality("0.5"), Some(500));
        assert_eq!(parse_quality("0.05"), Some(50));
        assert_eq!(parse_quality("0"), Some(0));
        assert_eq!(parse_quality("1.5"), None);
        assert_eq!(parse_quality(".5"), None);
    }
}
