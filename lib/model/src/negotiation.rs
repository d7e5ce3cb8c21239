use crate::Representation;
use std::fmt;

/// The content coding applied to a response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContentEncoding {
    Identity,
    Gzip,
}

impl ContentEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentEncoding::Identity => "identity",
            ContentEncoding::Gzip => "gzip",
        }
    }
}

impl fmt::Display for ContentEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a successful content negotiation.
///
/// `representations` holds every acceptable representation, best first. It is never empty and
/// its first element is the selected representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Negotiated {
    representations: Vec<Representation>,
    pub charset: &'static str,
    pub encoding: ContentEncoding,
    pub language: &'static str,
}

impl Negotiated {
    /// Returns `None` if `representations` is empty.
    pub fn new(
        representations: Vec<Representation>,
        charset: &'static str,
        encoding: ContentEncoding,
        language: &'static str,
    ) -> Option<Self> {
        if representations.is_empty() {
            return None;
        }
        Some(Self {
            representations,
            charset,
            encoding,
            language,
        })
    }

    /// The selected representation.
    pub fn representation(&self) -> Representation {
        self.representations[0]
    }

    /// All acceptable representations ordered by preference.
    pub fn representations(&self) -> &[Representation] {
        &self.representations
    }

    /// The value of the `Content-Type` header for `representation`.
    pub fn content_type(&self, representation: Representation) -> String {
        format!("{}; charset={}", representation.media_type(), self.charset)
    }
}

/// The headers that take part in content negotiation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NegotiatedHeader {
    Accept,
    AcceptCharset,
    AcceptEncoding,
    AcceptLanguage,
}

impl fmt::Display for NegotiatedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NegotiatedHeader::Accept => "Accept",
            NegotiatedHeader::AcceptCharset => "Accept-Charset",
            NegotiatedHeader::AcceptEncoding => "Accept-Encoding",
            NegotiatedHeader::AcceptLanguage => "Accept-Language",
        })
    }
}

/// Why content negotiation failed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NegotiationError {
    #[error("The {header} header does not accept any of the supported values ({supported}).")]
    NotAcceptable {
        header: NegotiatedHeader,
        supported: String,
    },
    #[error("The {header} header is malformed: '{value}'.")]
    MalformedHeader {
        header: NegotiatedHeader,
        value: String,
    },
}
