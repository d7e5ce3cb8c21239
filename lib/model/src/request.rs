use std::fmt;

/// The name of the parameter that selects the source interface of a service.
pub const INTERFACE_PARAM: &str = "interface";
/// The name of the parameter that selects the version of the source interface.
pub const VERSION_PARAM: &str = "version";
/// The interface that is used when a request does not name one.
pub const DEFAULT_INTERFACE: &str = "default";

/// The HTTP method an operation is bound to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw values of the headers that take part in content negotiation.
///
/// `None` means that the client did not send the header at all.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AcceptHeaders {
    pub accept: Option<String>,
    pub accept_charset: Option<String>,
    pub accept_encoding: Option<String>,
    pub accept_language: Option<String>,
}

/// A normalized web service request.
///
/// The parameters keep the order in which they first appeared in the request. If a parameter is
/// repeated, the first occurrence wins. A [`RequestParams`] is never changed after it has been
/// built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestParams {
    method: HttpMethod,
    params: Vec<(String, String)>,
    headers: AcceptHeaders,
    requester_ip: String,
    user_agent: String,
}

impl RequestParams {
    /// Creates a new request from the given parameter pairs.
    pub fn new(
        method: HttpMethod,
        pairs: impl IntoIterator<Item = (String, String)>,
        headers: AcceptHeaders,
    ) -> Self {
        let mut params: Vec<(String, String)> = Vec::new();
        for (name, value) in pairs {
            if !params.iter().any(|(existing, _)| *existing == name) {
                params.push((name, value));
            }
        }

        Self {
            method,
            params,
            headers,
            requester_ip: String::new(),
            user_agent: String::new(),
        }
    }

    /// Attaches the address of the client that issued the request.
    #[must_use]
    pub fn with_requester_ip(mut self, requester_ip: impl Into<String>) -> Self {
        self.requester_ip = requester_ip.into();
        self
    }

    /// Attaches the user agent of the client that issued the request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn headers(&self) -> &AcceptHeaders {
        &self.headers
    }

    pub fn requester_ip(&self) -> &str {
        &self.requester_ip
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Returns the value of `name`, if the client sent it.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value of `name` or the empty string if it is absent.
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or_default()
    }

    /// Returns the value of `name` or `default` if it is absent.
    pub fn get_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.get(name).unwrap_or(default)
    }

    /// Returns whether the boolean parameter `name` is set.
    ///
    /// Only the value `"true"` (in any case) counts as set.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }

    /// The requested source interface. Defaults to [`DEFAULT_INTERFACE`].
    pub fn interface(&self) -> &str {
        self.get_or(INTERFACE_PARAM, DEFAULT_INTERFACE)
    }

    /// The requested interface version. Empty if the client did not ask for one.
    pub fn version(&self) -> &str {
        self.get_or_empty(VERSION_PARAM)
    }

    /// Iterates over all parameters in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.params
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// A compact `name=value` summary of the parameters, used for access logging.
    pub fn summary(&self) -> String {
        self.iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pairs: &[(&str, &str)]) -> RequestParams {
        RequestParams::new(
            HttpMethod::Get,
            pairs
                .iter()
                .map(|(name, value)| ((*name).to_owned(), (*value).to_owned())),
            AcceptHeaders::default(),
        )
    }

    #[test]
    fn absent_parameters_default_to_empty() {
        let params = request(&[]);
        assert_eq!(params.get_or_empty("uri"), "");
        assert_eq!(params.get("uri"), None);
    }

    #[test]
    fn interface_defaults_to_default() {
        assert_eq!(request(&[]).interface(), "default");
        assert_eq!(request(&[("interface", "legacy")]).interface(), "legacy");
        assert_eq!(request(&[]).version(), "");
    }

    #[test]
    fn flags_are_only_set_by_true() {
        let params = request(&[
            ("advancedIndexation", "TRUE"),
            ("registered_ip", "1"),
            ("other", "yes"),
        ]);
        assert!(params.flag("advancedIndexation"));
        assert!(!params.flag("registered_ip"));
        assert!(!params.flag("other"));
        assert!(!params.flag("missing"));
    }

    #[test]
    fn first_occurrence_wins() {
        let params = request(&[("uri", "a"), ("title", "t"), ("uri", "b")]);
        assert_eq!(params.get("uri"), Some("a"));
        assert_eq!(params.summary(), "uri=a&title=t");
    }
}
