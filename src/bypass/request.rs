//! Request descriptors
//!
//! [`HttpAttributes`] mirrors what the ext-authz transport hands over (the
//! HTTP part of an Envoy `CheckRequest`). [`RequestDescriptor`] is what the
//! engine decides on.

/// The HTTP attributes of an authorization check, as received
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpAttributes {
    pub host: String,
    pub method: String,
    pub path: String,
    /// Text body; empty when not sent
    pub body: String,
    /// Raw body bytes; empty when not sent
    pub raw_body: Vec<u8>,
}

impl HttpAttributes {
    /// Resolve the effective body
    ///
    /// A non-empty text body wins over raw bytes. Raw bytes are decoded as
    /// UTF-8, replacing invalid sequences. Neither present gives `""`.
    pub fn effective_body(&self) -> String {
        if !self.body.is_empty() {
            return self.body.clone();
        }
        if !self.raw_body.is_empty() {
            return String::from_utf8_lossy(&self.raw_body).into_owned();
        }
        String::new()
    }
}

/// One request to decide on
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub host: String,
    pub method: String,
    pub path: String,
    pub body: String,
}

impl RequestDescriptor {
    pub fn new(
        host: impl Into<String>,
        method: impl Into<String>,
        path: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            method: method.into(),
            path: path.into(),
            body: body.into(),
        }
    }
}

impl From<HttpAttributes> for RequestDescriptor {
    fn from(attributes: HttpAttributes) -> Self {
        let body = attributes.effective_body();
        Self {
            host: attributes.host,
            method: attributes.method,
            path: attributes.path,
            body,
        }
    }
}
