use reqwest::{Client, RequestBuilder, StatusCode, Url};
use reqwest::header;
use serde_json::{self, Value};

use client::{Request, Response, RestClient};
use error::*;

use std::fmt::{self, Debug};

const API_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const USER_AGENT: &str = concat!("rust-github/", env!("CARGO_PKG_VERSION"));

/// A representation of the Github API for a single user.
///
/// Separate users should use separate instances of this.
pub struct Github {
    /// The client to use for API calls.
    client: Client,
    /// The base URL to use for API calls.
    base_url: Url,
    /// The secret token to use when communicating with Github.
    token: String,
}

impl Debug for Github {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Github")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Github {
    /// Create a new Github API representation.
    ///
    /// The `host` may carry a path prefix, as GitHub Enterprise installations
    /// do (`ghe.example.com/api/v3`). The `token` should be a valid [personal
    /// access token](https://github.com/settings/tokens). Errors out if
    /// `host` is not a usable URL authority.
    pub fn new<H, T>(host: H, token: T) -> Result<Self>
        where H: AsRef<str>,
              T: ToString,
    {
        Self::new_impl("https", host.as_ref(), token.to_string())
    }

    /// Create a new non-SSL Github API representation.
    ///
    /// Errors out if `host` is not a usable URL authority.
    pub fn new_insecure<H, T>(host: H, token: T) -> Result<Self>
        where H: AsRef<str>,
              T: ToString,
    {
        Self::new_impl("http", host.as_ref(), token.to_string())
    }

    /// Create a representation of the public `api.github.com` service.
    pub fn api<T>(token: T) -> Result<Self>
        where T: ToString,
    {
        Self::new("api.github.com", token)
    }

    /// Internal method to create a new Github client.
    fn new_impl(protocol: &str, host: &str, token: String) -> Result<Self> {
        let base_url = Url::parse(&format!("{}://{}/", protocol, host.trim_end_matches('/')))
            .chain_err(|| ErrorKind::UrlParse)?;
        let client = Client::builder()
            .build()
            .chain_err(|| ErrorKind::Communication)?;

        Ok(Github {
            client: client,
            base_url: base_url,
            token: token,
        })
    }

    /// Create a URL to an API endpoint.
    fn create_url(&self, uri: &str) -> Result<Url> {
        debug!(target: "github", "api call {}", uri);
        self.base_url
            .join(uri.trim_start_matches('/'))
            .chain_err(|| ErrorKind::UrlParse)
    }

    /// Refactored code which talks to Github and transforms error messages
    /// properly.
    fn send(&self, req: RequestBuilder) -> Result<Response> {
        let mut rsp = req.header(header::AUTHORIZATION, format!("token {}", self.token).as_str())
            .header(header::ACCEPT, API_MEDIA_TYPE)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .chain_err(|| ErrorKind::Communication)?;
        let status = rsp.status();
        let next_page = rsp.headers()
            .get(header::LINK)
            .and_then(|link| link.to_str().ok())
            .and_then(parse_next_page);
        let text = rsp.text().chain_err(|| ErrorKind::Communication)?;

        if !status.is_success() {
            let v = serde_json::from_str(&text).unwrap_or(Value::Null);
            warn!(target: "github", "request failed with {}: {:?}", status, v);
            return Err(Error::from_github(status.as_u16(), v));
        }

        let v = if status == StatusCode::NO_CONTENT || text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).chain_err(|| ErrorKind::Deserialize)?
        };
        debug!(target: "github", "received data: {:?}", v);

        Ok(Response {
            body: v,
            next_page: next_page,
        })
    }
}

impl RestClient for Github {
    fn get(&self, request: &Request) -> Result<Response> {
        let mut url = self.create_url(&request.uri)?;
        if let Some(page) = request.page {
            url.query_pairs_mut()
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &request.per_page.to_string());
        }

        let req = self.client.get(url);
        self.send(req)
    }

    fn post(&self, uri: &str, body: Value) -> Result<Value> {
        let url = self.create_url(uri)?;

        let req = self.client.post(url).json(&body);
        self.send(req).map(|rsp| rsp.body)
    }

    fn delete(&self, uri: &str) -> Result<()> {
        let url = self.create_url(uri)?;

        let req = self.client.delete(url);
        self.send(req).map(|_| ())
    }
}

/// Extract the `page` parameter of the `rel="next"` entry of a `Link` header.
///
/// Github links pages as `<https://api.github.com/...?page=2>; rel="next"`.
fn parse_next_page(link: &str) -> Option<u32> {
    link.split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let target = parts.next()?
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>');

            if parts.any(|param| param.trim() == "rel=\"next\"") {
                Some(target)
            } else {
                None
            }
        })
        .next()
        .and_then(|target| Url::parse(target).ok())
        .and_then(|url| {
            url.query_pairs()
                .find(|pair| pair.0 == "page")
                .and_then(|(_, page)| page.parse().ok())
        })
}
