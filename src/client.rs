//! The transport seam between resource services and Github.
//!
//! Services build [`Request`]s and hand them to a [`RestClient`]; the client
//! owns authentication, the wire format and paging headers.

use serde::de::DeserializeOwned;
use serde::ser::Serialize;
use serde_json::{self, Value};

use error::*;

use std::marker::PhantomData;

/// The number of items requested per page.
pub const PAGE_SIZE: u32 = 100;

/// A GET request against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// The path of the resource, relative to the API root.
    pub uri: String,
    /// The page to fetch, if the resource is paged.
    pub page: Option<u32>,
    /// The number of items per page.
    pub per_page: u32,
}

impl Request {
    /// A request for the given path.
    pub fn new<U>(uri: U) -> Self
        where U: Into<String>,
    {
        Request {
            uri: uri.into(),
            page: None,
            per_page: PAGE_SIZE,
        }
    }

    fn with_page(&self, page: u32) -> Self {
        Request {
            page: Some(page),
            ..self.clone()
        }
    }
}

/// A decoded response.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// The JSON body.
    pub body: Value,
    /// The next page advertised by the server, if any.
    pub next_page: Option<u32>,
}

impl Response {
    /// A response with no further pages.
    pub fn new(body: Value) -> Self {
        Response {
            body: body,
            next_page: None,
        }
    }

    /// Decode the body.
    pub(crate) fn decode<T>(self) -> Result<T>
        where T: DeserializeOwned,
    {
        decode(self.body)
    }
}

/// An HTTP client for the Github API.
pub trait RestClient {
    /// Fetch a resource.
    fn get(&self, request: &Request) -> Result<Response>;

    /// Send a body to a resource and return the decoded response.
    fn post(&self, uri: &str, body: Value) -> Result<Value>;

    /// Delete a resource.
    fn delete(&self, uri: &str) -> Result<()>;
}

pub(crate) fn encode<T>(value: &T) -> Result<Value>
    where T: Serialize,
{
    serde_json::to_value(value).chain_err(|| ErrorKind::Serialize)
}

pub(crate) fn decode<T>(value: Value) -> Result<T>
    where T: DeserializeOwned,
{
    serde_json::from_value(value).chain_err(|| ErrorKind::Deserialize)
}

/// A request for a collection spread across pages.
#[derive(Debug)]
pub struct PagedRequest<T> {
    request: Request,
    _phantom: PhantomData<fn() -> T>,
}

// Manual impl to avoid requiring `T: Clone`.
impl<T> Clone for PagedRequest<T> {
    fn clone(&self) -> Self {
        PagedRequest {
            request: self.request.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<T> PagedRequest<T>
    where T: DeserializeOwned,
{
    /// A paged request for the given path.
    pub fn new<U>(uri: U) -> Self
        where U: Into<String>,
    {
        PagedRequest {
            request: Request::new(uri),
            _phantom: PhantomData,
        }
    }

    /// Set the number of items fetched per page.
    pub fn per_page(mut self, per_page: u32) -> Self {
        self.request.per_page = per_page;
        self
    }

    /// The request for the first page.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Iterate over the pages of the collection.
    ///
    /// Nothing is fetched until the iterator is advanced. Each call starts
    /// again from the first page.
    pub fn pages<'a, C>(&self, client: &'a C) -> Pages<'a, C, T>
        where C: RestClient + ?Sized,
    {
        Pages {
            client: client,
            request: self.request.clone(),
            next_page: Some(1),
            _phantom: PhantomData,
        }
    }
}

/// Iterator over the pages of a collection.
///
/// Yields one `Vec` per page in server order. Iteration ends after the last
/// page or after the first error.
pub struct Pages<'a, C, T>
    where C: 'a + RestClient + ?Sized,
{
    client: &'a C,
    request: Request,
    next_page: Option<u32>,
    _phantom: PhantomData<fn() -> T>,
}

impl<'a, C, T> Iterator for Pages<'a, C, T>
    where C: 'a + RestClient + ?Sized,
          T: DeserializeOwned,
{
    type Item = Result<Vec<T>>;

    fn next(&mut self) -> Option<Self::Item> {
        let page = self.next_page.take()?;
        trace!(target: "github", "fetching page {} of {}", page, self.request.uri);

        let rsp = match self.client.get(&self.request.with_page(page)) {
            Ok(rsp) => rsp,
            Err(err) => return Some(Err(err)),
        };

        let next_page = rsp.next_page.filter(|&next| next > page);
        if next_page.is_none() && rsp.next_page.is_some() {
            warn!(target: "github", "ignoring non-advancing next page {:?} after page {} of {}",
                  rsp.next_page, page, self.request.uri);
        }
        let items = rsp.decode();
        if items.is_ok() {
            self.next_page = next_page;
        }

        Some(items)
    }
}

/// Fetch every page of a collection and concatenate them in order.
pub fn get_all<C, T>(client: &C, request: &PagedRequest<T>) -> Result<Vec<T>>
    where C: RestClient + ?Sized,
          T: DeserializeOwned,
{
    let mut results = Vec::new();
    for page in request.pages(client) {
        results.extend(page?);
    }
    Ok(results)
}
