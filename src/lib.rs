#![warn(missing_docs)]

//! A library for communicating with Github instances.
//!
//! The client covers repository deploy keys: listing, fetching, creating,
//! editing and deleting the SSH keys authorized for a single repository.

extern crate chrono;
#[macro_use]
extern crate error_chain;
extern crate itertools;
#[macro_use]
extern crate log;
#[cfg(test)]
extern crate mockito;
extern crate reqwest;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[cfg_attr(test, macro_use)]
extern crate serde_json;

mod error;
mod client;
mod github;
mod types;
mod deploy_keys;

pub use error::*;
pub use client::{get_all, Pages, PagedRequest, Request, Response, RestClient, PAGE_SIZE};
pub use github::Github;
pub use types::*;
pub use deploy_keys::DeployKeyService;

#[cfg(test)]
mod test;
