// Errors produced by the Github client.

#![allow(missing_docs)]

use itertools::Itertools;
use serde_json::Value;

error_chain! {
    errors {
        /// Error occurred when communicating with Github.
        Communication {
            display("communication error")
            description("communication error")
        }
        /// URL parsing error; should never occur.
        UrlParse {
            display("url parse error")
            description("url parse error")
        }
        /// Serialization of a request body failed.
        Serialize {
            display("serialization error")
            description("serialization error")
        }
        /// Deserialization of a response body failed.
        Deserialize {
            display("deserialization error")
            description("deserialization error")
        }
        /// Github returned an error status.
        Github(status: u16, msg: String) {
            display("github error ({}): {}", status, msg)
            description("github error")
        }
        /// An argument was rejected before any request was made.
        InvalidArgument(msg: String) {
            display("invalid argument: {}", msg)
            description("invalid argument")
        }
    }
}

impl Error {
    /// Build an error from the body of a failed Github response.
    ///
    /// Validation failures carry an `errors` array next to the top-level
    /// `message`; the nested messages are appended to it.
    pub fn from_github(status: u16, value: Value) -> Self {
        let msg = value.pointer("/message")
            .and_then(|s| s.as_str())
            .unwrap_or("unknown error");
        let details = value.pointer("/errors")
            .and_then(|e| e.as_array())
            .map(|errors| {
                errors.iter()
                    .filter_map(|e| e.pointer("/message").and_then(|m| m.as_str()))
                    .join("; ")
            })
            .unwrap_or_default();

        let msg = if details.is_empty() {
            msg.to_string()
        } else {
            format!("{}: {}", msg, details)
        };

        Error::from_kind(ErrorKind::Github(status, msg))
    }

    /// Whether Github reported the addressed resource as missing.
    pub fn is_not_found(&self) -> bool {
        match *self.kind() {
            ErrorKind::Github(404, _) => true,
            _ => false,
        }
    }
}
