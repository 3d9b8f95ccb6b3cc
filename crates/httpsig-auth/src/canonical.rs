//! Signing-string construction.
//!
//! The signing string is the exact byte sequence a signer signs: one line per
//! covered header, in the order the signer listed them, joined by `\n` with no
//! trailing newline.
//!
//! ```text
//! date: Tue, 07 Jun 2011 20:51:35 GMT
//! ```
//!
//! Two synthetic names are resolved from the request itself rather than its
//! headers: `request-line` (emitted bare, e.g. `GET /foo?x=1 HTTP/1.1`) and
//! `(request-target)` (emitted as `(request-target): get /foo?x=1`).

use http::Version;

use crate::error::AuthError;
use crate::request::SignedRequest;

/// Synthetic header name for the HTTP request line.
pub const REQUEST_LINE: &str = "request-line";

/// Synthetic header name for the lowercased method and request target.
pub const REQUEST_TARGET: &str = "(request-target)";

/// Build the signing string for `covered` header names against `request`.
///
/// Names must already be lowercase. Repeated occurrences of a header are
/// joined with `", "` in the order they appear on the request.
///
/// # Errors
///
/// Returns [`AuthError::MissingHeader`] if a covered header is absent, and
/// [`AuthError::InvalidHeaderValue`] if its value is not visible ASCII.
pub fn build_signing_string<R, S>(covered: &[S], request: &R) -> Result<String, AuthError>
where
    R: SignedRequest + ?Sized,
    S: AsRef<str>,
{
    let lines = covered
        .iter()
        .map(|name| signing_line(name.as_ref(), request))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines.join("\n"))
}

fn signing_line<R>(name: &str, request: &R) -> Result<String, AuthError>
where
    R: SignedRequest + ?Sized,
{
    match name {
        REQUEST_LINE => Ok(request_line(request)),
        REQUEST_TARGET => Ok(format!(
            "{REQUEST_TARGET}: {} {}",
            request.method().as_str().to_ascii_lowercase(),
            request_target(request)
        )),
        _ => {
            let value = header_value(name, request)?;
            Ok(format!("{name}: {value}"))
        }
    }
}

/// Format the request line as `<METHOD> <target> <protocol>`.
pub fn request_line<R>(request: &R) -> String
where
    R: SignedRequest + ?Sized,
{
    format!(
        "{} {} {}",
        request.method(),
        request_target(request),
        protocol(request.version())
    )
}

/// Path and query of the request URI as received, without scheme or authority.
pub fn request_target<R>(request: &R) -> &str
where
    R: SignedRequest + ?Sized,
{
    request
        .uri()
        .path_and_query()
        .map_or("/", http::uri::PathAndQuery::as_str)
}

fn header_value<R>(name: &str, request: &R) -> Result<String, AuthError>
where
    R: SignedRequest + ?Sized,
{
    let mut values = request.headers().get_all(name).iter().peekable();
    if values.peek().is_none() {
        return Err(AuthError::MissingHeader(name.to_owned()));
    }

    values
        .map(|v| {
            v.to_str()
                .map_err(|_| AuthError::InvalidHeaderValue(name.to_owned()))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|parts| parts.join(", "))
}

fn protocol(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "HTTP/0.9",
        Version::HTTP_10 => "HTTP/1.0",
        Version::HTTP_2 => "HTTP/2.0",
        Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}
