//! Request signatures.

use std::fmt::Debug;

use md5::{Digest, Md5};

use crate::imdb::ImdbId;
use crate::params::ImageWidth;

/// Computes the `secret` query parameter of a request.
///
/// Implementations must be pure: the same inputs always produce the same
/// signature, and the signature depends on `api_secret`.
pub trait RequestSigner: Debug + Send + Sync {
    /// Signs a request for `imdb_id` at `width`.
    fn sign(&self, api_key: &str, api_secret: &str, imdb_id: ImdbId, width: ImageWidth) -> String;
}

/// Cinematerial's signature: lowercase hex MD5 of the API secret followed
/// by the `tt`-prefixed IMDb id.
#[derive(Debug, Clone, Copy, Default)]
pub struct Md5Signer;

impl RequestSigner for Md5Signer {
    fn sign(&self, _api_key: &str, api_secret: &str, imdb_id: ImdbId, _width: ImageWidth) -> String {
        let digest = Md5::digest(format!("{api_secret}{imdb_id}").as_bytes());
        hex::encode(digest)
    }
}
