//! `CinematerialApi` trait definition.
#![allow(clippy::future_not_send)]

use crate::error::Result;
use crate::params::PosterQuery;
use crate::types::CinematerialResult;

/// Cinematerial poster lookup trait.
///
/// Abstracts the lookup for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(CinematerialApi: Send)]
pub trait LocalCinematerialApi {
    /// Looks up the posters of a title.
    ///
    /// A title the service does not know yields
    /// [`CinematerialResult::default`], not an error.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any request is sent if the query
    /// is invalid, or a remote-service error if the request fails.
    async fn search(&self, query: &PosterQuery) -> Result<CinematerialResult>;
}
