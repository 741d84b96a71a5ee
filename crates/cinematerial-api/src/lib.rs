//! Cinematerial poster lookup client.
//!
//! Resolves IMDb ids and title page addresses, builds signed request URLs
//! for the Cinematerial API and maps its responses onto typed results.

mod api;
mod client;
mod error;
mod imdb;
mod params;
mod signer;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{CinematerialApi, LocalCinematerialApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{CinematerialClient, CinematerialClientBuilder};
pub use error::{CinematerialError, ErrorKind, Result};
pub use imdb::{ImdbId, resolve_imdb_url};
pub use params::{
    DEFAULT_IMAGE_WIDTH, ImageWidth, MAX_IMAGE_WIDTH, MIN_IMAGE_WIDTH, PosterQuery,
    ResolvedQuery, TitleRef, WidthBounds,
};
pub use signer::{Md5Signer, RequestSigner};
#[allow(clippy::module_name_repetitions)]
pub use types::{CinematerialPoster, CinematerialResult};
