//! Client error types

use thiserror::Error;

/// Failure classes surfaced by the client. All are terminal: retries happen
/// inside the request loop and never leak out as partial results.
#[derive(Error, Debug)]
pub enum BggError {
    #[error("BGG closed the connection prematurely after {attempts} attempts: {message}")]
    Transport { attempts: u32, message: String },

    #[error("BGG returned status code {status} when requesting {url}")]
    Http { status: u16, url: String },

    #[error("BGG returned errors while requesting {url}: {message}")]
    Api { url: String, message: String },

    #[error("Unexpected BGG payload: {0}")]
    Parse(String),
}
