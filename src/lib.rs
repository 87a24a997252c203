//! Scrappey API client
//!
//! A typed client for the [Scrappey](https://scrappey.com) web scraping and
//! browser automation API. Each operation builds a JSON command envelope
//! (`cmd` plus operation fields), POSTs it to the API, and decodes the
//! reply into [`ScrappeyResponse`]. Session continuity works by passing the
//! returned session identifier back on later calls; the client itself is
//! stateless.
//!
//! ```no_run
//! use scrappey::{RequestOptions, ScrappeyClient, SessionOptions};
//!
//! # async fn run() -> scrappey::Result<()> {
//! let client = ScrappeyClient::from_env()?;
//!
//! let session = client.create_session(&SessionOptions::new()).await?;
//!
//! let response = client
//!     .get(
//!         "https://httpbin.rs/get",
//!         &RequestOptions::new().session(session.session.clone()),
//!     )
//!     .await?;
//!
//! if let Some(error) = response.error() {
//!     eprintln!("request failed: {error}");
//! } else {
//!     println!("{}", response.solution.response);
//! }
//!
//! client.destroy_session(&session.session).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod options;
pub mod types;

pub use client::{ScrappeyClient, ScrappeyClientBuilder, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{Result, ScrappeyError};
pub use options::{BrowserAction, CaptchaType, Command, Envelope, RequestOptions, SessionOptions};
pub use types::{Cookie, JsReturn, ScrappeyResponse, SessionActive, SessionList, Solution};
