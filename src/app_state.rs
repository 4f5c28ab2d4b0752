//! Implements a struct that holds the state of the web server.

use std::sync::{Arc, Mutex};

use crate::{
    Config, Error, api::ApiClient, pagination::PaginationConfig, timezone::get_local_offset,
    views::ViewRegistry,
};

/// The state of the web server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The client for the backend REST API.
    pub api_client: ApiClient,

    /// The table state of every open records page.
    pub views: Arc<Mutex<ViewRegistry>>,

    /// The local timezone as a canonical timezone name, e.g. "Asia/Kolkata".
    pub local_timezone: String,

    /// The config that controls how to display pages of data.
    pub pagination_config: PaginationConfig,
}

impl AppState {
    /// Create a new [AppState] that talks to the backend through `api_client`.
    ///
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Asia/Kolkata".
    /// At most `max_views` records pages keep their table state at once.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if `local_timezone` is not a known timezone.
    pub fn new(
        api_client: ApiClient,
        local_timezone: &str,
        pagination_config: PaginationConfig,
        max_views: usize,
    ) -> Result<Self, Error> {
        if get_local_offset(local_timezone).is_none() {
            return Err(Error::InvalidTimezoneError(local_timezone.to_owned()));
        }

        let views = ViewRegistry::new(max_views, pagination_config.default_page_size);

        Ok(Self {
            api_client,
            views: Arc::new(Mutex::new(views)),
            local_timezone: local_timezone.to_owned(),
            pagination_config,
        })
    }

    /// Create the [AppState] described by the server's `config`.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the configured timezone is not a known timezone.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let api_client = ApiClient::new(&config.api_url, config.request_timeout());

        Self::new(
            api_client,
            &config.timezone,
            PaginationConfig::default(),
            config.max_views,
        )
    }
}
