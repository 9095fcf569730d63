//! Storefront backend API client implementation.
//!
//! Uses `reqwest` for HTTP and caches catalog reads using `moka`
//! (5-minute TTL). Mutating endpoints require a bearer token obtained
//! from [`ApiClient::login`].

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use atelier_cart::{Extra, LineItem};
use atelier_core::{ExperienceId, LineId, OrderId, ProductId, RoomId};
use moka::future::Cache;
use reqwest::{RequestBuilder, StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::ClientError;
use crate::cache::CacheValue;
use crate::types::{
    Ack, AuthSession, CartAddRequest, CartUpdateRequest, CheckoutRequest, Experience, Order,
    OrderLine, Payment, Product, Quote, Room, UserProfile,
};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the storefront backend REST API.
///
/// Cheap to clone; clones share the HTTP connection pool, the bearer
/// token, and the catalog cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
    cache: Cache<String, CacheValue>,
}

impl ApiClient {
    /// Create a client against the given backend base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(100)
            .time_to_live(CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                http: reqwest::Client::new(),
                base_url,
                token: RwLock::new(None),
                cache,
            }),
        }
    }

    // =========================================================================
    // Session token
    // =========================================================================

    /// Install a bearer token (e.g. one restored from local storage).
    pub fn set_token(&self, token: SecretString) {
        *self.token_slot() = Some(token);
    }

    /// Whether a session token is installed.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token_slot().is_some()
    }

    /// Drop the session token. The local cart is left untouched.
    pub fn clear_token(&self) {
        *self.token_slot() = None;
    }

    fn token_slot(&self) -> std::sync::RwLockWriteGuard<'_, Option<SecretString>> {
        self.inner
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, ClientError> {
        let guard = self
            .inner
            .token
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let token = guard
            .as_ref()
            .ok_or_else(|| ClientError::Unauthorized("no session token".to_string()))?;
        Ok(request.header(
            header::AUTHORIZATION,
            format!("Bearer {}", token.expose_secret()),
        ))
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::BaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn execute<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        // Read the body as text first for better error diagnostics.
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(ClientError::Unauthorized(error_message(&text)));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(error_message(&text)));
        }
        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(ClientError::Status {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|err| {
            tracing::error!(
                error = %err,
                body = %text.chars().take(500).collect::<String>(),
                "failed to parse backend response"
            );
            err.into()
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        Self::execute(self.inner.http.get(self.endpoint(segments)?)).await
    }

    async fn get_json_authed<T: DeserializeOwned>(
        &self,
        segments: &[&str],
    ) -> Result<T, ClientError> {
        let request = self.inner.http.get(self.endpoint(segments)?);
        Self::execute(self.authorize(request)?).await
    }

    // =========================================================================
    // Auth
    // =========================================================================

    /// Log in and install the returned bearer token.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] on bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ClientError> {
        let request = self
            .inner
            .http
            .post(self.endpoint(&["api", "auth", "login"])?)
            .json(&serde_json::json!({ "email": email, "password": password }));
        let session: AuthSession = Self::execute(request).await?;
        self.set_token(SecretString::from(session.token.clone()));
        Ok(session)
    }

    /// Register a new account. Does not log in.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the registration.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<&str>,
    ) -> Result<Ack, ClientError> {
        let request = self
            .inner
            .http
            .post(self.endpoint(&["api", "auth", "register"])?)
            .json(&serde_json::json!({ "email": email, "password": password, "name": name }));
        Self::execute(request).await
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a valid session.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile, ClientError> {
        self.get_json_authed(&["api", "auth", "profile"]).await
    }

    // =========================================================================
    // Catalog (cached)
    // =========================================================================

    /// List catalog products. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ClientError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get("products").await {
            debug!("cache hit for products");
            return Ok(products);
        }
        let products: Vec<Product> = self.get_json(&["api", "products"]).await?;
        self.inner
            .cache
            .insert("products".to_string(), CacheValue::Products(products.clone()))
            .await;
        Ok(products)
    }

    /// Get one product by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown ID.
    #[instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product, ClientError> {
        self.get_json(&["api", "products", &id.to_string()]).await
    }

    /// List bookable experiences. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn experiences(&self) -> Result<Vec<Experience>, ClientError> {
        if let Some(CacheValue::Experiences(experiences)) =
            self.inner.cache.get("experiences").await
        {
            debug!("cache hit for experiences");
            return Ok(experiences);
        }
        let experiences: Vec<Experience> = self.get_json(&["api", "experiences"]).await?;
        self.inner
            .cache
            .insert(
                "experiences".to_string(),
                CacheValue::Experiences(experiences.clone()),
            )
            .await;
        Ok(experiences)
    }

    /// Get one experience by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown ID.
    #[instrument(skip(self))]
    pub async fn experience(&self, id: ExperienceId) -> Result<Experience, ClientError> {
        self.get_json(&["api", "experiences", &id.to_string()])
            .await
    }

    /// List bookable rooms. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn rooms(&self) -> Result<Vec<Room>, ClientError> {
        if let Some(CacheValue::Rooms(rooms)) = self.inner.cache.get("rooms").await {
            debug!("cache hit for rooms");
            return Ok(rooms);
        }
        let rooms: Vec<Room> = self.get_json(&["api", "rooms"]).await?;
        self.inner
            .cache
            .insert("rooms".to_string(), CacheValue::Rooms(rooms.clone()))
            .await;
        Ok(rooms)
    }

    /// Get one room by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] for an unknown ID.
    #[instrument(skip(self))]
    pub async fn room(&self, id: RoomId) -> Result<Room, ClientError> {
        self.get_json(&["api", "rooms", &id.to_string()]).await
    }

    /// List bookable extras. Cached for 5 minutes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn extras(&self) -> Result<Vec<Extra>, ClientError> {
        if let Some(CacheValue::Extras(extras)) = self.inner.cache.get("extras").await {
            debug!("cache hit for extras");
            return Ok(extras);
        }
        let extras: Vec<Extra> = self.get_json(&["api", "extras"]).await?;
        self.inner
            .cache
            .insert("extras".to_string(), CacheValue::Extras(extras.clone()))
            .await;
        Ok(extras)
    }

    /// Drop all cached catalog reads.
    pub async fn invalidate_catalog(&self) {
        self.inner.cache.invalidate_all();
    }

    // =========================================================================
    // Cart mirror
    // =========================================================================

    /// Mirror an added line to the backend cart.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a session.
    #[instrument(skip(self, line), fields(line_id = %line.line_id))]
    pub async fn cart_add(&self, line: &LineItem) -> Result<Ack, ClientError> {
        let request = self
            .inner
            .http
            .post(self.endpoint(&["api", "cart", "add"])?)
            .json(&CartAddRequest { line });
        Self::execute(self.authorize(request)?).await
    }

    /// Mirror a quantity change to the backend cart.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a session.
    #[instrument(skip(self))]
    pub async fn cart_update(&self, line_id: LineId, quantity: u32) -> Result<Ack, ClientError> {
        let request = self
            .inner
            .http
            .put(self.endpoint(&["api", "cart", "update", &line_id.to_string()])?)
            .json(&CartUpdateRequest { quantity });
        Self::execute(self.authorize(request)?).await
    }

    /// Mirror a line removal to the backend cart.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a session.
    #[instrument(skip(self))]
    pub async fn cart_remove(&self, line_id: LineId) -> Result<Ack, ClientError> {
        let request = self
            .inner
            .http
            .delete(self.endpoint(&["api", "cart", "remove", &line_id.to_string()])?);
        Self::execute(self.authorize(request)?).await
    }

    /// Mirror a cart clear to the backend.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a session.
    #[instrument(skip(self))]
    pub async fn cart_clear(&self) -> Result<Ack, ClientError> {
        let request = self.inner.http.post(self.endpoint(&["api", "cart", "clear"])?);
        Self::execute(self.authorize(request)?).await
    }

    // =========================================================================
    // Orders, quotes, payments
    // =========================================================================

    /// Create an order from the priced cart lines (checkout).
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the order.
    #[instrument(skip(self, checkout), fields(lines = checkout.items.len()))]
    pub async fn create_order(&self, checkout: &CheckoutRequest) -> Result<Order, ClientError> {
        #[derive(Deserialize)]
        struct OrderCreated {
            order: Order,
        }
        let request = self
            .inner
            .http
            .post(self.endpoint(&["api", "orders"])?)
            .json(checkout);
        let created: OrderCreated = Self::execute(self.authorize(request)?).await?;
        Ok(created.order)
    }

    /// Fetch the authenticated user's order history.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a session.
    #[instrument(skip(self))]
    pub async fn orders(&self) -> Result<Vec<Order>, ClientError> {
        self.get_json_authed(&["api", "orders"]).await
    }

    /// Save a quote for business approval.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the quote.
    #[instrument(skip(self, items), fields(lines = items.len()))]
    pub async fn create_quote(&self, items: &[OrderLine]) -> Result<Quote, ClientError> {
        #[derive(Deserialize)]
        struct QuoteCreated {
            quote: Quote,
        }
        let request = self
            .inner
            .http
            .post(self.endpoint(&["api", "quotes"])?)
            .json(&serde_json::json!({ "items": items }));
        let created: QuoteCreated = Self::execute(self.authorize(request)?).await?;
        Ok(created.quote)
    }

    /// Fetch the authenticated user's quotes.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] without a session.
    #[instrument(skip(self))]
    pub async fn quotes(&self) -> Result<Vec<Quote>, ClientError> {
        self.get_json_authed(&["api", "quotes"]).await
    }

    /// Create a payment session for an order.
    ///
    /// The gateway reports success or failure in [`Payment::status`];
    /// a declined payment is a normal response, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be created at all.
    #[instrument(skip(self))]
    pub async fn create_payment(
        &self,
        order_id: OrderId,
        amount: atelier_core::Money,
        method: &str,
    ) -> Result<Payment, ClientError> {
        #[derive(Deserialize)]
        struct PaymentCreated {
            payment: Payment,
        }
        let request = self
            .inner
            .http
            .post(self.endpoint(&["api", "payments", "create-payment"])?)
            .json(&serde_json::json!({
                "order_id": order_id,
                "amount": amount,
                "payment_method": method,
            }));
        let created: PaymentCreated = Self::execute(self.authorize(request)?).await?;
        Ok(created.payment)
    }
}

/// Pull a human-readable message out of an error body.
///
/// The backend uses `{"error": "..."}` envelopes; fall back to the raw
/// body, truncated.
fn error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: String,
    }
    serde_json::from_str::<ErrorBody>(body)
        .map_or_else(|_| body.chars().take(200).collect(), |parsed| parsed.error)
}
