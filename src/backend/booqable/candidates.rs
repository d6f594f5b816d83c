/**
 * Candidate Space
 *
 * Static enumeration of the plausible base origins, authentication encodings
 * and resource paths of the Booqable API. The space is built once at startup
 * from [`BooqableSettings`] and shared immutably by every operation.
 *
 * # Enumeration Order
 *
 * Discovery walks bases in the outer loop, auth schemes in the middle and
 * resource paths in the inner loop. Every list here is consumed in
 * declaration order, so reordering an entry changes which candidate wins.
 *
 * # Credentials
 *
 * Every auth scheme needs the API key. Without one the auth lists are empty
 * and no candidate is ever attempted.
 */

use crate::shared::config::BooqableSettings;

/// Resource paths probed when looking for the reservations/orders list
pub const RESERVATION_PATHS: &[&str] = &[
    "/orders",
    "/orders.json",
    "/reservations",
    "/reservations.json",
    "/bookings",
    "/bookings.json",
    "/v1/orders",
    "/v1/orders.json",
    "/v1/reservations",
    "/v1/reservations.json",
    "/v1/bookings",
    "/v1/bookings.json",
];

/// Resource paths accepting a new parent booking; same shape as the list
pub const ORDER_CREATE_PATHS: &[&str] = RESERVATION_PATHS;

pub const PRODUCT_PATHS: &[&str] = &[
    "/products",
    "/products.json",
    "/v1/products",
    "/v1/products.json",
    "/api/1/products",
    "/api/1/products.json",
];

pub const INVENTORY_PATHS: &[&str] = &[
    "/v1/items",
    "/items",
    "/api/1/items",
    "/v1/items.json",
    "/items.json",
];

/// List endpoints accepting an `email` filter, tried before the generic lists
pub const CUSTOMER_FILTERED_PATHS: &[&str] = &[
    "/customers",
    "/v1/customers",
    "/api/1/customers",
    "/customers.json",
];

/// Unfiltered customer lists, matched client-side
pub const CUSTOMER_LIST_PATHS: &[&str] = &["/customers", "/v1/customers", "/api/1/customers"];

pub const CUSTOMER_CREATE_PATHS: &[&str] = &[
    "/customers",
    "/v1/customers",
    "/api/1/customers",
    "/customers.json",
];

/// Keys under which list responses carry their records, by resource kind
pub const RESERVATION_LIST_KEYS: &[&str] = &["reservations", "orders", "bookings", "data"];
pub const PRODUCT_LIST_KEYS: &[&str] = &["products", "items", "data", "results"];
pub const CUSTOMER_LIST_KEYS: &[&str] = &["customers", "items", "data", "results"];
pub const INVENTORY_LIST_KEYS: &[&str] = &["items", "data"];

const API_HOST: &str = "https://api.booqable.com";
const APP_HOST: &str = "https://app.booqable.com/api/1";

/// Encoding of the API key on a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `Authorization: Token <key>`
    Token,
    /// `Authorization: Token token=<key>`
    TokenKv,
    /// `X-API-KEY: <key>`
    ApiKeyHeader,
    /// `?token=<key>`
    QueryToken,
    /// `?api_key=<key>`
    QueryApiKey,
}

impl AuthScheme {
    pub const ALL: [AuthScheme; 6] = [
        AuthScheme::Bearer,
        AuthScheme::Token,
        AuthScheme::TokenKv,
        AuthScheme::ApiKeyHeader,
        AuthScheme::QueryToken,
        AuthScheme::QueryApiKey,
    ];

    /// Name reported in attempt traces and discovery results
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bearer => "Bearer",
            Self::Token => "Token",
            Self::TokenKv => "TokenKV",
            Self::ApiKeyHeader => "X-Api-Key",
            Self::QueryToken => "q_token",
            Self::QueryApiKey => "q_api_key",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|scheme| scheme.name() == name)
    }

    /// Whether the key travels in a header rather than the query string
    pub fn is_header(&self) -> bool {
        !matches!(self, Self::QueryToken | Self::QueryApiKey)
    }
}

impl std::fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Upstream credentials
#[derive(Clone, Default)]
pub struct Credentials {
    api_key: String,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into().trim().to_string(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn is_empty(&self) -> bool {
        self.api_key.is_empty()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &if self.is_empty() { "<unset>" } else { "<redacted>" })
            .finish()
    }
}

/// Base origins derived from the account subdomain
///
/// The tenant origin comes first when a subdomain is configured.
pub fn default_bases(subdomain: Option<&str>) -> Vec<String> {
    let mut bases = Vec::with_capacity(3);
    if let Some(sub) = subdomain.map(str::trim).filter(|s| !s.is_empty()) {
        bases.push(format!("https://{}.booqable.com/api/1", sub));
    }
    bases.push(API_HOST.to_string());
    bases.push(APP_HOST.to_string());
    bases
}

/// The immutable candidate space shared by all operations
#[derive(Debug, Clone)]
pub struct CandidateSpace {
    bases: Vec<String>,
    credentials: Credentials,
}

impl CandidateSpace {
    pub fn new(bases: Vec<String>, credentials: Credentials) -> Self {
        Self { bases, credentials }
    }

    pub fn from_settings(settings: &BooqableSettings) -> Self {
        let bases = if settings.base_urls.is_empty() {
            default_bases(settings.account_subdomain.as_deref())
        } else {
            settings.base_urls.clone()
        };
        Self::new(bases, Credentials::new(settings.api_key.clone()))
    }

    pub fn bases(&self) -> &[String] {
        &self.bases
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn has_credential(&self) -> bool {
        !self.credentials.is_empty()
    }

    /// Schemes tried by read probes
    pub fn read_auths(&self) -> Vec<AuthScheme> {
        if !self.has_credential() {
            return Vec::new();
        }
        AuthScheme::ALL.to_vec()
    }

    /// Schemes tried by write calls
    ///
    /// Writes only use header encodings so the key never ends up in a
    /// logged URL of a mutating request.
    pub fn write_auths(&self) -> Vec<AuthScheme> {
        self.read_auths()
            .into_iter()
            .filter(AuthScheme::is_header)
            .collect()
    }
}
