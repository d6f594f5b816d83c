/**
 * Resource Resolver
 *
 * Resolves caller-supplied identifiers to upstream ids.
 *
 * # Products
 *
 * A product listing is fetched once per operation and indexed in listing
 * order. Resolution walks three tiers and stops at the first hit:
 *
 * 1. exact case-insensitive SKU
 * 2. exact case-insensitive name
 * 3. first name containing the query
 *
 * Within a tier, the earliest product in the listing wins.
 *
 * # Customers
 *
 * With an email, filtered list endpoints are searched for an exact
 * case-insensitive email match before any customer is created. When every
 * lookup fails the customer is created, and when creation fails too the
 * booking proceeds with inline customer fields.
 */

use serde_json::{json, Value};

use crate::shared::booking::{BookingItemInput, CustomerInput, ProductSummary, ProductsQuery, ProductsResponse};

use super::candidates::{
    CUSTOMER_CREATE_PATHS, CUSTOMER_FILTERED_PATHS, CUSTOMER_LIST_KEYS, CUSTOMER_LIST_PATHS,
};
use super::client::RequestDescriptor;
use super::normalize::{string_field, value_id, wrapped_id};
use super::prober::{extract_list, Discovery, EndpointConfig, ProbeParams, ResourceKind};
use super::runner::{AttemptLog, Runner};
use super::{Booqable, BooqableError};

/// Page size used when listing products to resolve booking items
pub const RESOLVE_PAGE_SIZE: u32 = 300;
const DEFAULT_PRODUCT_LIMIT: u32 = 25;
const MAX_PRODUCT_LIMIT: u32 = 100;

/// A product as seen by the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub sku: String,
}

impl Product {
    /// Read a product from a listing entry; entries without an id are skipped
    pub fn from_value(value: &Value) -> Option<Self> {
        let id = ["id", "uuid"]
            .iter()
            .find_map(|key| value.get(*key).and_then(value_id))?;
        Some(Self {
            id,
            name: string_field(value, &["name", "title"]).unwrap_or_default(),
            sku: string_field(value, &["sku", "code"]).unwrap_or_default(),
        })
    }

    pub fn summary(&self) -> ProductSummary {
        ProductSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            sku: self.sku.clone(),
        }
    }
}

/// Products in listing order
#[derive(Debug, Clone, Default)]
pub struct ProductIndex {
    products: Vec<Product>,
}

impl ProductIndex {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn from_list(list: &[Value]) -> Self {
        Self::new(list.iter().filter_map(Product::from_value).collect())
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Resolve the first matching product for any of `terms`
    ///
    /// Tiers are the outer loop, so an exact SKU hit for one term beats a
    /// name hit for another.
    pub fn resolve(&self, terms: &[&str]) -> Option<&Product> {
        let terms: Vec<String> = terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();
        if terms.is_empty() {
            return None;
        }

        let sku_hit = |p: &Product, t: &str| !p.sku.is_empty() && p.sku.to_lowercase() == t;
        let name_hit = |p: &Product, t: &str| !p.name.is_empty() && p.name.to_lowercase() == t;
        let partial_hit = |p: &Product, t: &str| p.name.to_lowercase().contains(t);
        let tiers: [&dyn Fn(&Product, &str) -> bool; 3] = [&sku_hit, &name_hit, &partial_hit];

        tiers.iter().find_map(|matches| {
            terms
                .iter()
                .find_map(|term| self.products.iter().find(|p| matches(*p, term.as_str())))
        })
    }

    /// Resolve a requested booking item by SKU, name or title
    pub fn resolve_item(&self, item: &BookingItemInput) -> Option<&Product> {
        let terms: Vec<&str> = [&item.sku, &item.name, &item.title]
            .into_iter()
            .filter_map(|t| t.as_deref())
            .collect();
        self.resolve(&terms)
    }
}

/// Products listed through a discovered endpoint
#[derive(Debug, Clone)]
pub struct ProductListing {
    pub config: EndpointConfig,
    pub index: ProductIndex,
}

/// Outcome of customer resolution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerRef {
    pub id: Option<String>,
    /// Found by email lookup
    pub existing: bool,
    /// Newly created upstream
    pub created: bool,
}

fn email_matches(customer: &Value, email: &str) -> bool {
    customer
        .get("email")
        .and_then(Value::as_str)
        .is_some_and(|e| e.trim().eq_ignore_ascii_case(email))
}

impl Booqable {
    /// List products through discovery over the product paths
    pub async fn list_products(&self, runner: &Runner, per_page: u32) -> Result<ProductListing, BooqableError> {
        match self
            .discover(runner, ResourceKind::Products, ProbeParams::first_page(per_page))
            .await
        {
            Discovery::Found { config, body, .. } => Ok(ProductListing {
                index: ProductIndex::from_list(extract_list(&body, ResourceKind::Products.list_keys())),
                config,
            }),
            exhausted => Err(BooqableError::from_discovery(exhausted)),
        }
    }

    /// List products with an optional case-insensitive name filter
    pub async fn products(&self, query: &ProductsQuery) -> Result<ProductsResponse, BooqableError> {
        let limit = match query.limit {
            None | Some(0) => DEFAULT_PRODUCT_LIMIT,
            Some(limit) => limit.min(MAX_PRODUCT_LIMIT),
        };
        let needle = query.q.as_deref().unwrap_or("").trim().to_lowercase();

        let runner = self.runner();
        let listing = self.list_products(&runner, limit).await?;
        let products: Vec<ProductSummary> = listing
            .index
            .products()
            .iter()
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .take(limit as usize)
            .map(Product::summary)
            .collect();

        Ok(ProductsResponse {
            ok: true,
            base: listing.config.base,
            endpoint: listing.config.resource_path,
            count: products.len(),
            products,
        })
    }

    /// Find a customer by email, or create one
    pub async fn find_or_create_customer(
        &self,
        runner: &Runner,
        base: &str,
        input: &CustomerInput,
        log: &mut AttemptLog,
    ) -> CustomerRef {
        let email = input.email.as_deref().unwrap_or("").trim().to_string();
        let auths = self.space().write_auths();
        let credentials = self.space().credentials();

        if !email.is_empty() {
            let mut lookups = Vec::new();
            for auth in &auths {
                for path in CUSTOMER_FILTERED_PATHS {
                    lookups.push(
                        RequestDescriptor::get(base, *path, *auth, credentials).with_query("email", &email),
                    );
                }
                for path in CUSTOMER_LIST_PATHS {
                    lookups.push(RequestDescriptor::get(base, *path, *auth, credentials));
                }
            }
            let found = runner
                .first_success(lookups, log, |response| {
                    if !response.is_success() {
                        return None;
                    }
                    extract_list(&response.json, CUSTOMER_LIST_KEYS)
                        .iter()
                        .find(|c| email_matches(c, &email))
                        .and_then(|c| c.get("id").and_then(value_id))
                })
                .await;
            if let Some(hit) = found {
                tracing::info!(customer_id = %hit.value, "Reusing existing Booqable customer");
                return CustomerRef {
                    id: Some(hit.value),
                    existing: true,
                    created: false,
                };
            }
        }

        let body = json!({
            "customer": {
                "name": input.name.as_deref().unwrap_or("").trim(),
                "email": email,
                "phone": input.phone.as_deref().unwrap_or("").trim(),
            }
        });
        let mut creations = Vec::new();
        for auth in &auths {
            for path in CUSTOMER_CREATE_PATHS {
                creations.push(RequestDescriptor::post(base, *path, *auth, credentials, body.clone()));
            }
        }
        let created = runner
            .first_success(creations, log, |response| {
                if !response.is_success() {
                    return None;
                }
                wrapped_id(&response.json, &["customer", "data"])
            })
            .await;

        match created {
            Some(hit) => {
                tracing::info!(customer_id = %hit.value, "Created Booqable customer");
                CustomerRef {
                    id: Some(hit.value),
                    existing: false,
                    created: true,
                }
            }
            None => {
                tracing::warn!("No customer endpoint accepted, continuing with inline customer fields");
                CustomerRef::default()
            }
        }
    }
}
