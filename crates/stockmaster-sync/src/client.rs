//! # Remote Store Client
//!
//! JSON-over-HTTP client for the cloud backend. The backend exposes a single
//! endpoint and routes on an `?action=` query parameter:
//!
//! ```text
//! POST {base}?action=register        {email,password}            -> Account
//! POST {base}?action=login           {email,password}            -> Account
//! GET  {base}?action=getProducts&userId=...                      -> [Product]
//! POST {base}?action=addProduct      NewProduct + userId         -> Product
//! POST {base}?action=updateStock     {userId,productId,type,qty} -> {status,newStock}
//! GET  {base}?action=getTransactions&userId=...                  -> [StockTransaction]
//! GET  {base}?action=getSuppliers&userId=...                     -> [Supplier]
//! ```
//!
//! Error responses carry a JSON body with a `message` field; we surface it
//! when present and fall back to the HTTP status otherwise.
//!
//! The [`RemoteStore`] trait is the seam the ledger engine is written
//! against; tests substitute an in-process mock.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use stockmaster_core::{Account, MovementKind, NewProduct, Product, StockTransaction, Supplier};

use crate::error::{AuthError, SyncError, SyncResult};

// =============================================================================
// Trait Seam
// =============================================================================

/// Everything the rest of the system needs from the backend.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn register(&self, email: &str, password: &str) -> SyncResult<Account>;

    async fn login(&self, email: &str, password: &str) -> SyncResult<Account>;

    async fn get_products(&self, account_id: &str) -> SyncResult<Vec<Product>>;

    async fn add_product(&self, account_id: &str, product: &NewProduct) -> SyncResult<Product>;

    async fn update_stock(
        &self,
        account_id: &str,
        product_id: &str,
        kind: MovementKind,
        quantity: i64,
    ) -> SyncResult<UpdateStockResponse>;

    async fn get_transactions(&self, account_id: &str) -> SyncResult<Vec<StockTransaction>>;

    async fn get_suppliers(&self, account_id: &str) -> SyncResult<Vec<Supplier>>;
}

/// Acknowledgement of a remote stock update.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockResponse {
    pub status: String,
    pub new_stock: i64,
}

// =============================================================================
// Wire DTOs
// =============================================================================

#[derive(Debug, Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddProductBody<'a> {
    user_id: &'a str,
    #[serde(flatten)]
    product: &'a NewProduct,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStockBody<'a> {
    user_id: &'a str,
    product_id: &'a str,
    #[serde(rename = "type")]
    kind: MovementKind,
    quantity: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

// =============================================================================
// HTTP Implementation
// =============================================================================

/// [`RemoteStore`] over reqwest against the `?action=` endpoint.
#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        HttpRemoteStore {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        account_id: &str,
    ) -> SyncResult<T> {
        debug!(action, "Remote fetch");
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("action", action), ("userId", account_id)])
            .send()
            .await
            .map_err(unavailable)?;

        decode_ok(response, |status, message| SyncError::RemoteUnavailable {
            reason: message.unwrap_or_else(|| format!("HTTP {status}")),
        })
        .await
    }

    async fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        action: &str,
        body: &B,
        map_err: impl Fn(u16, Option<String>) -> SyncError,
    ) -> SyncResult<T> {
        debug!(action, "Remote write");
        let response = self
            .client
            .post(&self.base_url)
            .query(&[("action", action)])
            .json(body)
            .send()
            .await
            .map_err(unavailable)?;

        decode_ok(response, map_err).await
    }
}

fn unavailable(err: reqwest::Error) -> SyncError {
    SyncError::RemoteUnavailable {
        reason: err.to_string(),
    }
}

/// Decodes a 2xx body, or maps the failure status and server message.
async fn decode_ok<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    map_err: impl Fn(u16, Option<String>) -> SyncError,
) -> SyncResult<T> {
    let status = response.status();
    let text = response.text().await.map_err(unavailable)?;

    if status.is_success() {
        return Ok(serde_json::from_str(&text)?);
    }

    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.message);
    Err(map_err(status.as_u16(), message))
}

#[async_trait]
impl RemoteStore for HttpRemoteStore {
    async fn register(&self, email: &str, password: &str) -> SyncResult<Account> {
        self.post_json(
            "register",
            &CredentialsBody { email, password },
            |status, message| {
                SyncError::Auth(AuthError::RegistrationRejected {
                    message: message.unwrap_or_else(|| format!("HTTP {status}")),
                })
            },
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> SyncResult<Account> {
        self.post_json(
            "login",
            &CredentialsBody { email, password },
            |status, message| {
                if status == 401 {
                    SyncError::Auth(AuthError::InvalidCredentials)
                } else {
                    SyncError::RemoteUnavailable {
                        reason: message.unwrap_or_else(|| format!("HTTP {status}")),
                    }
                }
            },
        )
        .await
    }

    async fn get_products(&self, account_id: &str) -> SyncResult<Vec<Product>> {
        self.get_json("getProducts", account_id).await
    }

    async fn add_product(&self, account_id: &str, product: &NewProduct) -> SyncResult<Product> {
        self.post_json(
            "addProduct",
            &AddProductBody {
                user_id: account_id,
                product,
            },
            |status, message| SyncError::RemoteUnavailable {
                reason: message.unwrap_or_else(|| format!("HTTP {status}")),
            },
        )
        .await
    }

    async fn update_stock(
        &self,
        account_id: &str,
        product_id: &str,
        kind: MovementKind,
        quantity: i64,
    ) -> SyncResult<UpdateStockResponse> {
        self.post_json(
            "updateStock",
            &UpdateStockBody {
                user_id: account_id,
                product_id,
                kind,
                quantity,
            },
            |status, message| match status {
                404 => SyncError::NotFound {
                    entity: "product".into(),
                },
                400 => SyncError::BadRequest {
                    message: message.unwrap_or_else(|| "invalid stock update".into()),
                },
                _ => SyncError::RemoteUnavailable {
                    reason: message.unwrap_or_else(|| format!("HTTP {status}")),
                },
            },
        )
        .await
    }

    async fn get_transactions(&self, account_id: &str) -> SyncResult<Vec<StockTransaction>> {
        self.get_json("getTransactions", account_id).await
    }

    async fn get_suppliers(&self, account_id: &str) -> SyncResult<Vec<Supplier>> {
        self.get_json("getSuppliers", account_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_stock_body_wire_shape() {
        let body = UpdateStockBody {
            user_id: "u1",
            product_id: "p1",
            kind: MovementKind::Out,
            quantity: 3,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "userId": "u1",
                "productId": "p1",
                "type": "OUT",
                "quantity": 3
            })
        );
    }

    #[test]
    fn test_update_stock_response_decodes() {
        let ack: UpdateStockResponse =
            serde_json::from_str(r#"{"status":"ok","newStock":7}"#).unwrap();
        assert_eq!(ack.status, "ok");
        assert_eq!(ack.new_stock, 7);
    }

    #[test]
    fn test_error_body_message_is_optional() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());

        let body: ErrorBody = serde_json::from_str(r#"{"message":"email taken"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("email taken"));
    }
}
