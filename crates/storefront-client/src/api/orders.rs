//! Checkout and order history

use storefront_common::{AppError, AppResult};
use storefront_core::{dto::validate, Checkout, DomainError, Order, Paginated};
use storefront_session::ApiRequest;
use tracing::instrument;

use super::{with_body, StorefrontClient};

const ORDERS_PATH: &str = "/orders/";

impl StorefrontClient {
    /// The signed-in user's orders, newest first
    #[instrument(skip(self))]
    pub async fn orders(&self, page: u32) -> AppResult<Paginated<Order>> {
        self.guarded(ApiRequest::get(ORDERS_PATH).query("page", page.max(1)))
            .await
    }

    #[instrument(skip(self))]
    pub async fn order(&self, id: u64) -> AppResult<Order> {
        self.guarded(ApiRequest::get(format!("{ORDERS_PATH}{id}/")))
            .await
            .map_err(|err| match err {
                AppError::NotFound(_) => DomainError::OrderNotFound(id).into(),
                other => other,
            })
    }

    /// Submit the cart
    #[instrument(skip_all, fields(items = checkout.items.len()))]
    pub async fn place_order(&self, checkout: &Checkout) -> AppResult<Order> {
        if checkout.items.is_empty() {
            return Err(DomainError::EmptyCart.into());
        }
        validate(checkout)?;

        let order: Order = self
            .guarded(with_body(ApiRequest::post(ORDERS_PATH), checkout)?)
            .await?;
        tracing::info!(order_id = order.id, total_cents = order.total_cents(), "Order placed");
        Ok(order)
    }
}
