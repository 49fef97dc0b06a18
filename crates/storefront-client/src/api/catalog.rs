//! Catalogue, reviews, and favourites

use storefront_common::{AppError, AppResult};
use storefront_core::{
    dto::validate, DomainError, Favorite, NewReview, Paginated, Product, ProductQuery, Review,
};
use storefront_session::ApiRequest;
use tracing::instrument;

use super::{with_body, StorefrontClient};

const PRODUCTS_PATH: &str = "/products/";
const FAVORITES_PATH: &str = "/favorites/";

fn product_path(id: u64) -> String {
    format!("{PRODUCTS_PATH}{id}/")
}

fn reviews_path(product_id: u64) -> String {
    format!("{PRODUCTS_PATH}{product_id}/reviews/")
}

/// Turn a 404 into the domain's "unknown product" error
fn product_not_found(id: u64) -> impl FnOnce(AppError) -> AppError {
    move |err| match err {
        AppError::NotFound(_) => DomainError::ProductNotFound(id).into(),
        other => other,
    }
}

impl StorefrontClient {
    /// One page of the catalogue
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> AppResult<Paginated<Product>> {
        self.public(ApiRequest::get(PRODUCTS_PATH).query_pairs(query.to_pairs()))
            .await
    }

    #[instrument(skip(self))]
    pub async fn product(&self, id: u64) -> AppResult<Product> {
        self.public(ApiRequest::get(product_path(id)))
            .await
            .map_err(product_not_found(id))
    }

    #[instrument(skip(self))]
    pub async fn reviews(&self, product_id: u64) -> AppResult<Vec<Review>> {
        self.public(ApiRequest::get(reviews_path(product_id)))
            .await
            .map_err(product_not_found(product_id))
    }

    /// Post a review as the signed-in user
    #[instrument(skip(self, review))]
    pub async fn add_review(&self, product_id: u64, review: &NewReview) -> AppResult<Review> {
        validate(review)?;
        self.guarded(with_body(ApiRequest::post(reviews_path(product_id)), review)?)
            .await
            .map_err(product_not_found(product_id))
    }

    #[instrument(skip(self))]
    pub async fn favorites(&self) -> AppResult<Vec<Favorite>> {
        self.guarded(ApiRequest::get(FAVORITES_PATH)).await
    }

    #[instrument(skip(self))]
    pub async fn add_favorite(&self, product_id: u64) -> AppResult<Favorite> {
        let body = serde_json::json!({ "product_id": product_id });
        self.guarded(with_body(ApiRequest::post(FAVORITES_PATH), &body)?)
            .await
            .map_err(product_not_found(product_id))
    }

    #[instrument(skip(self))]
    pub async fn remove_favorite(&self, product_id: u64) -> AppResult<()> {
        self.guarded_raw(ApiRequest::delete(format!("{FAVORITES_PATH}{product_id}/")))
            .await
            .map_err(product_not_found(product_id))?;
        Ok(())
    }
}
