use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::DatabaseError;

/// Fluent query against one table, in the PostgREST dialect.
///
/// Filters become `column=eq.value` query parameters; writes ask for
/// `return=representation` so the affected row comes back in one round trip.
pub struct TableQuery {
    http: reqwest::Client,
    url: String,
    key: String,
    filters: Vec<(String, String)>,
    order: Option<String>,
    limit: Option<u32>,
}

impl TableQuery {
    pub(crate) fn new(http: reqwest::Client, rest_url: &str, table: &str, key: String) -> Self {
        Self {
            http,
            url: format!("{rest_url}/{table}"),
            key,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_owned(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.order = Some(format!("{column}.{direction}"));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    fn request(&self, method: Method) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, &self.url)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
            .query(&[("select", "*")])
            .query(&self.filters);
        if let Some(order) = &self.order {
            builder = builder.query(&[("order", order)]);
        }
        if let Some(limit) = self.limit {
            builder = builder.query(&[("limit", limit.to_string())]);
        }
        builder
    }

    async fn check(response: Response) -> Result<Response, DatabaseError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(DatabaseError::Api {
            status: status.as_u16(),
            message,
        })
    }

    pub async fn select_all(self) -> Result<Vec<Value>, DatabaseError> {
        let response = Self::check(self.request(Method::GET).send().await?).await?;
        Ok(response.json().await?)
    }

    pub async fn select_optional(self) -> Result<Option<Value>, DatabaseError> {
        let rows = self.limit(1).select_all().await?;
        Ok(rows.into_iter().next())
    }

    pub async fn select_one(self) -> Result<Value, DatabaseError> {
        self.select_optional().await?.ok_or(DatabaseError::NotFound)
    }

    pub async fn insert(self, row: Value) -> Result<Value, DatabaseError> {
        let response = Self::check(
            self.request(Method::POST)
                .header("Prefer", "return=representation")
                .json(&row)
                .send()
                .await?,
        )
        .await?;
        let mut rows: Vec<Value> = response.json().await?;
        if rows.is_empty() {
            return Err(DatabaseError::NotFound);
        }
        Ok(rows.remove(0))
    }

    pub async fn update(self, fields: Value) -> Result<Value, DatabaseError> {
        let response = Self::check(
            self.request(Method::PATCH)
                .header("Prefer", "return=representation")
                .json(&fields)
                .send()
                .await?,
        )
        .await?;
        let mut rows: Vec<Value> = response.json().await?;
        if rows.is_empty() {
            return Err(DatabaseError::NotFound);
        }
        Ok(rows.remove(0))
    }

    pub async fn delete(self) -> Result<(), DatabaseError> {
        Self::check(self.request(Method::DELETE).send().await?).await?;
        Ok(())
    }

    /// Exact row count via a HEAD request; the total rides in Content-Range.
    pub async fn count(self) -> Result<i64, DatabaseError> {
        let response = Self::check(
            self.request(Method::HEAD)
                .header("Prefer", "count=exact")
                .send()
                .await?,
        )
        .await?;
        let total = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(|range| range.rsplit('/').next())
            .and_then(|total| total.parse().ok())
            .ok_or(DatabaseError::Api {
                status: StatusCode::OK.as_u16(),
                message: "missing count in Content-Range".to_owned(),
            })?;
        Ok(total)
    }
}
