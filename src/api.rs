//! The client for the remote sales API.
//!
//! The API returns the full list of sales as a JSON array and accepts two
//! query parameters, `regiao` and `ano`, which are always sent and left empty
//! when unfiltered. The seller filter is not understood by the API and is
//! applied locally after fetching.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer};
use time::{Date, macros::format_description};

use crate::{Error, filters::FilterSelection};

/// One sale record as returned by the sales API.
///
/// Field names in the JSON are Portuguese display names. A few of them have
/// appeared with two capitalizations over time, so those accept either.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Sale {
    /// The product name.
    #[serde(rename = "Produto")]
    pub produto: String,
    /// The product category.
    #[serde(rename = "Categoria do Produto")]
    pub categoria: String,
    /// The sale price in BRL.
    #[serde(rename = "Preço")]
    pub preco: f64,
    /// The purchase date, serialized as dd/mm/yyyy.
    #[serde(rename = "Data da Compra", deserialize_with = "deserialize_data_compra")]
    pub data_compra: Date,
    /// The seller's name.
    #[serde(rename = "Vendedor")]
    pub vendedor: String,
    /// The Brazilian state where the purchase was made.
    #[serde(rename = "Local da compra", alias = "Local da Compra")]
    pub local_compra: String,
    /// The buyer's rating, 1 to 5.
    #[serde(rename = "Avaliação da compra", alias = "Avaliação da Compra")]
    pub avaliacao: u8,
    /// The payment method.
    #[serde(rename = "Tipo de pagamento", alias = "Tipo de Pagamento")]
    pub tipo_pagamento: String,
    /// How many units were sold.
    #[serde(rename = "Quantidade de produto", alias = "Quantidade de Produto")]
    pub quantidade: u32,
    /// The latitude of the state, repeated on every record for that state.
    pub lat: f64,
    /// The longitude of the state.
    pub lon: f64,
}

fn deserialize_data_compra<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    let format = format_description!("[day]/[month]/[year]");

    Date::parse(&text, &format).map_err(serde::de::Error::custom)
}

/// A handle to the remote sales API.
#[derive(Debug, Clone)]
pub struct SalesApi {
    client: reqwest::Client,
    base_url: String,
}

impl SalesApi {
    /// Create an API handle that requests sales from `base_url`.
    pub fn new(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.to_owned(),
        }
    }

    /// Fetch the sales matching the region and year filters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ApiRequest`] if the request could not be sent,
    /// [`Error::ApiStatus`] on a non-success status and
    /// [`Error::InvalidResponse`] if the body is not a valid sales array.
    pub async fn fetch_sales(&self, filters: &FilterSelection) -> Result<Vec<Sale>, Error> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&filters.query_params())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::ApiStatus(status.as_u16()));
        }

        Ok(response.json().await?)
    }
}

/// Keep only the sales made by one of `vendedores`.
///
/// An empty selection means no filter and returns the sales unchanged.
pub fn apply_seller_filter(sales: Vec<Sale>, vendedores: &[String]) -> Vec<Sale> {
    if vendedores.is_empty() {
        return sales;
    }

    sales
        .into_iter()
        .filter(|sale| vendedores.contains(&sale.vendedor))
        .collect()
}

/// The distinct seller names in `sales`, sorted alphabetically.
pub fn unique_sellers(sales: &[Sale]) -> Vec<String> {
    sales
        .iter()
        .map(|sale| sale.vendedor.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
