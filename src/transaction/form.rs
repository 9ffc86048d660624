//! The request body for creating and updating transactions and its validation.

use serde::Deserialize;

use crate::{
    Error,
    transaction::{NewTransaction, TransactionDateTime, TransactionUpdate},
};

/// A price sent by a client, either as a JSON number or as text such as "-500".
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    /// A JSON number.
    Number(f64),
    /// A string holding a number.
    Text(String),
}

/// The body of a create or update transaction request.
///
/// All fields are optional here so that a missing field is reported as
/// [Error::MissingFields] rather than as a JSON parse error.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TransactionForm {
    /// A short name for the transaction.
    #[serde(default)]
    pub name: Option<String>,
    /// Free text detailing the transaction.
    #[serde(default)]
    pub description: Option<String>,
    /// When the transaction happened, e.g. "2024-01-01T15:45".
    #[serde(default)]
    pub datetime: Option<String>,
    /// The signed value of the transaction.
    #[serde(default)]
    pub price: Option<PriceInput>,
}

impl TransactionForm {
    /// Validate the form for creating a transaction.
    ///
    /// A missing description becomes the empty string.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingFields] if the name, datetime or price is
    /// missing or empty, or [Error::InvalidField] if the datetime or price
    /// cannot be parsed.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let update = self.validate_update()?;

        Ok(NewTransaction {
            name: update.name,
            description: update.description.unwrap_or_default(),
            datetime: update.datetime,
            price: update.price,
        })
    }

    /// Validate the form for updating a transaction.
    ///
    /// A missing description is kept as `None` so the stored one is kept.
    ///
    /// # Errors
    ///
    /// See [TransactionForm::validate].
    pub fn validate_update(self) -> Result<TransactionUpdate, Error> {
        let name = self.name.filter(|name| !name.trim().is_empty());
        let datetime = self.datetime.filter(|datetime| !datetime.trim().is_empty());
        let price = self.price.filter(|price| match price {
            PriceInput::Number(_) => true,
            PriceInput::Text(text) => !text.trim().is_empty(),
        });

        let (Some(name), Some(datetime), Some(price)) = (name, datetime, price) else {
            return Err(Error::MissingFields);
        };

        Ok(TransactionUpdate {
            name,
            description: self.description,
            datetime: TransactionDateTime::parse(&datetime)?,
            price: parse_price(&price)?,
        })
    }
}

fn parse_price(price: &PriceInput) -> Result<f64, Error> {
    let value = match price {
        PriceInput::Number(number) => Some(*number),
        PriceInput::Text(text) => text.trim().parse::<f64>().ok(),
    };

    match value {
        Some(value) if value.is_finite() => Ok(value),
        _ => Err(Error::InvalidField(format!(
            "Invalid price {price:?}, expected a number like -500"
        ))),
    }
}
