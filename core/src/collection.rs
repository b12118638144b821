//! Paged collection of property listings.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ClientError;
use crate::http::ApiResponse;
use crate::property::Property;

/// One page of search results.
///
/// `rows.len() == count` holds for every collection built by `parse`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    /// Matches across all pages.
    pub total: u64,
    /// Rows in this page.
    pub count: u64,
    pub previous: Option<String>,
    pub next: Option<String>,
    pub rows: Vec<Property>,
}

/// Wire form of the collection envelope.
#[derive(Debug, Deserialize)]
struct Envelope {
    total: u64,
    count: u64,
    #[serde(default)]
    previous: Option<String>,
    #[serde(default)]
    next: Option<String>,
    rows: Vec<Map<String, Value>>,
}

impl Collection {
    /// Build from a search response.
    ///
    /// A response that is not `OK`, or has empty content, is a soft miss and
    /// yields an empty collection. An `OK` envelope that is missing fields or
    /// whose `count` disagrees with its rows is malformed.
    pub fn parse(response: &ApiResponse) -> Result<Self, ClientError> {
        let Some(content) = response.matched_content() else {
            tracing::debug!(
                status = response.status_code,
                reason = %response.reason_phrase,
                "no collection in response"
            );
            return Ok(Self::default());
        };

        let envelope = Envelope::deserialize(content)?;
        if envelope.rows.len() as u64 != envelope.count {
            return Err(ClientError::MalformedResponse(format!(
                "envelope count {} does not match {} rows",
                envelope.count,
                envelope.rows.len()
            )));
        }

        let rows = envelope
            .rows
            .iter()
            .map(Property::from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            total: envelope.total,
            count: envelope.count,
            previous: envelope.previous,
            next: envelope.next,
            rows,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Property> {
        self.rows.iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Property;
    type IntoIter = std::slice::Iter<'a, Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl IntoIterator for Collection {
    type Item = Property;
    type IntoIter = std::vec::IntoIter<Property>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}
