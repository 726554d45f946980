//! DynamoDB [`RecordStore`] implementation.
//!
//! Table schema: partition key `id` (String), plus `title` and `bookmark`
//! string attributes.

use std::collections::HashMap;
use std::future::Future;

use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use bookmark_core::contract::BookmarkRecord;

use crate::adapters::record_store::{RecordStore, StoreError, StoreOperation};

pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone)]
pub struct DynamoRecordStore {
    table_name: String,
    client: aws_sdk_dynamodb::Client,
}

impl DynamoRecordStore {
    /// An empty `table_name` is accepted; the store rejects it at call time.
    pub fn new(client: aws_sdk_dynamodb::Client, table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            client,
        }
    }
}

impl RecordStore for DynamoRecordStore {
    fn put_record(&self, record: &BookmarkRecord) -> Result<(), StoreError> {
        let table_name = self.table_name.clone();
        let item = record_to_item(record);
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .put_item()
                    .table_name(table_name)
                    .set_item(Some(item))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        StoreError::request(
                            StoreOperation::Put,
                            DisplayErrorContext(&error).to_string(),
                        )
                    })
            })
        })
    }

    fn delete_record(&self, id: &str) -> Result<(), StoreError> {
        let table_name = self.table_name.clone();
        let key = id.to_string();
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .delete_item()
                    .table_name(table_name)
                    .key("id", AttributeValue::S(key))
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        StoreError::request(
                            StoreOperation::Delete,
                            DisplayErrorContext(&error).to_string(),
                        )
                    })
            })
        })
    }

    fn scan_records(&self) -> Result<Vec<BookmarkRecord>, StoreError> {
        let table_name = self.table_name.clone();
        let client = self.client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(collect_pages(|start_key| {
                let request = client
                    .scan()
                    .table_name(&table_name)
                    .set_exclusive_start_key(start_key);
                async move {
                    let output = request.send().await.map_err(|error| {
                        StoreError::request(
                            StoreOperation::Scan,
                            DisplayErrorContext(&error).to_string(),
                        )
                    })?;
                    Ok(ScanPage {
                        items: output.items.unwrap_or_default(),
                        last_evaluated_key: output.last_evaluated_key,
                    })
                }
            }))
        })
    }
}

/// One `Scan` response, reduced to what pagination needs.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub items: Vec<Item>,
    pub last_evaluated_key: Option<Item>,
}

/// Start key for the next page, or `None` once the table is exhausted.
pub fn next_start_key(page: &ScanPage) -> Option<Item> {
    page.last_evaluated_key.as_ref().filter(|key| !key.is_empty()).cloned()
}

/// Requests pages until the store stops returning a start key, decoding
/// every item along the way.
pub async fn collect_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<BookmarkRecord>, StoreError>
where
    F: FnMut(Option<Item>) -> Fut,
    Fut: Future<Output = Result<ScanPage, StoreError>>,
{
    let mut records = Vec::new();
    let mut start_key = None;

    loop {
        let page = fetch_page(start_key).await?;
        for item in &page.items {
            records.push(record_from_item(item)?);
        }

        start_key = next_start_key(&page);
        if start_key.is_none() {
            return Ok(records);
        }
    }
}

pub fn record_to_item(record: &BookmarkRecord) -> Item {
    HashMap::from([
        ("id".to_string(), AttributeValue::S(record.id.clone())),
        ("title".to_string(), AttributeValue::S(record.title.clone())),
        (
            "bookmark".to_string(),
            AttributeValue::S(record.bookmark.clone()),
        ),
    ])
}

pub fn record_from_item(item: &Item) -> Result<BookmarkRecord, StoreError> {
    Ok(BookmarkRecord {
        id: string_attribute(item, "id")?,
        title: string_attribute(item, "title")?,
        bookmark: string_attribute(item, "bookmark")?,
    })
}

fn string_attribute(item: &Item, name: &str) -> Result<String, StoreError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(StoreError::Decode {
            message: format!("attribute `{name}` is not a string"),
        }),
        None => Err(StoreError::Decode {
            message: format!("attribute `{name}` is missing"),
        }),
    }
}
