//! Recursive resource expansion for Unisphere
//!
//! Unisphere listings only carry identifiers. Each identifier is fetched again
//! to obtain the full record. Volume listings are paginated through a
//! server-side iterator once they exceed `maxPageSize`.

use crate::error::{Error, Result};
use crate::pagination::plan;
use crate::types::{JsonValue, RawResource};
use async_trait::async_trait;
use tracing::{debug, warn};

/// Query selecting thin devices and hiding meta members
pub const VOLUME_FILTER: &str = "meta_member=false&tdev=true";

/// Anything that answers a relative GET with a JSON document
#[async_trait]
pub trait ResourceSource: Send + Sync {
    /// Fetch and decode `path`
    async fn fetch(&self, path: &str) -> Result<JsonValue>;
}

/// List `listing`, then fetch `{listing}/{id}` for every id under `list_key`
/// and keep `detail_key[0]` of each answer.
///
/// A listing answered with a `message` key has no data and yields nothing.
pub async fn expand_listing<S>(
    source: &S,
    listing: &str,
    list_key: &str,
    detail_key: &str,
) -> Result<Vec<RawResource>>
where
    S: ResourceSource + ?Sized,
{
    let body = source.fetch(listing).await?;

    if let Some(message) = body.get("message") {
        debug!("No data under {listing}: {message}");
        return Ok(Vec::new());
    }

    let ids = body
        .get(list_key)
        .and_then(JsonValue::as_array)
        .ok_or_else(|| Error::malformed(format!("'{list_key}' list missing from {listing}")))?
        .iter()
        .map(id_text)
        .collect::<Result<Vec<_>>>()?;

    fetch_details(source, listing, &ids, detail_key).await
}

/// Fetch `{listing}/{id}` for each id, in order, keeping `detail_key[0]`.
///
/// An answer without `detail_key[0]` is logged and skipped.
pub async fn fetch_details<S>(
    source: &S,
    listing: &str,
    ids: &[String],
    detail_key: &str,
) -> Result<Vec<RawResource>>
where
    S: ResourceSource + ?Sized,
{
    let mut records = Vec::with_capacity(ids.len());

    for id in ids {
        let path = format!("{listing}/{id}");
        let body = source.fetch(&path).await?;

        match body.get(detail_key).and_then(|v| v.get(0)) {
            Some(record) => records.push(record.clone()),
            None => warn!("No '{detail_key}' record in {path}, skipped"),
        }
    }

    Ok(records)
}

/// Identifiers of every thin device under `volumes` (the volume listing path)
pub async fn volume_ids<S>(source: &S, volumes: &str) -> Result<Vec<String>>
where
    S: ResourceSource + ?Sized,
{
    let request = format!("{volumes}?{VOLUME_FILTER}");
    let body = source.fetch(&request).await?;

    if body.get("message").is_some() {
        return Ok(Vec::new());
    }

    let count = required_u64(&body, "count", &request)?;
    if count == 0 {
        return Ok(Vec::new());
    }
    let page_size = required_u64(&body, "maxPageSize", &request)?;

    if count <= page_size {
        let result = body
            .get("resultList")
            .and_then(|list| list.get("result"))
            .ok_or_else(|| Error::malformed(format!("'resultList.result' missing from {request}")))?;
        return collect_volume_ids(result, &request);
    }

    let iterator = body
        .get("id")
        .and_then(JsonValue::as_str)
        .ok_or_else(|| Error::malformed(format!("iterator id missing from {request}")))?;

    // `count` comes from the array: grow as pages arrive
    let mut ids = Vec::new();
    for window in plan(1, count, page_size)? {
        let page = format!("common/Iterator/{iterator}/page?{}", window.query());
        let body = source.fetch(&page).await?;
        let result = body
            .get("result")
            .ok_or_else(|| Error::malformed(format!("'result' missing from {page}")))?;
        let page_ids = collect_volume_ids(result, &page)?;
        if page_ids.is_empty() {
            warn!("Iterator {iterator} exhausted at {window:?}, {count} announced");
            break;
        }
        ids.extend(page_ids);
    }

    debug!("{} volume id(s) collected under {volumes}", ids.len());
    Ok(ids)
}

/// Every thin device under `volumes`, fully described
pub async fn expand_volumes<S>(source: &S, volumes: &str) -> Result<Vec<RawResource>>
where
    S: ResourceSource + ?Sized,
{
    let ids = volume_ids(source, volumes).await?;
    fetch_details(source, volumes, &ids, "volume").await
}

fn collect_volume_ids(result: &JsonValue, origin: &str) -> Result<Vec<String>> {
    result
        .as_array()
        .ok_or_else(|| Error::malformed(format!("result of {origin} is not a list")))?
        .iter()
        .map(|entry| {
            entry
                .get("volumeId")
                .ok_or_else(|| Error::malformed(format!("volumeId missing in {origin}")))
                .and_then(id_text)
        })
        .collect()
}

fn required_u64(body: &JsonValue, key: &str, origin: &str) -> Result<u64> {
    body.get(key)
        .and_then(JsonValue::as_u64)
        .ok_or_else(|| Error::malformed(format!("'{key}' missing from {origin}")))
}

fn id_text(value: &JsonValue) -> Result<String> {
    match value {
        JsonValue::String(s) => Ok(s.clone()),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(Error::malformed(format!("unexpected identifier {other}"))),
    }
}
