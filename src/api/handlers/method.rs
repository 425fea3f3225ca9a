/*
 * Responsibility
 * - /method/... のサンプル endpoint
 * - 権限チェックは policy ステージで済んでいる (handler は Identity を受け取るだけ)
 */
use tracing::debug;

use crate::api::extractors::CurrentIdentity;

pub async fn call_get(CurrentIdentity(identity): CurrentIdentity) -> &'static str {
    debug!(subject = identity.subject(), "GET /method/get");
    "Method Called With GET"
}

pub async fn call_post(CurrentIdentity(identity): CurrentIdentity) -> &'static str {
    debug!(subject = identity.subject(), "POST /method/post");
    "Method Called With POST"
}

pub async fn call_put(CurrentIdentity(identity): CurrentIdentity) -> &'static str {
    debug!(subject = identity.subject(), "PUT /method/put");
    "Method Called With PUT"
}

pub async fn call_delete(CurrentIdentity(identity): CurrentIdentity) -> &'static str {
    debug!(subject = identity.subject(), "DELETE /method/delete");
    "Method Called With DELETE"
}
