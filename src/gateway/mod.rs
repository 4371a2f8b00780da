//! Resource data gateway.
//!
//! Maps the generic list/detail/edit operations of an admin dashboard onto
//! the backend's per-resource REST endpoints:
//!
//! | operation | request |
//! |---|---|
//! | `get_list` | `GET {base}/{path}?{filter}&sort&order&skip&limit` |
//! | `get_one` | `GET {base}/{path}/{id}` |
//! | `get_many` | `GET {base}/{path}/{id}` or `GET {base}/{path}?id=..&id=..` |
//! | `get_many_reference` | `GET {base}/{path}?{filter}&{target}=id&_sort&_order&_start&_end` |
//! | `create` | `POST {base}/{path}` |
//! | `update` | `PATCH {base}/{path}/{id}` |
//! | `update_many` | `PUT {base}/{path}/{id}` per id |
//! | `delete` | `DELETE {base}/{path}/{id}` |
//! | `delete_many` | `DELETE {base}/{path}/{id}` per id |
//!
//! The backend has no bulk update/delete route, so the `_many` writes fan out
//! into one request per id.

pub mod types;

use std::sync::Arc;

use futures::future::join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::error::GatewayError;
use crate::models::{Created, ItemsPage, RecordId, ResourceRecord};
use crate::query::{ListParams, QueryBuilder, QueryPairs, ReferenceParams};
use crate::resource::Resource;
use crate::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport};

pub use types::{CreateResult, IdsResult, ListResult, ManyResult, RecordResult};

pub struct DataGateway {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl DataGateway {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Result<Self, GatewayError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Url::parse(&base_url)?;
        Ok(Self { base_url, transport })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn get_list<R: ResourceRecord>(&self, params: &ListParams) -> Result<ListResult<R>, GatewayError> {
        let query = QueryBuilder::list_query(params)?;
        let url = self.collection_url(R::RESOURCE, Some(&query))?;
        tracing::debug!("getList {} -> {}", R::RESOURCE, url);

        let response = self.fetch(ApiRequest::get(url)).await?;
        decode_page(response.json)
    }

    pub async fn get_one<R: ResourceRecord>(&self, id: &RecordId) -> Result<RecordResult<R>, GatewayError> {
        let url = self.record_url(R::RESOURCE, id)?;
        tracing::debug!("getOne {} -> {}", R::RESOURCE, url);

        let response = self.fetch(ApiRequest::get(url)).await?;
        Ok(RecordResult { data: decode(response.json)? })
    }

    /// A single id goes to the record endpoint; anything else to the
    /// collection endpoint with one `id` parameter per id
    pub async fn get_many<R: ResourceRecord>(&self, ids: &[RecordId]) -> Result<ManyResult<R>, GatewayError> {
        if let [id] = ids {
            let url = self.record_url(R::RESOURCE, id)?;
            tracing::debug!("getMany {} -> {}", R::RESOURCE, url);
            let response = self.fetch(ApiRequest::get(url)).await?;
            return Ok(ManyResult { data: vec![decode(response.json)?] });
        }

        let url = self.collection_url(R::RESOURCE, Some(&QueryBuilder::ids_query(ids)))?;
        tracing::debug!("getMany {} -> {}", R::RESOURCE, url);

        let json = self.fetch(ApiRequest::get(url)).await?.json;
        let data = if json.is_array() {
            decode(json)?
        } else if json.get("items").is_some() {
            decode::<ItemsPage<R>>(json)?.items
        } else {
            return Err(GatewayError::InvalidResponse(format!(
                "expected a list of {} records, got {}",
                R::RESOURCE,
                json
            )));
        };
        Ok(ManyResult { data })
    }

    pub async fn get_many_reference<R: ResourceRecord>(
        &self,
        params: &ReferenceParams,
    ) -> Result<ListResult<R>, GatewayError> {
        let query = QueryBuilder::reference_query(params)?;
        let url = self.collection_url(R::RESOURCE, Some(&query))?;
        tracing::debug!("getManyReference {} -> {}", R::RESOURCE, url);

        let response = self.fetch(ApiRequest::get(url)).await?;
        decode_page(response.json)
    }

    /// The result echoes the submitted payload with the id the server
    /// assigned; the rest of the response body is not used
    pub async fn create<R: ResourceRecord>(&self, draft: R::Draft) -> Result<CreateResult<R::Draft>, GatewayError> {
        let body = R::create_body(&draft)?;
        let url = self.collection_url(R::RESOURCE, None)?;
        tracing::debug!("create {} -> {}", R::RESOURCE, url);

        let response = self.fetch(ApiRequest::new(Method::POST, url).with_body(body)).await?;
        let id = response_id(&response.json)?;
        Ok(CreateResult { data: Created { data: draft, id } })
    }

    pub async fn update<R: ResourceRecord>(
        &self,
        id: &RecordId,
        patch: &impl Serialize,
    ) -> Result<RecordResult<R>, GatewayError> {
        let url = self.record_url(R::RESOURCE, id)?;
        tracing::debug!("update {} -> {}", R::RESOURCE, url);

        let request = ApiRequest::new(Method::PATCH, url).with_body(RequestBody::json(patch)?);
        let response = self.fetch(request).await?;
        Ok(RecordResult { data: decode(response.json)? })
    }

    /// One PUT per id with the same body
    pub async fn update_many<R: ResourceRecord>(
        &self,
        ids: &[RecordId],
        patch: &impl Serialize,
    ) -> Result<IdsResult, GatewayError> {
        let body = RequestBody::json(patch)?;
        let requests = ids
            .iter()
            .map(|id| {
                let url = self.record_url(R::RESOURCE, id)?;
                Ok(ApiRequest::new(Method::PUT, url).with_body(body.clone()))
            })
            .collect::<Result<Vec<_>, GatewayError>>()?;
        tracing::debug!("updateMany {} ({} ids)", R::RESOURCE, ids.len());

        self.fan_out(requests).await
    }

    pub async fn delete<R: ResourceRecord>(&self, id: &RecordId) -> Result<RecordResult<R>, GatewayError> {
        let url = self.record_url(R::RESOURCE, id)?;
        tracing::debug!("delete {} -> {}", R::RESOURCE, url);

        let response = self.fetch(ApiRequest::new(Method::DELETE, url)).await?;
        Ok(RecordResult { data: decode(response.json)? })
    }

    /// One DELETE per id
    pub async fn delete_many<R: ResourceRecord>(&self, ids: &[RecordId]) -> Result<IdsResult, GatewayError> {
        let requests = ids
            .iter()
            .map(|id| Ok(ApiRequest::new(Method::DELETE, self.record_url(R::RESOURCE, id)?)))
            .collect::<Result<Vec<_>, GatewayError>>()?;
        tracing::debug!("deleteMany {} ({} ids)", R::RESOURCE, ids.len());

        self.fan_out(requests).await
    }

    /// Issue every request at once and wait for all of them. Any failure
    /// fails the whole call; the first failure in id order is reported.
    async fn fan_out(&self, requests: Vec<ApiRequest>) -> Result<IdsResult, GatewayError> {
        let responses = join_all(requests.into_iter().map(|request| self.fetch(request))).await;

        let mut ids = Vec::with_capacity(responses.len());
        for response in responses {
            ids.push(response_id(&response?.json)?);
        }
        Ok(IdsResult { data: ids })
    }

    async fn fetch(&self, request: ApiRequest) -> Result<ApiResponse, GatewayError> {
        self.transport.fetch_json(request).await
    }

    fn collection_url(&self, resource: Resource, query: Option<&QueryPairs>) -> Result<Url, GatewayError> {
        let mut url = Url::parse(&format!("{}/{}", self.base_url, resource.path()))?;
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.set_query(Some(&query.to_query_string()));
        }
        Ok(url)
    }

    fn record_url(&self, resource: Resource, id: &RecordId) -> Result<Url, GatewayError> {
        let mut url = self.collection_url(resource, None)?;
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidRequest(format!("Base URL cannot hold a path: {}", self.base_url)))?
            .pop_if_empty()
            .push(&id.to_string());
        Ok(url)
    }
}

fn decode<T: DeserializeOwned>(json: Value) -> Result<T, GatewayError> {
    Ok(serde_json::from_value(json)?)
}

fn decode_page<R: DeserializeOwned>(json: Value) -> Result<ListResult<R>, GatewayError> {
    let page: ItemsPage<R> = decode(json)?;
    let total = page
        .count
        .ok_or_else(|| GatewayError::InvalidResponse("list response has no count".to_string()))?;
    Ok(ListResult { data: page.items, total })
}

fn response_id(json: &Value) -> Result<RecordId, GatewayError> {
    let id = json
        .get("id")
        .ok_or_else(|| GatewayError::InvalidResponse(format!("response has no id: {}", json)))?;
    decode(id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attachment, AttachmentUpload, RawFile, User, UserDraft, UserPatch};
    use crate::query::{Pagination, Sort, SortDirection};
    use crate::testing::RecordingTransport;
    use serde_json::json;
    use std::time::Duration;

    fn gateway(transport: Arc<RecordingTransport>) -> DataGateway {
        DataGateway::new("http://backend.test/", transport).unwrap()
    }

    fn id_from_path(request: &ApiRequest) -> Value {
        let last = request.url.path_segments().unwrap().last().unwrap().to_string();
        json!(last.parse::<i64>().unwrap())
    }

    #[tokio::test]
    async fn test_get_list_builds_query_and_reads_page() {
        let transport = Arc::new(RecordingTransport::new(|_| {
            Ok(json!({"items": [{"id": 1, "username": "ann"}, {"id": 2, "username": "bob"}], "count": 37}))
        }));
        let gateway = gateway(transport.clone());

        let params = ListParams {
            pagination: Pagination::new(2, 10),
            sort: Sort::new("createdAt", SortDirection::Desc),
            filter: json!({"status": "active"}).as_object().cloned().unwrap(),
        };
        let result = gateway.get_list::<User>(&params).await.unwrap();

        assert_eq!(result.total, 37);
        assert_eq!(result.data.len(), 2);
        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::GET);
        assert_eq!(
            requests[0].url.as_str(),
            "http://backend.test/api/users/v1?status=active&sort=created_at&order=desc&skip=10&limit=10"
        );
    }

    #[tokio::test]
    async fn test_get_list_without_count_is_invalid() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"items": []}))));
        let err = gateway(transport).get_list::<User>(&ListParams::default()).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_get_one_uses_record_endpoint() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"id": "a/b", "name": "x.png"}))));
        let gateway = gateway(transport.clone());

        let result = gateway.get_one::<Attachment>(&RecordId::from("a/b")).await.unwrap();
        assert_eq!(result.data.name.as_deref(), Some("x.png"));
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "http://backend.test/api/storage/v1/attachments/a%2Fb"
        );
    }

    #[tokio::test]
    async fn test_get_many_single_id_shortcut() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"id": 5}))));
        let gateway = gateway(transport.clone());

        let result = gateway.get_many::<User>(&[RecordId::Int(5)]).await.unwrap();
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].id, RecordId::Int(5));
        assert_eq!(transport.requests()[0].url.as_str(), "http://backend.test/api/users/v1/5");
    }

    #[tokio::test]
    async fn test_get_many_repeats_id_parameter() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!([{"id": 1}, {"id": 2}, {"id": 3}]))));
        let gateway = gateway(transport.clone());

        let ids = [RecordId::Int(1), RecordId::Int(2), RecordId::Int(3)];
        let result = gateway.get_many::<User>(&ids).await.unwrap();
        assert_eq!(result.data.len(), 3);
        assert_eq!(
            transport.requests()[0].url.as_str(),
            "http://backend.test/api/users/v1?id=1&id=2&id=3"
        );
    }

    #[tokio::test]
    async fn test_get_many_accepts_paged_body() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"items": [{"id": 1}, {"id": 2}], "count": 2}))));
        let result = gateway(transport)
            .get_many::<User>(&[RecordId::Int(1), RecordId::Int(2)])
            .await
            .unwrap();
        assert_eq!(result.data.len(), 2);
    }

    #[tokio::test]
    async fn test_get_many_reference() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"items": [{"id": 9}], "count": 1}))));
        let gateway = gateway(transport.clone());

        let params = ReferenceParams {
            target: "ownerId".to_string(),
            id: RecordId::Int(4),
            pagination: Pagination::new(1, 25),
            sort: Sort::new("createdAt", SortDirection::Desc),
            filter: Default::default(),
        };
        let result = gateway.get_many_reference::<Attachment>(&params).await.unwrap();
        assert_eq!(result.total, 1);
        assert_eq!(
            transport.requests()[0].url.query(),
            Some("ownerId=4&_sort=createdAt&_order=DESC&_start=0&_end=25")
        );
    }

    #[tokio::test]
    async fn test_create_json_resource() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"id": 77, "extra": "ignored"}))));
        let gateway = gateway(transport.clone());

        let draft = UserDraft {
            firstname: "Ann".to_string(),
            lastname: "Lee".to_string(),
            email: "ann@example.com".to_string(),
            password: "pw".to_string(),
        };
        let result = gateway.create::<User>(draft).await.unwrap();
        assert_eq!(result.data.id, RecordId::Int(77));
        assert_eq!(result.data.data.email, "ann@example.com");

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url.as_str(), "http://backend.test/api/users/v1");
        match &request.body {
            RequestBody::Json(body) => assert_eq!(
                body,
                &json!({"firstname": "Ann", "lastname": "Lee", "email": "ann@example.com", "password": "pw"})
            ),
            other => panic!("expected JSON body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_attachment_is_multipart() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"id": "f1", "uri": "/files/f1"}))));
        let gateway = gateway(transport.clone());

        let upload = AttachmentUpload::new(RawFile::new("cv.pdf", b"%PDF".to_vec()));
        let result = gateway.create::<Attachment>(upload).await.unwrap();
        assert_eq!(result.data.id, RecordId::from("f1"));
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["data"]["attachments"]["rawFile"]["name"], json!("cv.pdf"));
        assert!(value["data"].get("uri").is_none());

        match &transport.requests()[0].body {
            RequestBody::Multipart(parts) => {
                assert_eq!(parts.len(), 1);
                assert_eq!(parts[0].field, "attachment");
                assert_eq!(parts[0].bytes, b"%PDF".to_vec());
            }
            other => panic!("expected multipart body, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_without_returned_id_fails() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"ok": true}))));
        let upload = AttachmentUpload::new(RawFile::new("a.txt", vec![]));
        let err = gateway(transport).create::<Attachment>(upload).await.unwrap_err();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_update_patches_record() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"id": 3, "username": "carol"}))));
        let gateway = gateway(transport.clone());

        let patch = UserPatch {
            username: Some("carol".to_string()),
            ..Default::default()
        };
        let result = gateway.update::<User>(&RecordId::Int(3), &patch).await.unwrap();
        assert_eq!(result.data.username.as_deref(), Some("carol"));

        let request = &transport.requests()[0];
        assert_eq!(request.method, Method::PATCH);
        assert_eq!(request.url.path(), "/api/users/v1/3");
    }

    #[tokio::test]
    async fn test_update_many_fans_out_concurrently() {
        // Every request waits until all three are in flight
        let transport = Arc::new(RecordingTransport::new(|req| Ok(json!({"id": id_from_path(req)}))).with_barrier(3));
        let gateway = gateway(transport.clone());

        let ids = [RecordId::Int(1), RecordId::Int(2), RecordId::Int(3)];
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            gateway.update_many::<User>(&ids, &json!({"status": "blocked"})),
        )
        .await
        .expect("fan-out requests were not issued concurrently")
        .unwrap();

        assert_eq!(result.data, ids.to_vec());
        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.method == Method::PUT));
        assert!(requests.iter().all(|r| matches!(&r.body, RequestBody::Json(b) if b == &json!({"status": "blocked"}))));
    }

    #[tokio::test]
    async fn test_delete_many_fails_as_a_whole() {
        let transport = Arc::new(RecordingTransport::new(|req| {
            if req.url.path().ends_with("/2") {
                Err(GatewayError::http(500, "boom"))
            } else {
                Ok(json!({"id": id_from_path(req)}))
            }
        }));
        let gateway = gateway(transport.clone());

        let ids = [RecordId::Int(1), RecordId::Int(2), RecordId::Int(3)];
        let err = gateway.delete_many::<User>(&ids).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
        // every request still ran to completion
        assert_eq!(transport.requests().len(), 3);
        assert!(transport.requests().iter().all(|r| r.method == Method::DELETE));
    }

    #[tokio::test]
    async fn test_delete_returns_body() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(json!({"id": 8, "username": "gone"}))));
        let gateway = gateway(transport.clone());

        let result = gateway.delete::<User>(&RecordId::Int(8)).await.unwrap();
        assert_eq!(result.data.username.as_deref(), Some("gone"));
        assert_eq!(transport.requests()[0].method, Method::DELETE);
    }

    #[tokio::test]
    async fn test_http_errors_propagate_untouched() {
        let transport = Arc::new(RecordingTransport::new(|_| Err(GatewayError::http(404, r#"{"message":"not found"}"#))));
        let err = gateway(transport).get_one::<User>(&RecordId::Int(1)).await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.message().as_deref(), Some("not found"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let transport = Arc::new(RecordingTransport::new(|_| Ok(Value::Null)));
        assert!(DataGateway::new("not a url", transport).is_err());
    }
}
