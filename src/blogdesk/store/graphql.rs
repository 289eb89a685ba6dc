//! Blocking GraphQL client for the blog API.
//!
//! Requests without files go out as `application/json`. Requests carrying
//! files follow the GraphQL multipart request convention: an `operations`
//! part holding the JSON request with `null` in every file slot, a `map` part
//! naming the slot each file fills, and one part per file keyed by its map
//! entry.

use super::PostStore;
use crate::auth::BearerToken;
use crate::error::{BlogError, Result};
use crate::model::{LocalFile, NewPost, Post, PostEdit};
use reqwest::blocking::{multipart, Client, RequestBuilder};
use reqwest::header::AUTHORIZATION;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::time::Duration;

const POST_FIELDS: &str = "id\n    published\n    title\n    text\n    tags\n    attachments";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn posts_query() -> String {
    format!("query Posts {{\n  posts {{\n    {}\n  }}\n}}", POST_FIELDS)
}

pub fn create_post_mutation() -> String {
    format!(
        "mutation CreatePost($input: NewPost!) {{\n  createPost(input: $input) {{\n    {}\n  }}\n}}",
        POST_FIELDS
    )
}

pub fn edit_post_mutation() -> String {
    format!(
        "mutation EditPost($input: EditPost!) {{\n  editPost(input: $input) {{\n    {}\n  }}\n}}",
        POST_FIELDS
    )
}

pub fn delete_post_mutation() -> String {
    format!(
        "mutation DeletePost($input: DeletePost!) {{\n  deletePost(input: $input) {{\n    {}\n  }}\n}}",
        POST_FIELDS
    )
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(rename = "operationName")]
    pub operation_name: &'static str,
    pub variables: Value,
}

/// A file bound to the variable path it replaces, e.g. `variables.input.attachments.0`.
#[derive(Debug, Clone)]
pub struct Upload<'a> {
    pub slot: String,
    pub file: &'a LocalFile,
}

#[derive(Debug, Deserialize)]
struct GraphqlResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphqlErrorMessage>>,
}

#[derive(Debug, Deserialize)]
struct GraphqlErrorMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PostsData {
    posts: Option<Vec<Post>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreatePostData {
    create_post: Post,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EditPostData {
    edit_post: Post,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeletePostData {
    delete_post: Post,
}

/// Builds the `createPost` request; files become `null` slots under `attachments`.
pub fn create_post_request<'a>(post: &NewPost<'a>) -> (GraphqlRequest, Vec<Upload<'a>>) {
    let uploads: Vec<Upload<'a>> = post
        .attachments
        .iter()
        .copied()
        .enumerate()
        .map(|(i, file)| Upload {
            slot: format!("variables.input.attachments.{}", i),
            file,
        })
        .collect();

    let request = GraphqlRequest {
        query: create_post_mutation(),
        operation_name: "CreatePost",
        variables: json!({
            "input": {
                "title": post.title,
                "text": post.text,
                "tags": post.tags,
                "attachments": vec![Value::Null; uploads.len()],
            }
        }),
    };
    (request, uploads)
}

/// Builds the `editPost` request; new files become `null` slots under `newAttachments`.
pub fn edit_post_request<'a>(edit: &PostEdit<'a>) -> (GraphqlRequest, Vec<Upload<'a>>) {
    let uploads: Vec<Upload<'a>> = edit
        .new_attachments
        .iter()
        .copied()
        .enumerate()
        .map(|(i, file)| Upload {
            slot: format!("variables.input.newAttachments.{}", i),
            file,
        })
        .collect();

    let request = GraphqlRequest {
        query: edit_post_mutation(),
        operation_name: "EditPost",
        variables: json!({
            "input": {
                "id": edit.id,
                "published": edit.published,
                "title": edit.title,
                "text": edit.text,
                "tags": edit.tags,
                "unchangedAttachments": edit.unchanged_attachments,
                "newAttachments": vec![Value::Null; uploads.len()],
                "deletedAttachments": edit.deleted_attachments,
            }
        }),
    };
    (request, uploads)
}

pub fn delete_post_request(id: &str) -> GraphqlRequest {
    GraphqlRequest {
        query: delete_post_mutation(),
        operation_name: "DeletePost",
        variables: json!({ "input": { "id": id } }),
    }
}

/// The multipart `map` part: file key to the single slot it fills.
pub fn upload_map(uploads: &[Upload<'_>]) -> Value {
    let mut map = Map::new();
    for (i, upload) in uploads.iter().enumerate() {
        map.insert(i.to_string(), json!([upload.slot]));
    }
    Value::Object(map)
}

fn multipart_form(request: &GraphqlRequest, uploads: &[Upload<'_>]) -> Result<multipart::Form> {
    let mut form = multipart::Form::new()
        .text("operations", serde_json::to_string(request)?)
        .text("map", serde_json::to_string(&upload_map(uploads))?);

    for (i, upload) in uploads.iter().enumerate() {
        let part = multipart::Part::bytes(upload.file.bytes().to_vec())
            .file_name(upload.file.file_name().to_string())
            .mime_str(upload.file.content_type())?;
        form = form.part(i.to_string(), part);
    }
    Ok(form)
}

/// Turns an HTTP status and body into data or a [`BlogError`].
fn decode_response<T: DeserializeOwned>(status: StatusCode, body: &str) -> Result<T> {
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(BlogError::Unauthenticated);
    }

    let parsed: std::result::Result<GraphqlResponse<T>, _> = serde_json::from_str(body);
    match parsed {
        Ok(response) => {
            let errors = response.errors.unwrap_or_default();
            if !errors.is_empty() {
                return Err(BlogError::GraphQl(
                    errors.into_iter().map(|e| e.message).collect(),
                ));
            }
            if !status.is_success() {
                return Err(BlogError::HttpStatus(status.as_u16()));
            }
            response
                .data
                .ok_or_else(|| BlogError::Store("response carried no data".to_string()))
        }
        Err(_) if !status.is_success() => Err(BlogError::HttpStatus(status.as_u16())),
        Err(e) => Err(BlogError::Serialization(e)),
    }
}

pub struct GraphqlStore {
    client: Client,
    endpoint: String,
}

impl GraphqlStore {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("blogdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn execute<T: DeserializeOwned>(
        &self,
        request: &GraphqlRequest,
        uploads: &[Upload<'_>],
        token: Option<&BearerToken>,
    ) -> Result<T> {
        let mut builder: RequestBuilder = self.client.post(&self.endpoint);
        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, token.header_value());
        }

        builder = if uploads.is_empty() {
            builder.json(request)
        } else {
            builder.multipart(multipart_form(request, uploads)?)
        };

        tracing::debug!(
            operation = request.operation_name,
            uploads = uploads.len(),
            endpoint = %self.endpoint,
            "sending graphql request"
        );
        let response = builder.send()?;
        let status = response.status();
        let body = response.text()?;
        tracing::debug!(operation = request.operation_name, %status, "graphql response");
        decode_response(status, &body)
    }
}

impl PostStore for GraphqlStore {
    fn posts(&self, token: Option<&BearerToken>) -> Result<Vec<Post>> {
        let request = GraphqlRequest {
            query: posts_query(),
            operation_name: "Posts",
            variables: json!({}),
        };
        let data: PostsData = self.execute(&request, &[], token)?;
        Ok(data.posts.unwrap_or_default())
    }

    fn create_post(&mut self, post: &NewPost<'_>, token: &BearerToken) -> Result<Post> {
        let (request, uploads) = create_post_request(post);
        let data: CreatePostData = self.execute(&request, &uploads, Some(token))?;
        tracing::info!(id = %data.create_post.id, "post created");
        Ok(data.create_post)
    }

    fn edit_post(&mut self, edit: &PostEdit<'_>, token: &BearerToken) -> Result<Post> {
        let (request, uploads) = edit_post_request(edit);
        let data: EditPostData = self.execute(&request, &uploads, Some(token))?;
        tracing::info!(id = %data.edit_post.id, "post updated");
        Ok(data.edit_post)
    }

    fn delete_post(&mut self, id: &str, token: &BearerToken) -> Result<Post> {
        let request = delete_post_request(id);
        let data: DeletePostData = self.execute(&request, &[], Some(token))?;
        tracing::info!(id = %data.delete_post.id, "post deleted");
        Ok(data.delete_post)
    }
}
