//! HTTP implementation of the [`Api`] contract using reqwest.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::errors::ApiError;
use super::types::{
    FolderPayload, LoginPayload, LoginResponse, PermissionPayload, RegisterPayload, RemoteFolder,
    RemoteUser,
};
use super::Api;

/// Bearer-token-authenticated JSON client for the sherry service.
pub struct HttpApi {
    base: Url,
    client: Client,
}

impl HttpApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl {
            url: base_url.to_string(),
        })?;
        Ok(HttpApi {
            base,
            client: Client::new(),
        })
    }

    /// Join `route` onto the base URL path, keeping any base path prefix.
    fn url(&self, route: &str) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| ApiError::InvalidUrl {
                url: self.base.to_string(),
            })?;
            segments.pop_if_empty();
            for part in route.split('/').filter(|p| !p.is_empty()) {
                segments.push(part);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, route: &str, token: &str) -> Result<RequestBuilder, ApiError> {
        debug!(%method, route, "api request");
        let mut request = self.client.request(method, self.url(route)?);
        if !token.is_empty() {
            request = request.bearer_auth(token);
        }
        Ok(request)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send_raw(request).await?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            reason: e.to_string(),
        })
    }

    async fn send_unit(&self, request: RequestBuilder) -> Result<(), ApiError> {
        self.send_raw(request).await.map(|_| ())
    }

    async fn send_raw(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Network {
            reason: e.to_string(),
        })?;
        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Network {
            reason: e.to_string(),
        })?;
        if !is_success(status) {
            return Err(remote_error(status, &body));
        }
        Ok(body)
    }
}

fn is_success(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::OK | StatusCode::CREATED | StatusCode::NO_CONTENT
    )
}

/// Error envelope of the service: `message` is either one string or a list.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    Single { message: String },
    Many { message: Vec<String> },
}

fn remote_error(status: StatusCode, body: &str) -> ApiError {
    let messages = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope::Single { message }) => vec![message],
        Ok(ErrorEnvelope::Many { message }) => message,
        Err(_) if !body.is_empty() => vec![body.to_string()],
        Err(_) => vec![format!("Unsuccessful response code: {status}")],
    };
    ApiError::Remote {
        status: status.as_u16(),
        messages,
    }
}

#[async_trait]
impl Api for HttpApi {
    async fn register(&self, payload: &RegisterPayload) -> Result<RemoteUser, ApiError> {
        self.send(self.request(Method::POST, "auth/sign-up", "")?.json(payload))
            .await
    }

    async fn login(&self, payload: &LoginPayload) -> Result<LoginResponse, ApiError> {
        self.send(self.request(Method::POST, "auth/sign-in", "")?.json(payload))
            .await
    }

    async fn find_user(&self, username: &str, token: &str) -> Result<RemoteUser, ApiError> {
        self.send(
            self.request(Method::GET, "user/find", token)?
                .query(&[("username", username)]),
        )
        .await
    }

    async fn get_user(&self, user_id: &str, token: &str) -> Result<RemoteUser, ApiError> {
        self.send(self.request(Method::GET, &format!("user/{user_id}"), token)?)
            .await
    }

    async fn folder_create(
        &self,
        payload: &FolderPayload,
        token: &str,
    ) -> Result<RemoteFolder, ApiError> {
        self.send(self.request(Method::POST, "sherry", token)?.json(payload))
            .await
    }

    async fn folder_update(
        &self,
        folder_id: &str,
        payload: &FolderPayload,
        token: &str,
    ) -> Result<RemoteFolder, ApiError> {
        self.send(
            self.request(Method::PATCH, &format!("sherry/{folder_id}"), token)?
                .json(payload),
        )
        .await
    }

    async fn folder_get(&self, reference: &str, token: &str) -> Result<RemoteFolder, ApiError> {
        self.send(self.request(Method::GET, &format!("sherry/{reference}"), token)?)
            .await
    }

    async fn my_folders(&self, token: &str) -> Result<Vec<RemoteFolder>, ApiError> {
        self.send(self.request(Method::GET, "sherry/my", token)?).await
    }

    async fn available_folders(&self, token: &str) -> Result<Vec<RemoteFolder>, ApiError> {
        self.send(self.request(Method::GET, "sherry/available", token)?)
            .await
    }

    async fn set_permission(
        &self,
        folder_id: &str,
        user_id: &str,
        payload: &PermissionPayload,
        token: &str,
    ) -> Result<(), ApiError> {
        let route = format!("sherry/{folder_id}/users/{user_id}/permission");
        self.send_unit(self.request(Method::PATCH, &route, token)?.json(payload))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_join_keeps_base_path() {
        let api = HttpApi::new("https://api.example.com/v1").unwrap();
        assert_eq!(
            api.url("sherry/my").unwrap().as_str(),
            "https://api.example.com/v1/sherry/my"
        );
        let api = HttpApi::new("https://api.example.com/v1/").unwrap();
        assert_eq!(
            api.url("/sherry").unwrap().as_str(),
            "https://api.example.com/v1/sherry"
        );
    }

    #[test]
    fn error_envelope_single_and_many() {
        let single = remote_error(StatusCode::BAD_REQUEST, r#"{"message":"nope","statusCode":400}"#);
        assert_eq!(single.status(), Some(400));
        let ApiError::Remote { messages, .. } = single else {
            panic!("expected remote error");
        };
        assert_eq!(messages, vec!["nope"]);

        let many = remote_error(
            StatusCode::BAD_REQUEST,
            r#"{"message":["first","second"],"statusCode":400}"#,
        );
        let ApiError::Remote { messages, .. } = many else {
            panic!("expected remote error");
        };
        assert_eq!(messages, vec!["first", "second"]);
    }

    #[test]
    fn error_envelope_falls_back_to_raw_body() {
        let err = remote_error(StatusCode::INTERNAL_SERVER_ERROR, "boom");
        let ApiError::Remote { messages, .. } = err else {
            panic!("expected remote error");
        };
        assert_eq!(messages, vec!["boom"]);
    }
}
