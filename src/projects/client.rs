use std::{sync::LazyLock, time::Duration};

use http::header::CONTENT_TYPE;
use reqwest::{Client, Response, Url};

use super::{listing_or_empty, MediaUpload, NewProject, Project, ProjectError};
use crate::config::ApiConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub static PROJECTS_CLIENT: LazyLock<ProjectsClient> =
    LazyLock::new(|| ProjectsClient::new(&ApiConfig::from_env()));

impl From<reqwest::Error> for ProjectError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// Talks to the projects backend.
#[derive(Debug, Clone)]
pub struct ProjectsClient {
    http: Client,
    config: ApiConfig,
}

impl ProjectsClient {
    pub fn new(config: &ApiConfig) -> Self {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!("falling back to default HTTP client: {e}");
                Client::new()
            });
        Self {
            http,
            config: config.clone(),
        }
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Project>, ProjectError> {
        let res = self
            .http
            .get(self.config.endpoint("projects"))
            .send()
            .await?;
        let projects = check(res).await?.json::<Vec<Project>>().await?;
        tracing::debug!(count = projects.len(), "listed projects");
        Ok(projects)
    }

    /// Like [`ProjectsClient::list`], but failures yield an empty list.
    pub async fn list_or_empty(&self) -> Vec<Project> {
        listing_or_empty(self.list().await)
    }

    #[tracing::instrument(skip(self, project), fields(title = %project.title))]
    pub async fn add(&self, project: &NewProject) -> Result<(), ProjectError> {
        let project = project.normalized();
        project.validate()?;
        let res = self
            .http
            .post(self.config.endpoint("projects"))
            .json(&project)
            .send()
            .await?;
        check(res).await?;
        tracing::info!("project added");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ProjectError> {
        let res = self
            .http
            .delete(self.project_url(id)?)
            .send()
            .await?;
        check(res).await?;
        tracing::info!("project deleted");
        Ok(())
    }

    // the id goes in as a single, percent-encoded path segment
    fn project_url(&self, id: &str) -> Result<Url, ProjectError> {
        let mut url = Url::parse(&self.config.endpoint("projects"))
            .map_err(|e| ProjectError::Network(format!("bad backend url: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ProjectError::Network("backend url can't take a path".to_string()))?
            .push(id);
        Ok(url)
    }

    #[tracing::instrument(skip(self, data), fields(bytes = data.len()))]
    pub async fn upload_media(
        &self,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<MediaUpload, ProjectError> {
        let res = self
            .http
            .post(self.config.endpoint("media"))
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;
        let upload = check(res).await?.json::<MediaUpload>().await?;
        tracing::info!(url = %upload.url, "media uploaded");
        Ok(upload)
    }
}

async fn check(res: Response) -> Result<Response, ProjectError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res);
    }
    let body = res.text().await.unwrap_or_default();
    tracing::warn!(%status, %body, "backend rejected request");
    Err(ProjectError::Status {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Bytes,
        extract::Path,
        http::{HeaderMap, StatusCode},
        routing::{delete, get, post},
        Json, Router,
    };
    use tokio::net::TcpListener;

    use super::*;

    async fn serve(router: Router) -> ApiConfig {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        ApiConfig::new(format!("http://{addr}/api/"))
    }

    fn sample() -> Vec<Project> {
        serde_json::from_str(
            r#"[{"id":"1","title":"A","category":"Full-Stack","description":"a",
                 "imageUrl":"https://img/a.png","createdAt":"2025-01-05T12:30:00"},
                {"id":"2","title":"B","category":"Cloud Computing","description":"b",
                 "imageUrl":"https://img/b.png","website":"https://b.dev",
                 "createdAt":"2025-01-06T09:00:00"}]"#,
        )
        .unwrap()
    }

    fn draft() -> NewProject {
        NewProject {
            title: "C".to_string(),
            category: "Machine Learning".to_string(),
            description: "c".to_string(),
            image_url: "https://img/c.png".to_string(),
            github: Some(String::new()),
            website: None,
        }
    }

    #[tokio::test]
    async fn test_list_projects() {
        let config = serve(Router::new().route("/api/projects", get(|| async { Json(sample()) }))).await;
        let client = ProjectsClient::new(&config);

        let projects = client.list().await.unwrap();
        assert_eq!(projects, sample());
        assert_eq!(client.list_or_empty().await.len(), 2);
    }

    #[tokio::test]
    async fn test_list_server_error_is_empty() {
        let config = serve(Router::new().route(
            "/api/projects",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error") }),
        ))
        .await;
        let client = ProjectsClient::new(&config);

        let err = client.list().await.unwrap_err();
        assert_eq!(
            err,
            ProjectError::Status {
                status: 500,
                body: "Internal server error".to_string()
            }
        );
        assert!(client.list_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_list_garbage_is_empty() {
        let config = serve(Router::new().route("/api/projects", get(|| async { "not json" }))).await;
        let client = ProjectsClient::new(&config);

        assert!(matches!(client.list().await, Err(ProjectError::Decode(_))));
        assert!(client.list_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_empty() {
        // bind then drop to get a port nobody listens on
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = ProjectsClient::new(&ApiConfig::new(format!("http://{addr}")));

        assert!(matches!(client.list().await, Err(ProjectError::Network(_))));
        assert!(client.list_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_add_sends_normalized_body() {
        let config = serve(Router::new().route(
            "/api/projects",
            post(|Json(body): Json<serde_json::Value>| async move {
                // blank links must be left out of the body
                if body.get("github").is_some() {
                    return (StatusCode::BAD_REQUEST, "unexpected github".to_string());
                }
                (StatusCode::OK, body["title"].as_str().unwrap_or_default().to_string())
            }),
        ))
        .await;
        let client = ProjectsClient::new(&config);

        assert_eq!(client.add(&draft()).await, Ok(()));
    }

    #[tokio::test]
    async fn test_add_failure_keeps_body() {
        let config = serve(Router::new().route(
            "/api/projects",
            post(|| async { (StatusCode::BAD_REQUEST, "Missing required field: title") }),
        ))
        .await;
        let client = ProjectsClient::new(&config);

        let err = client.add(&draft()).await.unwrap_err();
        assert_eq!(err.user_message(), "Missing required field: title");
    }

    #[tokio::test]
    async fn test_add_validates_before_sending() {
        // nothing is listening on this router's routes
        let config = serve(Router::new()).await;
        let client = ProjectsClient::new(&config);
        let mut project = draft();
        project.category = " ".to_string();

        assert_eq!(
            client.add(&project).await,
            Err(ProjectError::MissingField("category"))
        );
    }

    #[tokio::test]
    async fn test_delete_project() {
        let config = serve(Router::new().route(
            "/api/projects/{id}",
            delete(|Path(id): Path<String>| async move {
                if id == "1" {
                    (StatusCode::OK, "Project deleted successfully")
                } else {
                    (StatusCode::NOT_FOUND, "Project not found")
                }
            }),
        ))
        .await;
        let client = ProjectsClient::new(&config);

        assert_eq!(client.delete("1").await, Ok(()));
        let err = client.delete("42").await.unwrap_err();
        assert_eq!(err.user_message(), "Project not found");
    }

    #[test]
    fn test_project_url_encodes_id() {
        let client = ProjectsClient::new(&ApiConfig::new("http://localhost:7071/api/"));
        assert_eq!(
            client.project_url("42").unwrap().as_str(),
            "http://localhost:7071/api/projects/42"
        );
        assert_eq!(
            client.project_url("a/b?c").unwrap().as_str(),
            "http://localhost:7071/api/projects/a%2Fb%3Fc"
        );
    }

    #[tokio::test]
    async fn test_delete_odd_id_hits_its_own_route() {
        let config = serve(Router::new().route(
            "/api/projects/{id}",
            delete(|Path(id): Path<String>| async move {
                if id == "a/b?c" {
                    (StatusCode::OK, "Project deleted successfully")
                } else {
                    (StatusCode::NOT_FOUND, "Project not found")
                }
            }),
        ))
        .await;
        let client = ProjectsClient::new(&config);

        assert_eq!(client.delete("a/b?c").await, Ok(()));
    }

    #[tokio::test]
    async fn test_upload_media() {
        let config = serve(Router::new().route(
            "/api/media",
            post(|headers: HeaderMap, body: Bytes| async move {
                let content_type = headers
                    .get(CONTENT_TYPE)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                Json(MediaUpload {
                    url: format!("https://blob.example/{}/{}", content_type, body.len()),
                })
            }),
        ))
        .await;
        let client = ProjectsClient::new(&config);

        let upload = client
            .upload_media("image/png", vec![1, 2, 3, 4])
            .await
            .unwrap();
        assert_eq!(upload.url, "https://blob.example/image/png/4");
    }
}
