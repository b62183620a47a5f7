//! Framework-agnostic router for plugin routes.
//!
//! Plugins register handlers here; the hosting application (or the demo
//! server) maps its HTTP layer onto `Request`/`Response` and dispatches.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// HTTP methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::GET => write!(f, "GET"),
            Method::POST => write!(f, "POST"),
            Method::PUT => write!(f, "PUT"),
            Method::DELETE => write!(f, "DELETE"),
        }
    }
}

/// A generic HTTP request representation.
#[derive(Debug, Clone)]
pub struct Request {
    /// HTTP method.
    pub method: Method,
    /// Request path.
    pub path: String,
    /// Query parameters.
    pub query: HashMap<String, String>,
    /// Request headers (lowercase keys).
    pub headers: HashMap<String, String>,
    /// Request body (JSON).
    pub body: Option<Value>,
    /// Client IP address.
    pub ip: Option<String>,
}

impl Request {
    /// Creates a new request.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: HashMap::new(),
            headers: HashMap::new(),
            body: None,
            ip: None,
        }
    }

    /// Sets the JSON body.
    pub fn with_json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = serde_json::to_value(body).ok();
        self
    }

    /// Sets a query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    /// Gets a query parameter.
    pub fn query_param(&self, name: &str) -> Option<&String> {
        self.query.get(name)
    }

    /// Gets a header value.
    pub fn header(&self, name: &str) -> Option<&String> {
        self.headers.get(&name.to_lowercase())
    }

    /// Deserializes the body to a type.
    pub fn json<T: for<'de> Deserialize<'de>>(&self) -> Option<T> {
        self.body
            .as_ref()
            .and_then(|b| serde_json::from_value(b.clone()).ok())
    }
}

/// A generic HTTP response representation.
#[derive(Debug, Clone)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    pub headers: HashMap<String, String>,
    /// Response body (JSON).
    pub body: Option<Value>,
}

impl Response {
    /// Creates a new response with status code.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Creates a 200 OK response.
    pub fn ok() -> Self {
        Self::new(200)
    }

    /// Creates a 400 Bad Request response.
    pub fn bad_request() -> Self {
        Self::new(400)
    }

    /// Creates a 404 Not Found response.
    pub fn not_found() -> Self {
        Self::new(404)
    }

    /// Creates a 500 Internal Server Error response.
    pub fn internal_error() -> Self {
        Self::new(500)
    }

    /// Sets the response body as JSON.
    pub fn json<T: Serialize>(mut self, body: T) -> Self {
        self.body = serde_json::to_value(body).ok();
        self.headers
            .insert("content-type".to_string(), "application/json".to_string());
        self
    }

    /// Sets a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_lowercase(), value.into());
        self
    }
}

/// Trait for request handlers.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handles a request and returns a response.
    async fn handle(&self, req: Request) -> Response;
}

/// A route definition.
pub struct Route {
    /// The HTTP method.
    pub method: Method,
    /// The path pattern (e.g., "/phone-reset/request-code").
    pub path: String,
    /// The handler function.
    pub handler: Box<dyn RequestHandler>,
    /// Route metadata for documentation.
    pub metadata: RouteMetadata,
}

/// Metadata for route documentation.
#[derive(Debug, Clone, Default)]
pub struct RouteMetadata {
    /// Short summary.
    pub summary: Option<String>,
    /// Detailed description.
    pub description: Option<String>,
    /// Tags for grouping.
    pub tags: Vec<String>,
}

impl Route {
    /// Creates a new route.
    pub fn new(
        method: Method,
        path: impl Into<String>,
        handler: impl RequestHandler + 'static,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            handler: Box::new(handler),
            metadata: RouteMetadata::default(),
        }
    }

    /// Sets the summary.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.metadata.summary = Some(summary.into());
        self
    }

    /// Sets the description.
    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.metadata.description = Some(desc.into());
        self
    }

    /// Adds a tag.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.metadata.tags.push(tag.into());
        self
    }
}

/// A router that collects routes from plugins.
pub struct Router {
    /// Base path prefix.
    pub base_path: String,
    /// Collected routes.
    routes: Vec<Route>,
}

impl Router {
    /// Creates a new router with a base path.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            routes: Vec::new(),
        }
    }

    /// Adds a route.
    pub fn route(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Adds a GET route.
    pub fn get(&mut self, path: &str, handler: impl RequestHandler + 'static) {
        self.route(Route::new(Method::GET, path, handler));
    }

    /// Adds a POST route.
    pub fn post(&mut self, path: &str, handler: impl RequestHandler + 'static) {
        self.route(Route::new(Method::POST, path, handler));
    }

    /// Returns all routes.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    /// Returns the number of routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns true if there are no routes.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Dispatches a request to the matching route.
    ///
    /// Returns a 404 response when no route matches. The request path is
    /// matched relative to the router's base path.
    pub async fn dispatch(&self, req: Request) -> Response {
        let path = req
            .path
            .strip_prefix(self.base_path.as_str())
            .unwrap_or(req.path.as_str());

        match self
            .routes
            .iter()
            .find(|r| r.method == req.method && r.path == path)
        {
            Some(route) => route.handler.handle(req).await,
            None => Response::not_found().json(serde_json::json!({
                "error": {
                    "code": "NOT_FOUND",
                    "message": "No such endpoint"
                }
            })),
        }
    }

    /// Merges another router into this one.
    pub fn merge(&mut self, other: Router) {
        for route in other.routes {
            self.routes.push(route);
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new("/api/auth")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoHandler;

    #[async_trait]
    impl RequestHandler for EchoHandler {
        async fn handle(&self, req: Request) -> Response {
            Response::ok().json(serde_json::json!({ "path": req.path }))
        }
    }

    #[tokio::test]
    async fn test_dispatch_matches_method_and_path() {
        let mut router = Router::default();
        router.post("/phone-reset/request-code", EchoHandler);

        let req = Request::new(Method::POST, "/api/auth/phone-reset/request-code");
        let res = router.dispatch(req).await;
        assert_eq!(res.status, 200);

        let req = Request::new(Method::GET, "/api/auth/phone-reset/request-code");
        let res = router.dispatch(req).await;
        assert_eq!(res.status, 404);
    }
}
