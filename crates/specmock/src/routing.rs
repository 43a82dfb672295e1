//! Request routing to specification operations.
//!
//! Path templates are indexed in a radix trie (`matchit`); OpenAPI's
//! `{param}` syntax is what `matchit` expects, so templates are inserted
//! unchanged.

use hyper::Method;
use matchit::Router as PathRouter;
use std::collections::HashMap;
use std::sync::Arc;

use crate::specification::{Components, Operation, Specification};

/// Routing failures
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("No operation declared for path '{0}'")]
    NotFound(String),
    #[error("Method {method} not declared for path '{path}'")]
    MethodNotAllowed { method: Method, path: String },
    #[error("Invalid path template '{path}': {reason}")]
    InvalidTemplate { path: String, reason: String },
}

/// An operation matched to an incoming request
#[derive(Debug, Clone)]
pub struct Route {
    pub method: Method,
    /// Path template as declared, e.g. `/pets/{id}`
    pub path: String,
    pub params: HashMap<String, String>,
    pub operation: Arc<Operation>,
    pub components: Arc<Components>,
}

impl Route {
    /// Route for a standalone operation with no shared components
    pub fn new(method: Method, path: impl Into<String>, operation: Operation) -> Self {
        Route {
            method,
            path: path.into(),
            params: HashMap::new(),
            operation: Arc::new(operation),
            components: Arc::new(Components::default()),
        }
    }
}

#[derive(Debug)]
struct PathEntry {
    template: String,
    operations: HashMap<Method, Arc<Operation>>,
}

/// Maps request method and path to declared operations
#[derive(Debug)]
pub struct Router {
    paths: PathRouter<PathEntry>,
    components: Arc<Components>,
    operation_count: usize,
}

impl Router {
    pub fn from_specification(spec: Specification) -> Result<Self, RouteError> {
        let mut paths = PathRouter::new();
        let operation_count = spec.operation_count();

        for (template, item) in &spec.paths {
            let operations: HashMap<Method, Arc<Operation>> = item
                .operations()
                .map(|(method, op)| (method, Arc::new(op.clone())))
                .collect();

            paths
                .insert(
                    template.clone(),
                    PathEntry {
                        template: template.clone(),
                        operations,
                    },
                )
                .map_err(|e| RouteError::InvalidTemplate {
                    path: template.clone(),
                    reason: e.to_string(),
                })?;
        }

        Ok(Router {
            paths,
            components: Arc::new(spec.components),
            operation_count,
        })
    }

    pub fn operation_count(&self) -> usize {
        self.operation_count
    }

    pub fn find(&self, method: &Method, path: &str) -> Result<Route, RouteError> {
        let matched = self
            .paths
            .at(path)
            .map_err(|_| RouteError::NotFound(path.to_string()))?;
        let entry = matched.value;

        let operation = entry
            .operations
            .get(method)
            .ok_or_else(|| RouteError::MethodNotAllowed {
                method: method.clone(),
                path: entry.template.clone(),
            })?;

        Ok(Route {
            method: method.clone(),
            path: entry.template.clone(),
            params: matched
                .params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            operation: Arc::clone(operation),
            components: Arc::clone(&self.components),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> Router {
        let spec = Specification::from_yaml(
            r#"
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        200:
          description: ok
    post:
      responses:
        201:
          description: created
  /pets/{petId}:
    get:
      operationId: showPet
      responses:
        200:
          description: ok
  /pets/mine:
    get:
      operationId: myPets
      responses:
        200:
          description: ok
"#,
        )
        .unwrap();
        Router::from_specification(spec).unwrap()
    }

    #[test]
    fn test_find_static_path() {
        let route = router().find(&Method::GET, "/pets").unwrap();
        assert_eq!(route.path, "/pets");
        assert_eq!(route.operation.operation_id.as_deref(), Some("listPets"));
        assert!(route.params.is_empty());
    }

    #[test]
    fn test_find_parameterized_path() {
        let route = router().find(&Method::GET, "/pets/42").unwrap();
        assert_eq!(route.path, "/pets/{petId}");
        assert_eq!(route.params.get("petId").map(String::as_str), Some("42"));
        assert_eq!(route.operation.operation_id.as_deref(), Some("showPet"));
    }

    #[test]
    fn test_static_segment_beats_parameter() {
        let route = router().find(&Method::GET, "/pets/mine").unwrap();
        assert_eq!(route.operation.operation_id.as_deref(), Some("myPets"));
    }

    #[test]
    fn test_not_found_and_method_not_allowed() {
        let router = router();
        assert!(matches!(
            router.find(&Method::GET, "/owners"),
            Err(RouteError::NotFound(_))
        ));
        assert!(matches!(
            router.find(&Method::DELETE, "/pets"),
            Err(RouteError::MethodNotAllowed { .. })
        ));
    }

    #[test]
    fn test_operation_count() {
        assert_eq!(router().operation_count(), 4);
    }
}
