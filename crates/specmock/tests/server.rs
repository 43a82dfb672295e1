//! End-to-end tests against a running mock server.

use std::io::Write;
use std::net::SocketAddr;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::StatusCode;
use specmock::generator::{DataOptions, MediaGenerators};
use specmock::{MockServer, NegotiationPolicy, ResponseGenerator, Router, ServerState, Specification};
use tokio::net::TcpListener;

const PETSTORE: &str = r##"
openapi: 3.0.3
info:
  title: Petstore
  version: "1.0"
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        "200":
          description: A list of pets
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Pet"
            application/xml:
              schema:
                type: array
                items:
                  $ref: "#/components/schemas/Pet"
        default:
          description: unexpected error
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Error"
    post:
      responses:
        "201":
          description: Null response
  /pets/{petId}:
    get:
      responses:
        "200":
          description: A pet
          content:
            application/json:
              schema:
                $ref: "#/components/schemas/Pet"
        "404":
          description: Not found
components:
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id:
          type: integer
          format: int64
        name:
          type: string
        tag:
          type: string
    Error:
      type: object
      required: [code, message]
      properties:
        code:
          type: integer
        message:
          type: string
"##;

async fn start_server(policy: NegotiationPolicy) -> SocketAddr {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(PETSTORE.as_bytes()).unwrap();
    let spec = Specification::from_file(file.path()).unwrap();

    let state = ServerState {
        router: Router::from_specification(spec).unwrap(),
        generator: ResponseGenerator::new(
            MediaGenerators::with_defaults(DataOptions::default()),
            policy,
        ),
        health_path: "/__health".to_string(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = MockServer::new(addr, state);
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    addr
}

#[tokio::test]
async fn test_list_pets_json() {
    let addr = start_server(NegotiationPolicy::Deterministic).await;
    let response = reqwest::get(format!("http://{addr}/pets")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json; charset=utf-8"
    );
    let pets: serde_json::Value = response.json().await.unwrap();
    let pets = pets.as_array().unwrap();
    assert!(!pets.is_empty());
    for pet in pets {
        assert!(pet["id"].is_i64());
        assert!(pet["name"].is_string());
    }
}

#[tokio::test]
async fn test_list_pets_xml_by_accept() {
    let addr = start_server(NegotiationPolicy::Deterministic).await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/pets"))
        .header(ACCEPT, "application/xml")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/xml; charset=utf-8"
    );
    let body = response.text().await.unwrap();
    assert!(body.contains("<name>"));
}

#[tokio::test]
async fn test_not_acceptable() {
    let addr = start_server(NegotiationPolicy::Deterministic).await;
    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/pets"))
        .header(ACCEPT, "text/csv")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["errors"][0]["code"], "406");
}

#[tokio::test]
async fn test_empty_created_response() {
    let addr = start_server(NegotiationPolicy::Deterministic).await;
    let client = reqwest::Client::new();
    let response = client
        .post(format!("http://{addr}/pets"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert!(response.headers().get(CONTENT_TYPE).is_none());
    assert!(response.bytes().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_path_parameter_route() {
    let addr = start_server(NegotiationPolicy::Deterministic).await;
    let response = reqwest::get(format!("http://{addr}/pets/7")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let pet: serde_json::Value = response.json().await.unwrap();
    assert!(pet["name"].is_string());
}

#[tokio::test]
async fn test_unknown_route_and_method() {
    let addr = start_server(NegotiationPolicy::Deterministic).await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("http://{addr}/owners"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client
        .delete(format!("http://{addr}/pets"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_health_endpoint() {
    let addr = start_server(NegotiationPolicy::Deterministic).await;
    let response = reqwest::get(format!("http://{addr}/__health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_random_policy_serves_declared_codes() {
    let addr = start_server(NegotiationPolicy::Random).await;
    let client = reqwest::Client::new();
    for _ in 0..20 {
        let response = client
            .get(format!("http://{addr}/pets/1"))
            .send()
            .await
            .unwrap();
        assert!(
            response.status() == StatusCode::OK || response.status() == StatusCode::NOT_FOUND,
            "unexpected status {}",
            response.status()
        );
    }
}
