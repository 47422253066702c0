#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use lm_alugueis_api::auth::TokenService;
use lm_alugueis_api::config::AppConfig;
use lm_alugueis_api::database::models::{AdminAccount, CustomerAccount, NewAdmin, NewCustomer};
use lm_alugueis_api::database::{CredentialStore, MemoryStore};
use lm_alugueis_api::{app, AppState};

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_NAME: &str = "Administrador do Sistema";
pub const ADMIN_EMAIL: &str = "admin@alugaaqui.com";
pub const ADMIN_PASSWORD: &str = "Admin@123";
pub const CUSTOMER_EMAIL: &str = "cliente@exemplo.com";
pub const CUSTOMER_PASSWORD: &str = "Cliente#1";

/// Router over a fresh in-memory store with one admin and one customer.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<TokenService>,
    pub admin: AdminAccount,
    pub customer: CustomerAccount,
}

pub async fn spawn_app() -> Result<TestApp> {
    let mut config = AppConfig::development();
    config.security.jwt_secret = JWT_SECRET.to_string();
    config.security.bcrypt_cost = 4;
    config.security.expose_error_detail = false;

    let store = Arc::new(MemoryStore::new());
    let admin = store
        .create_admin(NewAdmin {
            name: ADMIN_NAME.to_string(),
            email: ADMIN_EMAIL.to_string(),
            password_hash: bcrypt::hash(ADMIN_PASSWORD, 4)?,
            level: 1,
        })
        .await?;
    let customer = store
        .create_customer(NewCustomer {
            name: "Cliente Exemplo".to_string(),
            email: CUSTOMER_EMAIL.to_string(),
            password_hash: bcrypt::hash(CUSTOMER_PASSWORD, 4)?,
        })
        .await?;

    let state = AppState::new(config, store.clone());
    let tokens = state.tokens.clone();

    Ok(TestApp {
        router: app(state),
        store,
        tokens,
        admin,
        customer,
    })
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };

        Ok((status, value))
    }

    pub async fn get(&self, uri: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn login_admin(&self) -> Result<String> {
        let (status, body) = self
            .post(
                "/admins/login",
                None,
                json!({ "email": ADMIN_EMAIL, "senha": ADMIN_PASSWORD }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "admin login failed: {} {}", status, body);
        token_of(&body)
    }

    pub async fn login_customer(&self) -> Result<String> {
        let (status, body) = self
            .post(
                "/clientes/login",
                None,
                json!({ "email": CUSTOMER_EMAIL, "senha": CUSTOMER_PASSWORD }),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "customer login failed: {} {}", status, body);
        token_of(&body)
    }

    /// Create a listing through the API and return its JSON.
    pub async fn create_property(&self, token: &str, body: Value) -> Result<Value> {
        let (status, created) = self.post("/imoveis", Some(token), body).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create failed: {} {}", status, created);
        Ok(created)
    }
}

fn token_of(body: &Value) -> Result<String> {
    body["token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("no token in {}", body))
}

pub fn property_body(title: &str, city: &str, rent: f64) -> Value {
    json!({
        "titulo": title,
        "descricao": "Imóvel bem localizado",
        "endereco": "Rua Quinze de Novembro, 100",
        "cidade": city,
        "bairro": "Centro",
        "cep": "96010-000",
        "tipo": "APARTAMENTO",
        "aluguelMensal": rent,
    })
}

pub fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .map(|items| items.iter().filter_map(|p| p["id"].as_i64()).collect())
        .unwrap_or_default()
}
