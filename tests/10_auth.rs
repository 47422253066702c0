mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use lm_alugueis_api::auth::{Principal, TokenService};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = common::spawn_app().await?;

    let (status, body) = app.get("/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn protected_route_without_header_is_rejected() -> Result<()> {
    let app = common::spawn_app().await?;

    let (status, body) = app
        .post("/imoveis", None, common::property_body("Casa nova", "Pelotas", 900.0))
        .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Token não informado" }));
    assert!(app.store.landlords().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_rejected() -> Result<()> {
    let app = common::spawn_app().await?;

    let (status, body) = app.request(Method::GET, "/admins", Some("not-a-jwt"), None).await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Token inválido" }));
    Ok(())
}

#[tokio::test]
async fn expired_and_foreign_tokens_get_the_same_answer() -> Result<()> {
    let app = common::spawn_app().await?;
    let principal = Principal::admin(app.admin.id, app.admin.name.clone(), app.admin.level);

    let expired = app.tokens.issue_at(&principal, Utc::now() - Duration::hours(2))?;
    let foreign = TokenService::new("some-other-secret").issue(&principal)?;

    for token in [expired, foreign] {
        let (status, body) = app.request(Method::GET, "/admins", Some(&token), None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "error": "Token inválido" }));
    }
    Ok(())
}

#[tokio::test]
async fn admin_login_returns_profile_and_token() -> Result<()> {
    let app = common::spawn_app().await?;

    let (status, body) = app
        .post(
            "/admins/login",
            None,
            json!({ "email": common::ADMIN_EMAIL, "senha": common::ADMIN_PASSWORD }),
        )
        .await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], app.admin.id.to_string());
    assert_eq!(body["nome"], common::ADMIN_NAME);
    assert_eq!(body["email"], common::ADMIN_EMAIL);
    assert_eq!(body["nivel"], 1);
    assert!(body.get("senha").is_none());
    assert!(body.get("passwordHash").is_none());

    let principal = app.tokens.verify(body["token"].as_str().unwrap())?;
    assert!(principal.is_admin());
    assert_eq!(principal.effective_id(), app.admin.id);
    Ok(())
}

#[tokio::test]
async fn wrong_password_is_generic_and_audited() -> Result<()> {
    let app = common::spawn_app().await?;

    let (status, body) = app
        .post(
            "/admins/login",
            None,
            json!({ "email": common::ADMIN_EMAIL, "senha": "Errada@123" }),
        )
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "erro": "Login ou senha incorretos" }));

    let audit = app.store.audit_entries().await;
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].description, "Tentativa de acesso ao sistema");
    assert_eq!(
        audit[0].detail,
        format!("Admin: {} - {}", app.admin.id, common::ADMIN_NAME)
    );
    assert_eq!(audit[0].admin_id, app.admin.id);
    Ok(())
}

#[tokio::test]
async fn unknown_email_and_incomplete_bodies_look_identical() -> Result<()> {
    let app = common::spawn_app().await?;
    let generic = json!({ "erro": "Login ou senha incorretos" });

    let bodies = [
        json!({ "email": "ninguem@exemplo.com", "senha": "Qualquer@1" }),
        json!({ "email": common::ADMIN_EMAIL }),
        json!({ "senha": common::ADMIN_PASSWORD }),
        json!({}),
    ];
    for body in bodies {
        let (status, answer) = app.post("/admins/login", None, body).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(answer, generic);
    }

    // Nothing to attribute an unknown e-mail to
    assert!(app.store.audit_entries().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn customer_token_passes_the_middleware() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.login_customer().await?;

    let principal = app.tokens.verify(&token)?;
    assert!(!principal.is_admin());
    assert_eq!(principal.effective_id(), app.customer.id);

    let (status, _) = app.request(Method::GET, "/admins", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn customer_cannot_create_listings() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.login_customer().await?;

    let (status, body) = app
        .post("/imoveis", Some(&token), common::property_body("Casa nova", "Pelotas", 900.0))
        .await?;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Admin não encontrado" }));
    assert!(app.store.landlords().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn customer_wrong_password_is_generic() -> Result<()> {
    let app = common::spawn_app().await?;

    let (status, body) = app
        .post(
            "/clientes/login",
            None,
            json!({ "email": common::CUSTOMER_EMAIL, "senha": "Errada#1" }),
        )
        .await?;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "erro": "Login ou senha incorretos" }));
    Ok(())
}
