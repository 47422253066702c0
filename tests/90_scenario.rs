mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::json;

use common::ids;

/// Login, publish two listings, find them, withdraw one.
#[tokio::test]
async fn admin_publishes_and_withdraws_listings() -> Result<()> {
    let app = common::spawn_app().await?;
    let token = app.login_admin().await?;

    let house = app
        .create_property(
            &token,
            json!({
                "titulo": "Casa com pátio",
                "endereco": "Rua Gonçalves Chaves, 300",
                "cidade": "Pelotas",
                "tipo": "CASA",
                "aluguelMensal": "1200"
            }),
        )
        .await?;
    let studio = app
        .create_property(
            &token,
            json!({
                "titulo": "Studio mobiliado",
                "endereco": "Av. Bento Gonçalves, 1500",
                "cidade": "Pelotas",
                "tipo": "STUDIO",
                "aluguelMensal": 950,
                "fotos": "https://imagens.exemplo.com/studio.jpg"
            }),
        )
        .await?;
    let house_id = house["id"].as_i64().unwrap();
    let studio_id = studio["id"].as_i64().unwrap();
    assert_eq!(house["proprietarioId"], studio["proprietarioId"]);

    let (_, home) = app.get("/imoveis/destaques").await?;
    assert_eq!(ids(&home), vec![studio_id, house_id]);

    let (_, under_1000) = app.get("/imoveis/pesquisa/1000").await?;
    assert_eq!(ids(&under_1000), vec![studio_id]);

    let (_, in_pelotas) = app.get("/imoveis/pesquisa/PELOTAS").await?;
    assert_eq!(ids(&in_pelotas), vec![studio_id, house_id]);

    let (_, at_house_rent) = app.get("/imoveis/pesquisa/1200").await?;
    assert!(ids(&at_house_rent).contains(&house_id));
    let (_, too_cheap) = app.get("/imoveis/pesquisa/2").await?;
    assert!(!ids(&too_cheap).contains(&house_id));

    let (status, _) = app
        .request(Method::DELETE, &format!("/imoveis/{}", house_id), Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (_, remaining) = app.get("/imoveis").await?;
    assert_eq!(ids(&remaining), vec![studio_id]);

    let (_, by_price) = app.get("/imoveis/pesquisa/1200").await?;
    assert_eq!(ids(&by_price), vec![studio_id]);
    let (_, by_title) = app.get("/imoveis/pesquisa/casa").await?;
    assert!(ids(&by_title).is_empty());

    let audit = app.store.audit_entries().await;
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].description, "Exclusão de: Casa com pátio");
    Ok(())
}
