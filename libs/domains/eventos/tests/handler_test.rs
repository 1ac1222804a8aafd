//! Handler tests for the Eventos domain
//!
//! These tests drive the routers over the in-memory store and check:
//! - Request deserialization and validation
//! - Envelope shape and HTTP status codes
//! - The unidade/evento rules as seen through HTTP
//!
//! They exercise only the domain routers, not the full application.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use domain_eventos::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let store = InMemoryStore::new();
    Router::new()
        .nest(
            "/eventos",
            handlers::eventos_router(EventoService::new(store.clone(), store.clone())),
        )
        .nest(
            "/unidades",
            handlers::unidades_router(UnidadeService::new(store.clone(), store)),
        )
}

// Helper to parse JSON response body
async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

fn form(nome_unidade: &str, mes: &str, pessoas: i32) -> Value {
    json!({
        "nome_unidade": nome_unidade,
        "nome_solicitante": "Ana",
        "eventos": [{
            "nome": "Reunião de planejamento",
            "unidade_responsavel": "Gabinete",
            "quantidade_pessoas": pessoas,
            "mes_previsto": mes,
            "coffee_break_manha": true
        }]
    })
}

#[tokio::test]
async fn test_submit_form_returns_201_with_counts() {
    let app = app();

    let response = send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 50))).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Formulário submetido com sucesso. 1 eventos criados."
    );
    assert_eq!(body["data"]["eventos_count"], 1);
    assert!(body["data"]["unidade_id"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_submit_same_unidade_twice_reuses_it() {
    let app = app();

    let first = json_body(send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 10))).await).await;
    let second = json_body(send(&app, "POST", "/eventos", Some(form("Setor A", "Maio", 20))).await).await;
    assert_eq!(first["data"]["unidade_id"], second["data"]["unidade_id"]);

    let unidades = json_body(send(&app, "GET", "/unidades", None).await).await;
    assert_eq!(unidades.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_submit_with_invalid_month_persists_nothing() {
    let app = app();

    let response = send(&app, "POST", "/eventos", Some(form("Setor A", "Foo", 10))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Mês inválido: Foo");
    assert!(body["errors"]["eventos[0].mes_previsto"].is_array());

    let unidades = json_body(send(&app, "GET", "/unidades", None).await).await;
    assert!(unidades.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_with_zero_headcount_is_rejected() {
    let app = app();

    let response = send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 0))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["errors"]["eventos[0].quantidade_pessoas"].is_array());
}

#[tokio::test]
async fn test_malformed_json_gets_envelope() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/eventos")
        .header("content-type", "application/json")
        .body(Body::from("{\"nome_unidade\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_get_evento_embeds_unidade() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Setor A", "Março", 12))).await;

    let response = send(&app, "GET", "/eventos/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["mes_previsto"], "Março");
    assert_eq!(body["nome_solicitante"], "Ana");
    assert_eq!(body["unidade"]["nome_unidade"], "Setor A");
}

#[tokio::test]
async fn test_get_evento_not_found_and_bad_id() {
    let app = app();

    let response = send(&app, "GET", "/eventos/42", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Evento não encontrado");

    let response = send(&app, "GET", "/eventos/abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(json_body(response).await["errors"]["id"].is_array());
}

#[tokio::test]
async fn test_partial_update_changes_only_sent_fields() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 50))).await;

    let response = send(
        &app,
        "PUT",
        "/eventos/1",
        Some(json!({"quantidade_pessoas": 30})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["message"], "Evento atualizado com sucesso");
    let evento = &body["data"]["evento"];
    assert_eq!(evento["quantidade_pessoas"], 30);
    assert_eq!(evento["nome"], "Reunião de planejamento");
    assert_eq!(evento["mes_previsto"], "Janeiro");
    assert_eq!(evento["coffee_break_manha"], true);
    assert!(!evento["updated_at"].is_null());
}

#[tokio::test]
async fn test_update_can_clear_solicitante_but_not_nome() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 50))).await;

    let response = send(&app, "PUT", "/eventos/1", Some(json!({"nome_solicitante": null}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(json_body(response).await["data"]["evento"]["nome_solicitante"].is_null());

    let response = send(&app, "PUT", "/eventos/1", Some(json!({"nome": null}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_evento() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 50))).await;

    let response = send(&app, "DELETE", "/eventos/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], "Evento deletado com sucesso");

    let response = send(&app, "DELETE", "/eventos/1", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_by_month_and_filters() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 10))).await;
    send(&app, "POST", "/eventos", Some(form("Setor B", "Março", 10))).await;

    let marco = json_body(send(&app, "GET", "/eventos/mes/Mar%C3%A7o", None).await).await;
    assert_eq!(marco.as_array().unwrap().len(), 1);
    assert_eq!(marco[0]["unidade"]["nome_unidade"], "Setor B");

    let response = send(&app, "GET", "/eventos/mes/Marco", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let filtered = json_body(send(&app, "GET", "/eventos?unidade_id=1", None).await).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);

    let response = send(&app, "GET", "/eventos?limit=abc", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_offset_beyond_bigint_is_rejected() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 10))).await;

    for uri in [
        "/eventos?offset=9223372036854775808",
        "/unidades?offset=9223372036854775808",
        "/eventos?offset=1000001",
    ] {
        let response = send(&app, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");

        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert!(body["errors"]["offset"].is_array(), "{uri}: {body}");
    }

    let page = json_body(send(&app, "GET", "/eventos?offset=1000000", None).await).await;
    assert_eq!(page, json!([]));
}

#[tokio::test]
async fn test_stats_summary() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 50))).await;

    let response = send(&app, "GET", "/eventos/stats/resumo", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let stats = json_body(response).await;
    assert_eq!(stats["total_eventos"], 1);
    assert_eq!(stats["total_unidades"], 1);
    assert_eq!(stats["eventos_por_mes"], json!({"Janeiro": 1}));
    assert_eq!(stats["pessoas_por_mes"], json!({"Janeiro": 50}));
    assert_eq!(stats["servicos_mais_solicitados"]["Coffee Break Manhã"], 1);
    assert_eq!(stats["servicos_mais_solicitados"]["Jantar"], 0);
}

#[tokio::test]
async fn test_aprovar_records_history() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 50))).await;

    let response = send(&app, "POST", "/eventos/1/aprovar", None).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["data"]["aprovacao"]["evento_id"], 1);
    assert_eq!(body["data"]["aprovacao"]["quantidade_pessoas"], 50);

    send(&app, "POST", "/eventos/1/aprovar", None).await;

    let history = json_body(send(&app, "GET", "/eventos/1/aprovacoes", None).await).await;
    assert_eq!(history.as_array().unwrap().len(), 2);

    let evento = json_body(send(&app, "GET", "/eventos/1", None).await).await;
    assert_eq!(evento["aprovado"], true);

    let response = send(&app, "GET", "/eventos/9/aprovacoes", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_unidade_and_duplicate() {
    let app = app();

    let response = send(&app, "POST", "/unidades", Some(json!({"nome_unidade": "Setor A"}))).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Unidade criada com sucesso");
    assert_eq!(body["data"]["unidade"]["nome_unidade"], "Setor A");

    let response = send(&app, "POST", "/unidades", Some(json!({"nome_unidade": "Setor A"}))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Unidade já existe");
    assert_eq!(
        body["errors"]["nome_unidade"],
        json!(["Esta unidade já foi cadastrada"])
    );
}

#[tokio::test]
async fn test_delete_unidade_with_eventos_is_conflict() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Setor A", "Janeiro", 50))).await;

    let response = send(&app, "DELETE", "/unidades/1", None).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = json_body(response).await;
    assert_eq!(
        body["message"],
        "Não é possível deletar unidade com eventos associados"
    );
    assert_eq!(
        body["errors"]["eventos"],
        json!(["Esta unidade possui 1 evento(s) associado(s)"])
    );

    // Both the unidade and its event survive
    let unidade = json_body(send(&app, "GET", "/unidades/1", None).await).await;
    assert_eq!(unidade["eventos"].as_array().unwrap().len(), 1);

    send(&app, "DELETE", "/eventos/1", None).await;
    let response = send(&app, "DELETE", "/unidades/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["message"], "Unidade deletada com sucesso");
}

#[tokio::test]
async fn test_rename_unidade() {
    let app = app();
    send(&app, "POST", "/unidades", Some(json!({"nome_unidade": "Setor A"}))).await;
    send(&app, "POST", "/unidades", Some(json!({"nome_unidade": "Setor B"}))).await;

    let response = send(&app, "PUT", "/unidades/1", Some(json!({"nome_unidade": "Setor B"}))).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["message"], "Nome de unidade já existe");

    let response = send(&app, "PUT", "/unidades/1", Some(json!({"nome_unidade": null}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, "PUT", "/unidades/1", Some(json!({"nome_unidade": "Setor C"}))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Unidade atualizada com sucesso");
    assert_eq!(body["data"]["unidade"]["nome_unidade"], "Setor C");
    assert!(!body["data"]["unidade"]["updated_at"].is_null());
}

#[tokio::test]
async fn test_unidade_lookup_by_name_and_search() {
    let app = app();
    send(&app, "POST", "/eventos", Some(form("Secretaria de Saúde", "Janeiro", 5))).await;
    send(&app, "POST", "/unidades", Some(json!({"nome_unidade": "Gabinete"}))).await;

    let response = send(&app, "GET", "/unidades/nome/Secretaria%20de%20Sa%C3%BAde", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["eventos"].as_array().unwrap().len(), 1);

    let response = send(&app, "GET", "/unidades/nome/Inexistente", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "Unidade não encontrada");

    let found = json_body(send(&app, "GET", "/unidades/search/Secretaria", None).await).await;
    assert_eq!(found.as_array().unwrap().len(), 1);

    // Wildcard characters are plain text
    for term in ["_", "%25"] {
        let uri = format!("/unidades/search/{term}");
        let found = json_body(send(&app, "GET", &uri, None).await).await;
        assert_eq!(found, json!([]), "{term}");
    }
}
