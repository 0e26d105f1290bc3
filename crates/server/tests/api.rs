//! End-to-end tests against the real router on an ephemeral port.

use advisory::{AdvisoryConfig, AdvisoryGateway};
use axum::extract::Path;
use axum::routing::get;
use axum::{Json, Router};
use database::Database;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use sinais_server::{app, AppState};

async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn spawn_app_with(advisory: AdvisoryConfig) -> String {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.migrate().await.unwrap();
    let state = AppState::new(db, AdvisoryGateway::new(advisory).unwrap());
    serve(app(state)).await
}

async fn spawn_app() -> String {
    spawn_app_with(AdvisoryConfig::default()).await
}

fn ana() -> Value {
    json!({
        "nome": "Ana",
        "email": "ana@x.com",
        "telefone": "11999999999",
        "dataNascimento": "1990-01-01"
    })
}

async fn create(client: &Client, url: String, body: Value) -> Value {
    let response = client.post(url).json(&body).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json().await.unwrap()
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app().await;
    let body: Value = reqwest::get(format!("{}/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_register_alert_and_mark_sent() {
    let base = spawn_app().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/usuario", base))
        .json(&ana())
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["location"], "/api/usuario/1");
    let person: Value = response.json().await.unwrap();
    assert_eq!(person["id"], 1);
    assert_eq!(person["ativo"], true);
    assert_eq!(person["nome"], "Ana");
    assert_eq!(person["dataNascimento"], "1990-01-01");
    assert!(person["dataCadastro"].is_string());

    let alert = create(
        &client,
        format!("{}/api/alerta", base),
        json!({
            "usuarioId": 1,
            "titulo": "Check-in",
            "mensagem": "Como você está hoje?",
            "tipoAlerta": "Lembrete"
        }),
    )
    .await;
    assert_eq!(alert["enviado"], false);
    assert_eq!(alert["prioridade"], "Media");
    assert!(alert["dataEnvio"].is_null());
    let alert_id = alert["id"].as_i64().unwrap();

    let unsent: Vec<Value> = client
        .get(format!("{}/api/alerta/nao-enviados", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(unsent.iter().any(|a| a["id"] == alert_id));

    let response = client
        .post(format!("{}/api/alerta/{}/marcar-enviado", base, alert_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Alerta marcado como enviado com sucesso");

    let sent: Value = client
        .get(format!("{}/api/alerta/{}", base, alert_id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(sent["enviado"], true);
    assert!(sent["dataEnvio"].is_string());

    let unsent: Vec<Value> = client
        .get(format!("{}/api/alerta/nao-enviados", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(unsent.iter().all(|a| a["id"] != alert_id));
    assert!(unsent.iter().all(|a| a["enviado"] == false));

    let missing = client
        .post(format!("{}/api/alerta/999/marcar-enviado", base))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_client_errors() {
    let base = spawn_app().await;
    let client = Client::new();

    // Missing required field
    let response = client
        .post(format!("{}/api/usuario", base))
        .json(&json!({ "email": "ana@x.com", "telefone": "1", "dataNascimento": "1990-01-01" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("nome"));

    // Malformed JSON
    let response = client
        .post(format!("{}/api/usuario", base))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());

    // Unknown id
    let response = client
        .get(format!("{}/api/usuario/42", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = client
        .get(format!("{}/api/usuario/email/ninguem@x.com", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Owner must exist
    let response = client
        .post(format!("{}/api/sessaoapoio", base))
        .json(&json!({
            "usuarioId": 42,
            "dataSessao": "2026-01-10T14:00:00",
            "tipoSessao": "Individual",
            "temaSessao": "Gatilhos"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Search needs a term
    for url in ["/api/usuario/search", "/api/recursoajuda/search?term=%20"] {
        let response = client.get(format!("{}{}", base, url)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // Period bounds must be dates
    let response = client
        .get(format!("{}/api/sessaoapoio/periodo?dataInicio=ontem", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_email_is_a_fault() {
    let base = spawn_app().await;
    let client = Client::new();

    create(&client, format!("{}/api/usuario", base), ana()).await;

    let mut duplicate = ana();
    duplicate["telefone"] = json!("21988887777");
    let response = client
        .post(format!("{}/api/usuario", base))
        .json(&duplicate)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.text().await.unwrap(), "internal server error");
}

#[tokio::test]
async fn test_partial_update_and_cascading_delete() {
    let base = spawn_app().await;
    let client = Client::new();

    let person = create(&client, format!("{}/api/usuario", base), ana()).await;
    let id = person["id"].as_i64().unwrap();

    let updated: Value = client
        .put(format!("{}/api/usuario/{}", base, id))
        .json(&json!({ "observacoes": "Prefere contato por mensagem" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(updated["observacoes"], "Prefere contato por mensagem");
    assert_eq!(updated["nome"], person["nome"]);
    assert_eq!(updated["email"], person["email"]);
    assert_eq!(updated["dataCadastro"], person["dataCadastro"]);

    let session = create(
        &client,
        format!("{}/api/sessaoapoio", base),
        json!({
            "usuarioId": id,
            "dataSessao": "2026-01-10T14:00:00",
            "tipoSessao": "Individual",
            "temaSessao": "Gatilhos"
        }),
    )
    .await;
    assert_eq!(session["status"], "Agendada");
    assert_eq!(session["duracaoMinutos"], 60);

    let report = create(
        &client,
        format!("{}/api/relatorioprogresso", base),
        json!({ "usuarioId": id, "tipoRelatorio": "Semanal", "pontuacaoProgresso": 4.5 }),
    )
    .await;
    assert_eq!(report["statusGeral"], "Bom");

    let response = client
        .delete(format!("{}/api/usuario/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let sessions: Vec<Value> = client
        .get(format!("{}/api/sessaoapoio/usuario/{}", base, id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(sessions.is_empty());

    for url in [
        format!("{}/api/sessaoapoio/{}", base, session["id"]),
        format!("{}/api/relatorioprogresso/{}", base, report["id"]),
        format!("{}/api/relatorioprogresso/usuario/{}/ultimo", base, id),
    ] {
        let response = client.get(url).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_session_period_filter() {
    let base = spawn_app().await;
    let client = Client::new();
    let person = create(&client, format!("{}/api/usuario", base), ana()).await;

    for date in ["2026-01-10T14:00:00", "2026-01-10T23:30:00", "2026-01-11T09:00:00"] {
        create(
            &client,
            format!("{}/api/sessaoapoio", base),
            json!({
                "usuarioId": person["id"],
                "dataSessao": date,
                "tipoSessao": "Grupo",
                "temaSessao": "Rotina"
            }),
        )
        .await;
    }

    let period = |query: &'static str| {
        let client = client.clone();
        let url = format!("{}/api/sessaoapoio/periodo?{}", base, query);
        async move {
            let response = client.get(url).send().await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            let sessions: Vec<Value> = response.json().await.unwrap();
            sessions
                .iter()
                .map(|s| s["dataSessao"].as_str().unwrap().to_string())
                .collect::<Vec<_>>()
        }
    };

    // A bare end date is midnight, so the next morning's session is out
    assert_eq!(
        period("dataInicio=2026-01-10&dataFim=2026-01-11").await,
        vec!["2026-01-10T14:00:00", "2026-01-10T23:30:00"]
    );
    assert!(period("dataInicio=2026-01-10&dataFim=2026-01-10").await.is_empty());

    // Missing bounds leave that side open
    assert_eq!(
        period("dataInicio=2026-01-10T20:00:00").await,
        vec!["2026-01-10T23:30:00", "2026-01-11T09:00:00"]
    );
    assert_eq!(
        period("dataFim=2026-01-10T14:00:00").await,
        vec!["2026-01-10T14:00:00"]
    );
    assert_eq!(period("").await.len(), 3);
}

#[tokio::test]
async fn test_resource_views_and_ordering() {
    let base = spawn_app().await;
    let client = Client::new();

    let mut views = Vec::new();
    for _ in 0..3 {
        let resource: Value = client
            .get(format!("{}/api/recursoajuda/1", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        views.push(resource["visualizacoes"].as_i64().unwrap());
    }
    assert_eq!(views, vec![1, 2, 3]);

    let created = create(
        &client,
        format!("{}/api/recursoajuda", base),
        json!({
            "titulo": "Controle financeiro",
            "categoria": "Video",
            "descricao": "Como organizar as finanças na recuperação",
            "prioridade": "Baixa"
        }),
    )
    .await;
    assert_eq!(created["ativo"], true);
    assert_eq!(created["visualizacoes"], 0);

    let all: Vec<Value> = client
        .get(format!("{}/api/recursoajuda", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let priorities: Vec<&str> = all.iter().map(|r| r["prioridade"].as_str().unwrap()).collect();
    assert_eq!(priorities, vec!["Alta", "Alta", "Alta", "Baixa", "Media"]);

    let hits: Vec<Value> = client
        .get(format!("{}/api/recursoajuda/search?term=recuperacao", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_external_canned_content() {
    let base = spawn_app().await;
    let client = Client::new();

    let body: Value = client
        .get(format!("{}/api/externalapi/mensagem-motivacional", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(advisory::messages::MOTIVATIONAL_MESSAGES.contains(&body["message"].as_str().unwrap()));

    let body: Value = client
        .get(format!("{}/api/externalapi/apoio-crise", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(body["message"].as_str().unwrap().contains("188"));

    let body: Value = client
        .get(format!("{}/api/externalapi/recursos-saude/Recife", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["cidade"], "Recife");
    assert_eq!(body["total"], 4);
    assert!(body["ultimaAtualizacao"].is_string());

    // An empty city segment never reaches the handler
    let response = client
        .get(format!("{}/api/externalapi/recursos-saude/", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = client
        .get(format!("{}/api/externalapi/recursos-saude/S%C3%A3o%20Paulo", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["cidade"], "São Paulo");

    // No key configured: fixed message, no provider call
    let body: Value = client
        .post(format!("{}/api/externalapi/openai", base))
        .json(&"Como evitar recaídas?")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["response"], advisory::KEY_NOT_CONFIGURED);

    let response = client
        .post(format!("{}/api/externalapi/openai", base))
        .json(&"   ")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_postal_code_lookup() {
    let provider = serve(Router::new().route(
        "/:cep/json/",
        get(|Path(cep): Path<String>| async move {
            if cep == "01001000" {
                Json(json!({ "cep": "01001-000", "localidade": "São Paulo", "uf": "SP" }))
            } else {
                Json(json!({ "erro": true }))
            }
        }),
    ))
    .await;
    let base = spawn_app_with(AdvisoryConfig::builder().viacep_base_url(&provider).build()).await;
    let client = Client::new();

    let found: Value = client
        .get(format!("{}/api/externalapi/cep/01001000", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(found["localidade"], "São Paulo");
    assert_eq!(found["uf"], "SP");

    let response = client
        .get(format!("{}/api/externalapi/cep/99999999", base))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "error": "CEP não encontrado" }));

    for bad in ["1234", "0100100a"] {
        let response = client
            .get(format!("{}/api/externalapi/cep/{}", base, bad))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
