//! Exercises `CustomerApi` against a real HTTP server.
//!
//! Starts an in-process stand-in of the customers service with the same
//! observable behavior: 201 + Location on create, 404 bodies with a
//! `message` property, unconditional 204 on delete, and list filtering
//! where the first recognized key wins and unknown keys are ignored.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::{ApiError, CustomerApi, SearchFilters};
use crate::models::Customer;
use crate::ui::console::{Completion, ConsoleState, Outcome};

#[derive(Clone, Serialize, Deserialize)]
struct CustomerRecord {
    #[serde(default)]
    customer_id: Option<i64>,
    firstname: String,
    lastname: String,
    email_id: String,
    address: String,
    phone_number: String,
    card_number: String,
    active: bool,
}

#[derive(Clone, Default)]
struct ServiceState {
    inner: Arc<Mutex<Store>>,
}

#[derive(Default)]
struct Store {
    next_id: i64,
    customers: BTreeMap<i64, CustomerRecord>,
}

fn not_found(id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "status": 404,
            "error": "Not Found",
            "message": format!("Customer with id '{}' was not found", id),
        })),
    )
        .into_response()
}

async fn create_customer(
    State(state): State<ServiceState>,
    Json(mut body): Json<CustomerRecord>,
) -> Response {
    let mut store = state.inner.lock().unwrap();
    store.next_id += 1;
    let id = store.next_id;
    body.customer_id = Some(id);
    store.customers.insert(id, body.clone());
    (
        StatusCode::CREATED,
        [(header::LOCATION, format!("/customers/{}", id))],
        Json(body),
    )
        .into_response()
}

async fn get_customer(State(state): State<ServiceState>, Path(id): Path<String>) -> Response {
    let store = state.inner.lock().unwrap();
    match id.parse::<i64>().ok().and_then(|n| store.customers.get(&n)) {
        Some(record) => Json(record.clone()).into_response(),
        None => not_found(&id),
    }
}

async fn update_customer(
    State(state): State<ServiceState>,
    Path(id): Path<String>,
    Json(mut body): Json<CustomerRecord>,
) -> Response {
    let mut store = state.inner.lock().unwrap();
    match id.parse::<i64>().ok().filter(|n| store.customers.contains_key(n)) {
        Some(n) => {
            body.customer_id = Some(n);
            store.customers.insert(n, body.clone());
            Json(body).into_response()
        }
        None => not_found(&id),
    }
}

// The service deletes whatever matches and answers 204 either way
async fn delete_customer(State(state): State<ServiceState>, Path(id): Path<String>) -> StatusCode {
    let mut store = state.inner.lock().unwrap();
    if let Ok(n) = id.parse::<i64>() {
        store.customers.remove(&n);
    }
    StatusCode::NO_CONTENT
}

async fn activate_customer(State(state): State<ServiceState>, Path(id): Path<String>) -> Response {
    let mut store = state.inner.lock().unwrap();
    match id.parse::<i64>().ok().and_then(|n| store.customers.get_mut(&n)) {
        Some(record) => {
            record.active = true;
            Json(record.clone()).into_response()
        }
        None => not_found(&id),
    }
}

async fn list_customers(
    State(state): State<ServiceState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<CustomerRecord>> {
    let store = state.inner.lock().unwrap();
    let matches: Vec<CustomerRecord> = if let Some(email_id) = params.get("email_id") {
        store
            .customers
            .values()
            .filter(|c| &c.email_id == email_id)
            .cloned()
            .collect()
    } else if let Some(firstname) = params.get("firstname") {
        store
            .customers
            .values()
            .filter(|c| &c.firstname == firstname)
            .cloned()
            .collect()
    } else if let Some(lastname) = params.get("lastname") {
        store
            .customers
            .values()
            .filter(|c| &c.lastname == lastname)
            .cloned()
            .collect()
    } else if let Some(phone_number) = params.get("phone_number") {
        store
            .customers
            .values()
            .filter(|c| &c.phone_number == phone_number)
            .cloned()
            .collect()
    } else {
        store.customers.values().cloned().collect()
    };
    Json(matches)
}

async fn start_service() -> String {
    let app = Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/:id",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/customers/:id/activate", put(activate_customer))
        .with_state(ServiceState::default());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn sample_customer(firstname: &str, active: bool) -> Customer {
    Customer {
        customer_id: None,
        firstname: firstname.to_string(),
        lastname: "Lee".to_string(),
        email_id: format!("{}@lee.com", firstname.to_lowercase()),
        address: "12 Elm St".to_string(),
        phone_number: "555-0199".to_string(),
        card_number: "4111".to_string(),
        active,
    }
}

#[tokio::test]
async fn customer_lifecycle_round_trip() {
    let api = CustomerApi::new(start_service().await);

    let created = api.create(&sample_customer("Ann", false)).await.unwrap();
    let id = created.customer_id.clone().unwrap();
    assert_eq!(created.firstname, "Ann");
    assert!(!created.active);

    let fetched = api.get(&id).await.unwrap();
    assert_eq!(fetched, created);

    let mut changed = sample_customer("Ann", false);
    changed.address = "99 Oak Ave".to_string();
    let updated = api.update(&id, &changed).await.unwrap();
    assert_eq!(updated.customer_id.as_deref(), Some(id.as_str()));
    assert_eq!(updated.address, "99 Oak Ave");

    let activated = api.activate(&id).await.unwrap();
    assert!(activated.active);

    api.delete(&id).await.unwrap();
    let err = api.get(&id).await.unwrap_err();
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, format!("Customer with id '{}' was not found", id));
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_customer_maps_to_a_server_error_with_the_message() {
    let api = CustomerApi::new(start_service().await);

    let err = api.get("999").await.unwrap_err();
    match err {
        ApiError::Server { status, message } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Customer with id '999' was not found");
        }
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn deleting_an_unknown_id_still_succeeds() {
    let api = CustomerApi::new(start_service().await);
    api.delete("12345").await.unwrap();
}

#[tokio::test]
async fn search_by_firstname_returns_only_matches() {
    let api = CustomerApi::new(start_service().await);
    api.create(&sample_customer("Ann", true)).await.unwrap();
    api.create(&sample_customer("Bo", false)).await.unwrap();
    api.create(&sample_customer("Ann", false)).await.unwrap();

    let filters = SearchFilters {
        firstname: "Ann".to_string(),
        ..Default::default()
    };
    let found = api.search(&filters).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.iter().all(|c| c.firstname == "Ann"));
}

#[tokio::test]
async fn search_without_filters_returns_everything() {
    let api = CustomerApi::new(start_service().await);
    api.create(&sample_customer("Ann", true)).await.unwrap();
    api.create(&sample_customer("Bo", false)).await.unwrap();

    let found = api.search(&SearchFilters::default()).await.unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
async fn the_misspelled_active_key_is_ignored_by_the_service() {
    let api = CustomerApi::new(start_service().await);
    api.create(&sample_customer("Ann", true)).await.unwrap();
    api.create(&sample_customer("Ann", false)).await.unwrap();

    // firstname=Ann&activer=true on the wire; the service only sees firstname
    let filters = SearchFilters {
        firstname: "Ann".to_string(),
        active: true,
        ..Default::default()
    };
    let found = api.search(&filters).await.unwrap();
    assert_eq!(found.len(), 2);
}

// End-to-end scenarios through the console's update path.

#[tokio::test]
async fn create_from_the_form_reflects_the_assigned_id() {
    let api = CustomerApi::new(start_service().await);
    let mut state = ConsoleState::new();
    state.form.firstname = "A".to_string();
    state.form.lastname = "B".to_string();
    state.form.email_id = "a@b.com".to_string();
    state.form.address = "X".to_string();
    state.form.phone_number = "1".to_string();
    state.form.card_number = "2".to_string();

    let customer = state.form.to_customer();
    let seq = state.begin_request();
    let outcome = Outcome::Created(api.create(&customer).await);
    state.apply(Completion { seq, outcome });

    assert_eq!(state.form.customer_id, "1");
    assert_eq!(state.form.active, "false");
    assert_eq!(state.flash_message, "Success");
}

#[tokio::test]
async fn retrieving_a_missing_customer_clears_the_form_data() {
    let api = CustomerApi::new(start_service().await);
    let mut state = ConsoleState::new();
    state.form.customer_id = "999".to_string();
    state.form.firstname = "Ann".to_string();

    let seq = state.begin_request();
    let outcome = Outcome::Retrieved(api.get(&state.form.customer_id).await);
    state.apply(Completion { seq, outcome });

    assert_eq!(state.form.customer_id, "999");
    assert_eq!(state.form.firstname, "");
    assert_eq!(state.flash_message, "Customer with id '999' was not found");
}

#[tokio::test]
async fn search_fills_the_table_and_the_form_from_the_first_hit() {
    let api = CustomerApi::new(start_service().await);
    api.create(&sample_customer("Ann", true)).await.unwrap();
    api.create(&sample_customer("Ann", false)).await.unwrap();

    let mut state = ConsoleState::new();
    state.form.firstname = "Ann".to_string();

    let filters = state.form.search_filters();
    let seq = state.begin_request();
    let outcome = Outcome::Searched(api.search(&filters).await);
    state.apply(Completion { seq, outcome });

    assert_eq!(state.search_results.customers().len(), 2);
    assert_eq!(state.form.customer_id, "1");
    assert_eq!(state.form.firstname, "Ann");
    assert_eq!(state.form.active, "true");
    assert_eq!(state.flash_message, "Success");
}

#[tokio::test]
async fn deleting_keeps_the_id_but_clears_the_data() {
    let api = CustomerApi::new(start_service().await);
    let created = api.create(&sample_customer("Ann", true)).await.unwrap();
    let id = created.customer_id.clone().unwrap();

    let mut state = ConsoleState::new();
    state.form.fill(&created);

    let seq = state.begin_request();
    let outcome = Outcome::Deleted(api.delete(&id).await);
    state.apply(Completion { seq, outcome });

    assert_eq!(state.form.customer_id, id);
    assert_eq!(state.form.firstname, "");
    assert_eq!(state.flash_message, "Success");

    // The record really is gone
    let err = api.get(&id).await.unwrap_err();
    assert!(matches!(err, ApiError::Server { status: 404, .. }));
}
