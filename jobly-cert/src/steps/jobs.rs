use cucumber::{given, then, when};
use serde_json::{json, Value};

use crate::world::{CertWorld, ADMIN_TOKEN};

/// Navigate a JSON value by dot-separated path (e.g. "jobs.0.title").
/// Numeric segments index into arrays.
fn json_at_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for key in path.split('.') {
        current = match current {
            Value::Array(items) => items.get(key.parse::<usize>().ok()?)?,
            other => other.get(key)?,
        };
    }
    Some(current)
}

/// Parse a table cell: empty means null, numbers stay numbers.
fn cell(raw: &str) -> Value {
    let raw = raw.trim();
    if raw.is_empty() || raw == "null" {
        Value::Null
    } else if let Ok(n) = raw.parse::<i64>() {
        json!(n)
    } else if let Ok(f) = raw.parse::<f64>() {
        json!(f)
    } else {
        json!(raw)
    }
}

fn rows_as_objects(step: &cucumber::gherkin::Step) -> Vec<Value> {
    let table = step.table.as_ref().expect("expected a table");
    let header = &table.rows[0];
    table
        .rows
        .iter()
        .skip(1)
        .map(|row| {
            let obj: serde_json::Map<String, Value> = header
                .iter()
                .zip(row.iter())
                .map(|(k, v)| (k.trim().to_string(), cell(v)))
                .collect();
            Value::Object(obj)
        })
        .collect()
}

async fn send(
    world: &mut CertWorld,
    method: reqwest::Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) {
    let mut request = world.client.request(method.clone(), world.url(path));
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    if let Some(body) = body {
        request = request.json(&body);
    }
    let resp = request.send().await.unwrap();
    world.last_status = Some(resp.status().as_u16());
    let text = resp.text().await.unwrap();
    world.last_body = Some(serde_json::from_str(&text).unwrap_or(Value::String(text)));
}

async fn create_all(world: &mut CertWorld, path: &str, step: &cucumber::gherkin::Step) {
    for data in rows_as_objects(step) {
        send(world, reqwest::Method::POST, path, Some(ADMIN_TOKEN), Some(data.clone())).await;
        assert_eq!(
            world.last_status,
            Some(201),
            "POST {path} failed for {data}: {:?}",
            world.last_body
        );
    }
}

fn parse_method(raw: &str) -> reqwest::Method {
    raw.parse().unwrap_or_else(|_| panic!("bad method {raw}"))
}

// ---- Given ----

#[given("a Jobly server is running")]
async fn server_running(world: &mut CertWorld) {
    // The server addr is injected by the test runner before hook
    assert!(
        world.server_addr.is_some(),
        "server_addr must be set before this step"
    );
}

#[given("the following companies exist:")]
async fn companies_exist(world: &mut CertWorld, step: &cucumber::gherkin::Step) {
    create_all(world, "/companies", step).await;
}

#[given("the following jobs exist:")]
async fn jobs_exist(world: &mut CertWorld, step: &cucumber::gherkin::Step) {
    create_all(world, "/jobs", step).await;
}

// ---- When ----

#[when(regex = r#"^I send a (GET|DELETE) request to "([^"]+)"$"#)]
async fn send_anonymous(world: &mut CertWorld, method: String, path: String) {
    send(world, parse_method(&method), &path, None, None).await;
}

#[when(regex = r#"^I send a (GET|DELETE) request to "([^"]+)" as (admin|user|anonymous)$"#)]
async fn send_without_body(world: &mut CertWorld, method: String, path: String, role: String) {
    let token = CertWorld::token_for(&role);
    send(world, parse_method(&method), &path, token, None).await;
}

#[when(regex = r#"^I send a (POST|PATCH) request to "([^"]+)" as (admin|user|anonymous) with:$"#)]
async fn send_with_body(
    world: &mut CertWorld,
    method: String,
    path: String,
    role: String,
    step: &cucumber::gherkin::Step,
) {
    let raw = step.docstring.as_ref().expect("expected a JSON docstring");
    let body: Value = serde_json::from_str(raw).expect("invalid JSON docstring");
    let token = CertWorld::token_for(&role);
    send(world, parse_method(&method), &path, token, Some(body)).await;
}

// ---- Then ----

#[then(regex = r#"^the response status should be (\d+)$"#)]
async fn assert_status(world: &mut CertWorld, status: u16) {
    assert_eq!(
        world.last_status,
        Some(status),
        "unexpected status, body: {:?}",
        world.last_body
    );
}

#[then(regex = r#"^the response at "([^"]+)" should be "([^"]*)"$"#)]
async fn assert_path_string(world: &mut CertWorld, path: String, expected: String) {
    let resp = world.body();
    let value = json_at_path(resp, &path)
        .unwrap_or_else(|| panic!("path '{path}' not found in response: {resp}"));
    let actual = value
        .as_str()
        .unwrap_or_else(|| panic!("value at '{path}' is not a string: {value}"));
    assert_eq!(actual, expected, "mismatch at path '{path}'");
}

#[then(regex = r#"^the response at "([^"]+)" should be the number (-?[0-9.]+)$"#)]
async fn assert_path_number(world: &mut CertWorld, path: String, expected: f64) {
    let resp = world.body();
    let value = json_at_path(resp, &path)
        .unwrap_or_else(|| panic!("path '{path}' not found in response: {resp}"));
    let actual = value
        .as_f64()
        .unwrap_or_else(|| panic!("value at '{path}' is not a number: {value}"));
    assert_eq!(actual, expected, "mismatch at path '{path}'");
}

#[then(regex = r#"^the response at "([^"]+)" should be null$"#)]
async fn assert_path_null(world: &mut CertWorld, path: String) {
    let resp = world.body();
    let value = json_at_path(resp, &path)
        .unwrap_or_else(|| panic!("path '{path}' not found in response: {resp}"));
    assert!(value.is_null(), "value at '{path}' is not null: {value}");
}

#[then(regex = r#"^the response at "([^"]+)" should have (\d+) items?$"#)]
async fn assert_path_array_count(world: &mut CertWorld, path: String, count: usize) {
    let resp = world.body();
    let value = json_at_path(resp, &path)
        .unwrap_or_else(|| panic!("path '{path}' not found in response: {resp}"));
    let arr = value
        .as_array()
        .unwrap_or_else(|| panic!("value at '{path}' is not an array: {value}"));
    assert_eq!(arr.len(), count, "array count mismatch at path '{path}'");
}

#[then(regex = r#"^the listed job titles should be "([^"]*)"$"#)]
async fn assert_job_titles(world: &mut CertWorld, expected: String) {
    let jobs = world.body()["jobs"]
        .as_array()
        .unwrap_or_else(|| panic!("no jobs array in {}", world.body()));
    let titles: Vec<&str> = jobs.iter().filter_map(|j| j["title"].as_str()).collect();
    let expected: Vec<&str> = expected
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    assert_eq!(titles, expected);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_walks_objects_and_arrays() {
        let value = json!({"jobs": [{"title": "j1"}, {"title": "j2"}]});
        assert_eq!(json_at_path(&value, "jobs.1.title"), Some(&json!("j2")));
        assert_eq!(json_at_path(&value, "jobs.5.title"), None);
    }

    #[test]
    fn cells_keep_numbers_numeric() {
        assert_eq!(cell("150000"), json!(150000));
        assert_eq!(cell("0.081"), json!(0.081));
        assert_eq!(cell(""), Value::Null);
        assert_eq!(cell("c1"), json!("c1"));
    }
}
