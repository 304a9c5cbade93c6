//! End-to-end smoke test of the file store against a real data directory.

use std::path::Path;

use models::{employee, user, Record};
use serde_json::json;
use service::auth::service::hash_password;
use service::file::{EmployeeStore, UserStore};
use service::storage::RecordStore;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub struct Step {
    pub name: &'static str,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Default)]
pub struct SmokeReport {
    pub steps: Vec<Step>,
}

impl SmokeReport {
    fn pass(&mut self, name: &'static str, detail: impl Into<String>) {
        let detail = detail.into();
        info!(step = name, %detail, "ok");
        self.steps.push(Step { name, ok: true, detail });
    }

    fn fail(&mut self, name: &'static str, detail: impl Into<String>) {
        let detail = detail.into();
        error!(step = name, %detail, "failed");
        self.steps.push(Step { name, ok: false, detail });
    }

    pub fn passed(&self) -> bool {
        self.steps.iter().all(|s| s.ok)
    }
}

/// Test employee shaped like the records the frontend submits.
pub fn sample_employee() -> Record {
    let today = chrono::Utc::now().format("%Y-%m-%d").to_string();
    let value = json!({
        "firstName": "Test",
        "lastName": "Employee",
        "email": "test@example.com",
        "phone": "123-456-7890",
        "department": "Engineering",
        "position": "Developer",
        "employeeType": "Full-time",
        "joiningDate": today,
        "salary": "50000",
        "status": "Active",
        "address": {
            "street": "123 Main St",
            "city": "Test City",
            "state": "Test State",
            "zipCode": "12345",
            "country": "Test Country"
        }
    });
    Record::from(value.as_object().cloned().unwrap_or_default())
}

/// Run every step against `data_dir`, continuing past failures.
pub async fn run(data_dir: &Path, purge_employees: bool) -> SmokeReport {
    let mut report = SmokeReport::default();
    let store = RecordStore::new(data_dir);

    match common::env::ensure_dir(data_dir).await {
        Ok(true) => report.pass("data directory", format!("created {}", data_dir.display())),
        Ok(false) => report.pass("data directory", format!("exists: {}", data_dir.display())),
        Err(e) => {
            report.fail("data directory", e.to_string());
            return report;
        }
    }

    for collection in [user::COLLECTION, employee::COLLECTION] {
        match store.ensure(collection).await {
            Ok(outcome) => report.pass("collection file", format!("{collection}: {outcome:?}")),
            Err(e) => report.fail("collection file", format!("{collection}: {e}")),
        }
    }

    let users = UserStore::new(store.clone());
    let employees = EmployeeStore::new(store.clone());
    report.pass(
        "file contents",
        format!("users: {}, employees: {}", users.find_all().await.len(), employees.find_all().await.len()),
    );

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let email = format!("test-{}@example.com", &suffix[..8]);
    match create_test_user(&users, &suffix[..8], &email).await {
        Ok(id) => match users.find_by_email(&email).await {
            Some(found) if found.id() == Some(id.as_str()) => report.pass("user create/find", format!("found {email}")),
            _ => report.fail("user create/find", format!("created {id} but lookup by {email} failed")),
        },
        Err(e) => report.fail("user create/find", e.to_string()),
    }

    let before = employees.find_all().await.len();
    match employees.create(sample_employee()).await {
        Ok(created) => {
            let after = employees.find_all().await.len();
            let id = created.id().unwrap_or_default().to_string();
            if after == before + 1 {
                report.pass("employee create/list", format!("created {id}, now {after}"));
            } else {
                report.fail("employee create/list", format!("expected {} employees, found {after}", before + 1));
            }
        }
        Err(e) => report.fail("employee create/list", e.to_string()),
    }

    if purge_employees {
        match employees.clear().await {
            Ok(()) if employees.find_all().await.is_empty() => report.pass("purge employees", "all employees deleted"),
            Ok(()) => report.fail("purge employees", "collection not empty after clear"),
            Err(e) => report.fail("purge employees", e.to_string()),
        }
    }

    report
}

async fn create_test_user(users: &UserStore, tag: &str, email: &str) -> anyhow::Result<String> {
    let mut fields = Record::new();
    fields.insert("username", format!("testuser-{tag}"));
    fields.insert("email", email);
    fields.insert(user::PASSWORD_FIELD, hash_password("password123")?);
    let created = users.create(fields).await?;
    created.id().map(str::to_string).ok_or_else(|| anyhow::anyhow!("created user has no _id"))
}
