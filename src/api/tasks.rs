use super::{decode, ApiClient};
use crate::error::ApiError;
use crate::models::Task;
use crate::state::filters::TaskFilter;
use crate::state::form::RecordStore;
use crate::state::list::{ListSource, Page, PageQuery};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

const COLLECTION: &str = "tasks";

/// How many tasks a single-record lookup scans; the backend has no GET by id.
pub const LOOKUP_LIMIT: u32 = 100;

/// `/tasks` on the task backend. Every route needs a bearer token.
#[derive(Clone)]
pub struct TasksApi {
    client: ApiClient,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListBody {
    #[serde(default)]
    tasks: Vec<Task>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    total_tasks: Option<u64>,
}

impl TasksApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

pub fn list_query(query: &PageQuery<TaskFilter>) -> Vec<(&'static str, String)> {
    vec![
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
        ("search", query.filter.search.trim().to_string()),
        ("status", query.filter.status.to_string()),
    ]
}

#[async_trait]
impl ListSource for TasksApi {
    type Item = Task;
    type Filter = TaskFilter;

    fn label(&self) -> &'static str {
        "tasks"
    }

    async fn fetch_page(&self, query: &PageQuery<TaskFilter>) -> Result<Page<Task>, ApiError> {
        let url = self
            .client
            .endpoint_with_query(&[COLLECTION], &list_query(query))?;
        let body: ListBody = decode(self.client.get(url).await?)?;
        Ok(Page::new(
            body.tasks,
            body.total_tasks,
            body.total_pages,
            query.limit,
        ))
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.client.endpoint(&[COLLECTION, id])?;
        self.client.delete(url).await.map(|_| ())
    }
}

#[async_trait]
impl RecordStore for TasksApi {
    /// Scans the first page of tasks for `id`.
    async fn fetch_record(&self, id: &str) -> Result<Value, ApiError> {
        let query = PageQuery {
            page: 1,
            limit: LOOKUP_LIMIT,
            filter: TaskFilter::default(),
            sort: None,
        };
        let url = self
            .client
            .endpoint_with_query(&[COLLECTION], &list_query(&query))?;
        let body = self.client.get(url).await?;
        find_task(body, id)
    }

    async fn create_record(&self, payload: &Value) -> Result<Option<Value>, ApiError> {
        let url = self.client.endpoint(&[COLLECTION])?;
        let body = self.client.post(url, payload).await?;
        Ok(["task", "data"]
            .iter()
            .find_map(|key| body.get(*key))
            .filter(|v| v.is_object())
            .cloned())
    }

    async fn update_record(&self, id: &str, payload: &Value) -> Result<(), ApiError> {
        let url = self.client.endpoint(&[COLLECTION, id])?;
        self.client.put(url, payload).await.map(|_| ())
    }
}

fn find_task(body: Value, id: &str) -> Result<Value, ApiError> {
    let Value::Object(mut map) = body else {
        return Err(ApiError::Decode("task list is not an object".to_string()));
    };
    let Some(Value::Array(tasks)) = map.remove("tasks") else {
        return Err(ApiError::Decode("task list has no 'tasks' array".to_string()));
    };
    tasks
        .into_iter()
        .find(|task| task.get("_id").and_then(Value::as_str) == Some(id))
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))
}
