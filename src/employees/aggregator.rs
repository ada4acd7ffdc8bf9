//! Employee business logic over an [`EmployeeSource`].
//!
//! Every read re-fetches the full listing; nothing is cached between calls.

use std::sync::Arc;

use serde_json::Value;

use crate::employees::error::{ServiceError, ServiceResult};
use crate::employees::model::{CreateEmployeeInput, Employee};
use crate::upstream::EmployeeSource;

/// Number of names returned by [`EmployeeAggregator::top_ten_by_earning`].
pub const TOP_EARNERS_LIMIT: usize = 10;

/// Stateless aggregation and orchestration layer.
#[derive(Clone)]
pub struct EmployeeAggregator {
    source: Arc<dyn EmployeeSource>,
}

impl EmployeeAggregator {
    pub fn new(source: Arc<dyn EmployeeSource>) -> Self {
        Self { source }
    }

    /// Every employee, in upstream order.
    pub async fn get_all(&self) -> ServiceResult<Vec<Employee>> {
        tracing::info!("Fetching all employees");
        self.source
            .list_all()
            .await
            .map_err(|e| ServiceError::upstream("fetch all employees", e))
    }

    /// Employees whose name contains `fragment`, ignoring case.
    pub async fn search_by_name(&self, fragment: &str) -> ServiceResult<Vec<Employee>> {
        tracing::info!(fragment = %fragment, "Searching employees by name");
        let employees = self.source.list_all().await.map_err(|e| {
            ServiceError::upstream(format!("search employees by name '{fragment}'"), e)
        })?;
        Ok(filter_by_name(employees, fragment))
    }

    pub async fn get_by_id(&self, id: &str) -> ServiceResult<Employee> {
        tracing::info!(id = %id, "Fetching employee by id");
        self.source
            .get_by_id(id)
            .await
            .map_err(|e| ServiceError::upstream(format!("fetch employee '{id}'"), e))?
            .ok_or_else(|| ServiceError::NotFound { id: id.to_string() })
    }

    /// Highest salary across all employees, 0 when there are none.
    pub async fn highest_salary(&self) -> ServiceResult<u32> {
        tracing::info!("Computing highest salary");
        let employees = self
            .source
            .list_all()
            .await
            .map_err(|e| ServiceError::upstream("compute highest salary", e))?;
        Ok(max_salary(&employees))
    }

    /// Names of the ten best-paid employees, highest first.
    pub async fn top_ten_by_earning(&self) -> ServiceResult<Vec<String>> {
        tracing::info!("Ranking top earners");
        let employees = self
            .source
            .list_all()
            .await
            .map_err(|e| ServiceError::upstream("rank top earners", e))?;
        Ok(top_earner_names(employees, TOP_EARNERS_LIMIT))
    }

    /// Validate a raw field bag and create the employee upstream.
    pub async fn create(&self, fields: Value) -> ServiceResult<Employee> {
        let input = CreateEmployeeInput::from_fields(fields)?;
        self.create_validated(&input).await
    }

    pub async fn create_validated(&self, input: &CreateEmployeeInput) -> ServiceResult<Employee> {
        tracing::info!(name = %input.name, "Creating employee");
        let created = self
            .source
            .create(input)
            .await
            .map_err(|e| ServiceError::upstream(format!("create employee '{}'", input.name), e))?;
        tracing::info!(id = %created.id, name = %created.name, "Employee created");
        Ok(created)
    }

    /// Delete by id and return the deleted employee's name.
    ///
    /// Upstream deletes by name, so the id is resolved first. A missing id
    /// never reaches the delete call.
    pub async fn delete_by_id(&self, id: &str) -> ServiceResult<String> {
        tracing::info!(id = %id, "Deleting employee by id");
        let employee = self.get_by_id(id).await?;

        let deleted = self.source.delete_by_name(&employee.name).await.map_err(|e| {
            ServiceError::upstream(format!("delete employee '{}' ({})", id, employee.name), e)
        })?;

        if !deleted {
            tracing::debug!(id = %id, name = %employee.name, "Upstream rejected delete");
            return Err(ServiceError::DeletionFailed {
                id: id.to_string(),
                name: employee.name,
            });
        }

        tracing::info!(id = %id, name = %employee.name, "Employee deleted");
        Ok(employee.name)
    }
}

impl std::fmt::Debug for EmployeeAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmployeeAggregator").finish_non_exhaustive()
    }
}

/// Keep employees whose name contains `fragment` case-insensitively, preserving order.
pub fn filter_by_name(employees: Vec<Employee>, fragment: &str) -> Vec<Employee> {
    let needle = fragment.to_lowercase();
    employees
        .into_iter()
        .filter(|e| e.name.to_lowercase().contains(&needle))
        .collect()
}

pub fn max_salary(employees: &[Employee]) -> u32 {
    employees.iter().map(|e| e.salary).max().unwrap_or(0)
}

/// Names of the `limit` highest salaries. Ties keep listing order.
pub fn top_earner_names(mut employees: Vec<Employee>, limit: usize) -> Vec<String> {
    // sort_by is stable
    employees.sort_by(|a, b| b.salary.cmp(&a.salary));
    employees.into_iter().take(limit).map(|e| e.name).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::{UpstreamError, UpstreamResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory source standing in for the provider.
    #[derive(Default)]
    struct FakeSource {
        employees: Vec<Employee>,
        fail: bool,
        reject_deletes: bool,
        delete_calls: AtomicUsize,
        created: Mutex<Vec<CreateEmployeeInput>>,
    }

    impl FakeSource {
        fn with(employees: Vec<Employee>) -> Self {
            Self {
                employees,
                ..Self::default()
            }
        }

        fn unavailable() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn check(&self) -> UpstreamResult<()> {
            if self.fail {
                Err(UpstreamError::Status {
                    status: 503,
                    url: "http://mock/api/v1/employee".into(),
                })
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl EmployeeSource for FakeSource {
        async fn list_all(&self) -> UpstreamResult<Vec<Employee>> {
            self.check()?;
            Ok(self.employees.clone())
        }

        async fn get_by_id(&self, id: &str) -> UpstreamResult<Option<Employee>> {
            self.check()?;
            Ok(self.employees.iter().find(|e| e.id == id).cloned())
        }

        async fn create(&self, input: &CreateEmployeeInput) -> UpstreamResult<Employee> {
            self.check()?;
            self.created.lock().unwrap().push(input.clone());
            Ok(Employee {
                id: "5".into(),
                name: input.name.clone(),
                salary: input.salary,
                age: input.age,
                title: input.title.clone(),
                email: Some(format!("{}@company.com", input.name.to_lowercase())),
            })
        }

        async fn delete_by_name(&self, name: &str) -> UpstreamResult<bool> {
            self.check()?;
            self.delete_calls.fetch_add(1, Ordering::SeqCst);
            Ok(!self.reject_deletes && self.employees.iter().any(|e| e.name == name))
        }
    }

    fn employee(id: &str, name: &str, salary: u32) -> Employee {
        Employee {
            id: id.into(),
            name: name.into(),
            salary,
            age: 30,
            title: "Engineer".into(),
            email: None,
        }
    }

    fn sample() -> Vec<Employee> {
        vec![
            employee("1", "John", 1000),
            employee("2", "Jane", 2000),
            employee("3", "Bob", 1500),
            employee("4", "Alice", 3000),
        ]
    }

    fn aggregator(source: FakeSource) -> (EmployeeAggregator, Arc<FakeSource>) {
        let source = Arc::new(source);
        (EmployeeAggregator::new(source.clone()), source)
    }

    #[tokio::test]
    async fn test_get_all_returns_listing_verbatim() {
        let (agg, _) = aggregator(FakeSource::with(sample()));
        assert_eq!(agg.get_all().await.unwrap(), sample());
    }

    #[tokio::test]
    async fn test_highest_salary() {
        let (agg, _) = aggregator(FakeSource::with(sample()));
        assert_eq!(agg.highest_salary().await.unwrap(), 3000);

        let (agg, _) = aggregator(FakeSource::with(Vec::new()));
        assert_eq!(agg.highest_salary().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_top_ten_by_earning() {
        let (agg, _) = aggregator(FakeSource::with(sample()));
        assert_eq!(
            agg.top_ten_by_earning().await.unwrap(),
            vec!["Alice", "Jane", "Bob", "John"]
        );
    }

    #[test]
    fn test_top_earners_truncates_and_keeps_tie_order() {
        let employees: Vec<_> = (0..15)
            .map(|i| employee(&i.to_string(), &format!("E{i}"), if i % 2 == 0 { 500 } else { 900 }))
            .collect();

        let names = top_earner_names(employees, TOP_EARNERS_LIMIT);
        assert_eq!(names.len(), 10);
        assert_eq!(
            names,
            vec!["E1", "E3", "E5", "E7", "E9", "E11", "E13", "E0", "E2", "E4"]
        );
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_ordered() {
        let (agg, _) = aggregator(FakeSource::with(sample()));
        assert_eq!(agg.search_by_name("ja").await.unwrap(), vec![employee("2", "Jane", 2000)]);

        let names: Vec<_> = agg
            .search_by_name("O")
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["John", "Bob"]);

        assert_eq!(agg.search_by_name("").await.unwrap(), sample());
        assert!(agg.search_by_name("zed").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let (agg, _) = aggregator(FakeSource::with(sample()));
        assert_eq!(agg.get_by_id("3").await.unwrap().name, "Bob");
        assert!(matches!(
            agg.get_by_id("99").await,
            Err(ServiceError::NotFound { id }) if id == "99"
        ));
    }

    #[tokio::test]
    async fn test_upstream_failures_are_wrapped() {
        let (agg, _) = aggregator(FakeSource::unavailable());

        assert!(matches!(agg.get_all().await, Err(ServiceError::Upstream { .. })));
        assert!(matches!(agg.highest_salary().await, Err(ServiceError::Upstream { .. })));
        assert!(matches!(agg.top_ten_by_earning().await, Err(ServiceError::Upstream { .. })));

        let err = agg.get_by_id("1").await.unwrap_err();
        assert!(err.to_string().starts_with("fetch employee '1' failed"), "{err}");

        let err = agg.search_by_name("ja").await.unwrap_err();
        assert!(err.to_string().contains("'ja'"), "{err}");
    }

    #[tokio::test]
    async fn test_create_returns_canonical_record() {
        let (agg, source) = aggregator(FakeSource::default());
        let created = agg
            .create(json!({"name": "Eve", "salary": 2500, "age": 29, "title": "DevOps"}))
            .await
            .unwrap();

        assert_eq!(created.id, "5");
        assert_eq!(created.email.as_deref(), Some("eve@company.com"));
        assert_eq!(source.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_bad_fields_without_upstream_call() {
        let (agg, source) = aggregator(FakeSource::default());
        let err = agg
            .create(json!({"name": "Eve", "salary": "lots", "age": 29, "title": "DevOps"}))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(source.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_returns_name() {
        let (agg, source) = aggregator(FakeSource::with(sample()));
        assert_eq!(agg.delete_by_id("2").await.unwrap(), "Jane");
        assert_eq!(source.delete_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_id_skips_delete_call() {
        let (agg, source) = aggregator(FakeSource::with(sample()));
        assert!(matches!(
            agg.delete_by_id("99").await,
            Err(ServiceError::NotFound { .. })
        ));
        assert_eq!(source.delete_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_delete_is_distinct_from_not_found() {
        let (agg, _) = aggregator(FakeSource {
            reject_deletes: true,
            ..FakeSource::with(sample())
        });

        match agg.delete_by_id("1").await {
            Err(ServiceError::DeletionFailed { id, name }) => {
                assert_eq!(id, "1");
                assert_eq!(name, "John");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Counts WARN and ERROR events.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for WarnCounter {
        fn on_event(
            &self,
            event: &tracing::Event<'_>,
            _ctx: tracing_subscriber::layer::Context<'_, S>,
        ) {
            if *event.metadata().level() <= tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[tokio::test]
    async fn test_failures_left_to_response_logging() {
        use tracing_subscriber::layer::SubscriberExt;

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));
        let _guard = tracing::subscriber::set_default(subscriber);

        let (agg, _) = aggregator(FakeSource {
            reject_deletes: true,
            ..FakeSource::with(sample())
        });
        assert!(agg.delete_by_id("1").await.is_err());

        let (agg, _) = aggregator(FakeSource::unavailable());
        assert!(agg.get_all().await.is_err());

        // the HTTP error response is where these get reported
        assert_eq!(warnings.load(Ordering::SeqCst), 0);
    }
}
