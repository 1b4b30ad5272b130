//! Workflow execution port — read access to workflow runs.

use std::future::Future;
use std::sync::Arc;

use autoflow_domain::error::AutoflowError;
use autoflow_domain::time::CreatedWindow;
use autoflow_domain::workflow::{WorkflowExecution, WorkflowStatus};

/// Access to workflow executions.
pub trait WorkflowExecutionRepository {
    /// Runs in `status` created inside `window`, newest-first, at most
    /// `limit`.
    fn find_by_status(
        &self,
        status: WorkflowStatus,
        window: CreatedWindow,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<WorkflowExecution>, AutoflowError>> + Send;
}

impl<T: WorkflowExecutionRepository + Send + Sync> WorkflowExecutionRepository for Arc<T> {
    fn find_by_status(
        &self,
        status: WorkflowStatus,
        window: CreatedWindow,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<WorkflowExecution>, AutoflowError>> + Send {
        (**self).find_by_status(status, window, limit)
    }
}
