use serde_json::json;

use super::{
    client::ApiClient,
    types::{
        ApiError, LessonCheckResponse, MarkAttendanceRequest, MarkAttendanceResponse,
        RosterStudent, SessionCommandResponse, SessionStatusResponse, WorkloadConflictResponse,
    },
};

impl ApiClient {
    /// Checks whether a lesson is currently scheduled for `class_id`.
    ///
    /// When the session context carries a staff registration number the
    /// check is lecturer-scoped: only lessons taught by that lecturer
    /// count.
    pub async fn check_lesson(&self, class_id: i64) -> Result<LessonCheckResponse, ApiError> {
        let base_url = self.resolved_base_url();
        let mut params = vec![("class_id", class_id.to_string())];
        if let Some(regno) = self.context().staff_regno() {
            params.push(("staff_regno", regno.to_string()));
        }
        let response = self
            .http_client()
            .get(format!("{}/check-lesson/", base_url))
            .headers(self.auth_headers()?)
            .query(&params)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        Self::parse(response).await
    }

    /// Fetches the students eligible for attendance in a class, each with
    /// its already-recorded state if any.
    pub async fn search_attendance(&self, class_id: i64) -> Result<Vec<RosterStudent>, ApiError> {
        let base_url = self.resolved_base_url();
        let response = self
            .http_client()
            .get(format!("{}/search-attendance/", base_url))
            .headers(self.auth_headers()?)
            .query(&[("class_id", class_id.to_string())])
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        Self::parse(response).await
    }

    pub async fn start_face_attendance(
        &self,
        lesson_id: i64,
    ) -> Result<SessionCommandResponse, ApiError> {
        let base_url = self.resolved_base_url();
        let response = self
            .http_client()
            .post(format!("{}/face-attendance/", base_url))
            .headers(self.auth_headers()?)
            .json(&json!({ "lesson_id": lesson_id }))
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        Self::parse(response).await
    }

    pub async fn stop_face_attendance(
        &self,
        lesson_id: i64,
    ) -> Result<SessionCommandResponse, ApiError> {
        let base_url = self.resolved_base_url();
        let response = self
            .http_client()
            .post(format!("{}/stop-face-attendance/", base_url))
            .headers(self.auth_headers()?)
            .json(&json!({ "lesson_id": lesson_id }))
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        Self::parse(response).await
    }

    pub async fn face_attendance_status(
        &self,
        lesson_id: i64,
    ) -> Result<SessionStatusResponse, ApiError> {
        let base_url = self.resolved_base_url();
        let response = self
            .http_client()
            .get(format!("{}/face-attendance/status/", base_url))
            .headers(self.auth_headers()?)
            .query(&[("lesson_id", lesson_id.to_string())])
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        Self::parse(response).await
    }

    /// Submits one manual marking batch. The server upserts per
    /// (lesson, student), so resubmitting the same batch is safe.
    pub async fn mark_attendance(
        &self,
        request: &MarkAttendanceRequest,
    ) -> Result<MarkAttendanceResponse, ApiError> {
        let base_url = self.resolved_base_url();
        let response = self
            .http_client()
            .post(format!("{}/mark-attendance/", base_url))
            .headers(self.auth_headers()?)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        Self::parse(response).await
    }

    pub async fn check_new_lecturer_workload(
        &self,
        lecturer_id: i64,
        load_id: i64,
    ) -> Result<WorkloadConflictResponse, ApiError> {
        let base_url = self.resolved_base_url();
        let response = self
            .http_client()
            .get(format!("{}/check-new-lecturer-workload/", base_url))
            .headers(self.auth_headers()?)
            .query(&[
                ("lecturer_id", lecturer_id.to_string()),
                ("load_id", load_id.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        Self::parse(response).await
    }
}
