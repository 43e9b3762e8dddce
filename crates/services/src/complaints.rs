//! Complaint intake and listing.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use domains::models::{Complaint, ComplaintFilter, GeoPoint};
use domains::ports::{ComplaintRepo, MediaStore};
use domains::schema::{Category, Department, Priority, ProcessStage, ResolutionStatus};
use domains::{AppError, Result};
use tracing::info;
use uuid::Uuid;

/// Raw submission as it arrives from the public form. Enum fields stay
/// strings here; parsing through the schema module is this service's job.
#[derive(Debug, Default, Clone)]
pub struct ComplaintSubmission {
    pub reporter_id: Option<String>,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub department: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub location_name: String,
    /// Raw image bytes plus their content type, if a photo was attached.
    pub image: Option<(Bytes, String)>,
}

#[derive(Clone)]
pub struct ComplaintService {
    repo: Arc<dyn ComplaintRepo>,
    media: Arc<dyn MediaStore>,
}

impl ComplaintService {
    pub fn new(repo: Arc<dyn ComplaintRepo>, media: Arc<dyn MediaStore>) -> Self {
        Self { repo, media }
    }

    /// Validates and persists a new complaint.
    ///
    /// Any validation failure rejects the submission before anything is
    /// stored; a half-created complaint is never observable.
    pub async fn create(&self, submission: ComplaintSubmission) -> Result<Complaint> {
        if submission.title.trim().is_empty() && submission.description.trim().is_empty() {
            return Err(AppError::Validation(
                "title or description must be non-empty".into(),
            ));
        }
        let (Some(latitude), Some(longitude)) = (submission.latitude, submission.longitude) else {
            return Err(AppError::Validation(
                "location coordinates are required".into(),
            ));
        };
        let location = GeoPoint::new(latitude, longitude)?;
        let department = Department::parse(&submission.department)?;
        let category = submission
            .category
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(Category::parse)
            .transpose()?;
        let reporter_id = submission
            .reporter_id
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(|value| {
                Uuid::parse_str(value.trim())
                    .map_err(|_| AppError::InvalidUser(format!("'{value}' is not a valid user id")))
            })
            .transpose()?;

        let image_ref = match submission.image {
            Some((data, content_type)) => {
                Some(self.media.save_upload(data, &content_type).await?)
            }
            None => None,
        };

        let complaint = Complaint {
            id: Uuid::new_v4(),
            reporter_id,
            title: submission.title.trim().to_string(),
            description: submission.description.trim().to_string(),
            category,
            department,
            priority: initial_priority(department),
            process: ProcessStage::Unassigned,
            status: ResolutionStatus::Unresolved,
            location,
            location_name: submission.location_name.trim().to_string(),
            image_ref,
            verification_round: 0,
            created_at: Utc::now(),
        };
        self.repo.insert(&complaint).await?;
        info!(
            complaint_id = %complaint.id,
            department = %complaint.department,
            priority = %complaint.priority,
            "complaint registered"
        );
        Ok(complaint)
    }

    pub async fn get(&self, id: Uuid) -> Result<Complaint> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found("complaint", id))
    }

    pub async fn list_all(&self) -> Result<Vec<Complaint>> {
        self.repo.list(&ComplaintFilter::default()).await
    }

    pub async fn list_resolved(&self) -> Result<Vec<Complaint>> {
        self.repo
            .list(&ComplaintFilter::with_status(ResolutionStatus::Resolved))
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<()> {
        if self.repo.delete(id).await? {
            info!(complaint_id = %id, "complaint deleted");
            Ok(())
        } else {
            Err(AppError::not_found("complaint", id))
        }
    }

    pub fn image_url(&self, media_ref: &str) -> String {
        self.media.url(media_ref)
    }
}

/// Severity-based initial urgency, following the original ranking table:
/// electricity/water/roads score high enough for immediate attention,
/// sanitation/waste start in the middle of the queue.
pub fn initial_priority(department: Department) -> Priority {
    match department {
        Department::Electricity | Department::Water | Department::Roads => Priority::High,
        Department::Sanitation | Department::Waste => Priority::Medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::ports::{MockComplaintRepo, MockMediaStore};

    fn service(repo: MockComplaintRepo, media: MockMediaStore) -> ComplaintService {
        ComplaintService::new(Arc::new(repo), Arc::new(media))
    }

    fn valid_submission() -> ComplaintSubmission {
        ComplaintSubmission {
            title: "Pothole on Main St".into(),
            description: "Deep pothole near the junction".into(),
            department: "roads".into(),
            latitude: Some(13.08),
            longitude: Some(80.22),
            location_name: "Main St".into(),
            ..ComplaintSubmission::default()
        }
    }

    #[tokio::test]
    async fn create_assigns_initial_state() {
        let mut repo = MockComplaintRepo::new();
        repo.expect_insert()
            .withf(|c| {
                c.process == ProcessStage::Unassigned
                    && c.status == ResolutionStatus::Unresolved
                    && c.verification_round == 0
                    && c.priority == Priority::High
            })
            .times(1)
            .returning(|_| Ok(()));

        let created = service(repo, MockMediaStore::new())
            .create(valid_submission())
            .await
            .unwrap();
        assert_eq!(created.department, Department::Roads);
    }

    #[tokio::test]
    async fn create_rejects_out_of_range_coordinates() {
        let mut repo = MockComplaintRepo::new();
        repo.expect_insert().never();

        let mut submission = valid_submission();
        submission.latitude = Some(91.0);
        let err = service(repo, MockMediaStore::new())
            .create(submission)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_missing_location() {
        let mut repo = MockComplaintRepo::new();
        repo.expect_insert().never();

        let mut submission = valid_submission();
        submission.longitude = None;
        let err = service(repo, MockMediaStore::new())
            .create(submission)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_rejects_empty_text() {
        let mut repo = MockComplaintRepo::new();
        repo.expect_insert().never();

        let mut submission = valid_submission();
        submission.title = "  ".into();
        submission.description = String::new();
        let err = service(repo, MockMediaStore::new())
            .create(submission)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn create_stores_attached_image() {
        let mut repo = MockComplaintRepo::new();
        repo.expect_insert()
            .withf(|c| c.image_ref.as_deref() == Some("abc123"))
            .times(1)
            .returning(|_| Ok(()));
        let mut media = MockMediaStore::new();
        media
            .expect_save_upload()
            .times(1)
            .returning(|_, _| Ok("abc123".into()));

        let mut submission = valid_submission();
        submission.image = Some((Bytes::from_static(b"\x89PNG"), "image/png".into()));
        service(repo, media).create(submission).await.unwrap();
    }

    #[test]
    fn priority_derivation_follows_severity_table() {
        assert_eq!(initial_priority(Department::Electricity), Priority::High);
        assert_eq!(initial_priority(Department::Water), Priority::High);
        assert_eq!(initial_priority(Department::Roads), Priority::High);
        assert_eq!(initial_priority(Department::Sanitation), Priority::Medium);
        assert_eq!(initial_priority(Department::Waste), Priority::Medium);
    }
}
