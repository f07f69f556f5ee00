//! Project use cases over both stores

mod common;

use common::{all_backends, backends};
use tracker_core::application::TrackerLimits;
use tracker_core::error::{AppError, ErrorKind};

#[tokio::test]
async fn test_created_project_is_listed() {
    for h in backends().await {
        let project = h
            .projects
            .create_project("  Website  ", " Company site ")
            .await
            .unwrap();

        assert_eq!(project.name, "Website", "{}", h.backend);
        assert_eq!(project.description, "Company site");
        assert_eq!(project.created_at, common::start_time());

        let listed = h.projects.list_projects().await.unwrap();
        assert_eq!(listed, vec![project.clone()], "{}", h.backend);
        assert_eq!(h.projects.get_project(project.id).await.unwrap(), project);
    }
}

#[tokio::test]
async fn test_duplicate_name_is_validation_and_count_unchanged() {
    for h in backends().await {
        h.projects.create_project("Website", "First").await.unwrap();

        let err = h
            .projects
            .create_project("Website", "Second")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{}", h.backend);
        assert!(err.to_string().contains("already exists"));
        assert_eq!(h.project_repo.count().await.unwrap(), 1);
    }
}

#[tokio::test]
async fn test_project_cap_is_business_rule() {
    let limits = TrackerLimits {
        max_projects: 2,
        ..TrackerLimits::default()
    };
    for h in all_backends(limits).await {
        h.projects.create_project("One", "d").await.unwrap();
        h.projects.create_project("Two", "d").await.unwrap();

        let err = h.projects.create_project("Three", "d").await.unwrap_err();
        assert!(matches!(err, AppError::BusinessRule(_)), "{}", h.backend);
        assert_eq!(
            err.to_string(),
            "Business rule violation: Cannot create new project. Maximum limit of 2 projects reached."
        );

        // Deleting frees a slot
        let first = h.projects.list_projects().await.unwrap()[0].id;
        h.projects.delete_project(first).await.unwrap();
        h.projects.create_project("Three", "d").await.unwrap();
    }
}

#[tokio::test]
async fn test_field_bounds() {
    for h in backends().await {
        let too_long = "x".repeat(31);
        for (name, description) in [
            ("", "desc"),
            ("   ", "desc"),
            ("Name", ""),
            (too_long.as_str(), "desc"),
        ] {
            let err = h
                .projects
                .create_project(name, description)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation, "{:?}", (name, description));
        }

        // Limits are counted in characters
        let thirty = "é".repeat(30);
        let description = "d".repeat(150);
        h.projects
            .create_project(&thirty, &description)
            .await
            .unwrap();
        assert_eq!(h.project_repo.count().await.unwrap(), 1, "{}", h.backend);
    }
}

#[tokio::test]
async fn test_edit_project() {
    for h in backends().await {
        let alpha = h.projects.create_project("Alpha", "a").await.unwrap();
        h.projects.create_project("Beta", "b").await.unwrap();

        let err = h
            .projects
            .edit_project(alpha.id, "Beta", "a")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation, "{}", h.backend);

        // Keeping its own name while changing the description
        let edited = h
            .projects
            .edit_project(alpha.id, "Alpha", "new description")
            .await
            .unwrap();
        assert_eq!(edited.description, "new description");
        assert_eq!(edited.created_at, alpha.created_at);

        let renamed = h
            .projects
            .edit_project(alpha.id, "Gamma", "g")
            .await
            .unwrap();
        assert_eq!(renamed.name, "Gamma");
        assert!(h.project_repo.find_by_name("Alpha").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_missing_project_is_not_found() {
    for h in backends().await {
        for err in [
            h.projects.get_project(404).await.unwrap_err(),
            h.projects.edit_project(404, "Name", "d").await.unwrap_err(),
            h.projects.delete_project(404).await.unwrap_err(),
        ] {
            assert_eq!(err.kind(), ErrorKind::NotFound, "{}", h.backend);
        }
    }
}

#[tokio::test]
async fn test_delete_cascades_to_tasks() {
    for h in backends().await {
        let project = h.projects.create_project("Doomed", "d").await.unwrap();
        let keep = h.projects.create_project("Kept", "d").await.unwrap();
        let task = h
            .tasks
            .create_task(project.id, "Child", "d", None)
            .await
            .unwrap();
        let other = h.tasks.create_task(keep.id, "Other", "d", None).await.unwrap();

        h.projects.delete_project(project.id).await.unwrap();

        assert!(h
            .tasks
            .list_project_tasks(project.id)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            h.tasks.get_task(task.id).await.unwrap_err().kind(),
            ErrorKind::NotFound,
            "{}",
            h.backend
        );
        assert_eq!(h.tasks.get_task(other.id).await.unwrap(), other);
    }
}
