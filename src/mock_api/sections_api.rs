// src/mock_api/sections_api.rs

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::AppError,
    mock_api::{ApiResult, test_not_found},
    models::section::{NewSection, Section, SectionPatch},
    store::MemoryStore,
};

fn section_not_found() -> AppError {
    AppError::NotFound("Section not found".to_string())
}

pub async fn fetch_sections(store: &MemoryStore) -> ApiResult<Vec<Section>> {
    Ok(store.read().await.sections.clone())
}

pub async fn create_section(store: &MemoryStore, new: NewSection) -> ApiResult<Section> {
    new.validate()?;

    let section = Section {
        id: Uuid::new_v4().to_string(),
        name: new.name,
        description: new.description.unwrap_or_default(),
        created_at: Utc::now(),
    };

    store.write().await.sections.push(section.clone());
    tracing::info!(section_id = %section.id, "Created section '{}'", section.name);

    Ok(section)
}

pub async fn update_section(store: &MemoryStore, id: &str, patch: SectionPatch) -> ApiResult<Section> {
    patch.validate()?;

    let mut db = store.write().await;
    let section = db
        .sections
        .iter_mut()
        .find(|s| s.id == id)
        .ok_or_else(section_not_found)?;

    if let Some(name) = patch.name {
        section.name = name;
    }
    if let Some(description) = patch.description {
        section.description = description;
    }

    Ok(section.clone())
}

/// Removes a section and detaches it from every test. Absent ids are a no-op.
pub async fn delete_section(store: &MemoryStore, id: &str) -> ApiResult<()> {
    let mut db = store.write().await;
    let before = db.sections.len();
    db.sections.retain(|s| s.id != id);

    if db.sections.len() != before {
        for assigned in db.test_sections.values_mut() {
            assigned.retain(|section_id| section_id != id);
        }
        tracing::info!(section_id = id, "Deleted section");
    }

    Ok(())
}

/// Replaces the sections attached to a test. Duplicate ids collapse to the
/// first occurrence.
pub async fn assign_sections_to_test(
    store: &MemoryStore,
    test_id: &str,
    section_ids: Vec<String>,
) -> ApiResult<Vec<Section>> {
    let mut db = store.write().await;
    if !db.has_test(test_id) {
        return Err(test_not_found());
    }

    let mut ordered: Vec<String> = Vec::with_capacity(section_ids.len());
    for id in section_ids {
        if !db.sections.iter().any(|s| s.id == id) {
            return Err(AppError::NotFound(format!("Section '{}' not found", id)));
        }
        if !ordered.contains(&id) {
            ordered.push(id);
        }
    }

    let assigned: Vec<Section> = ordered
        .iter()
        .filter_map(|id| db.sections.iter().find(|s| &s.id == id).cloned())
        .collect();
    db.test_sections.insert(test_id.to_string(), ordered);

    Ok(assigned)
}

pub async fn fetch_test_sections(store: &MemoryStore, test_id: &str) -> ApiResult<Vec<Section>> {
    let db = store.read().await;
    if !db.has_test(test_id) {
        return Err(test_not_found());
    }

    let sections: Vec<Section> = db
        .test_sections
        .get(test_id)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| db.sections.iter().find(|s| &s.id == id).cloned())
                .collect()
        })
        .unwrap_or_default();

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    const MATH: &str = "test-math-basics";

    fn seeded() -> MemoryStore {
        MemoryStore::seeded(Duration::ZERO)
    }

    #[tokio::test]
    async fn create_update_delete_cycle() {
        let store = MemoryStore::new(Duration::ZERO);
        let created = create_section(
            &store,
            NewSection {
                name: "Physics".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();

        let updated = update_section(
            &store,
            &created.id,
            SectionPatch {
                description: Some("Mechanics".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Physics");
        assert_eq!(updated.description, "Mechanics");

        delete_section(&store, &created.id).await.unwrap();
        assert!(fetch_sections(&store).await.unwrap().is_empty());
        // Deleting again is a no-op.
        delete_section(&store, &created.id).await.unwrap();
    }

    #[tokio::test]
    async fn update_missing_section_is_not_found() {
        let err = update_section(&seeded(), "nope", SectionPatch::default())
            .await
            .unwrap_err();
        assert_eq!(err, AppError::NotFound("Section not found".to_string()));
    }

    #[tokio::test]
    async fn create_requires_a_name() {
        let err = create_section(&seeded(), NewSection::default()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn assign_replaces_and_dedupes() {
        let store = seeded();
        let ids = vec![
            "section-verbal".to_string(),
            "section-reasoning".to_string(),
            "section-verbal".to_string(),
        ];
        let assigned = assign_sections_to_test(&store, MATH, ids).await.unwrap();
        let names: Vec<_> = assigned.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Verbal Ability", "Logical Reasoning"]);

        let fetched = fetch_test_sections(&store, MATH).await.unwrap();
        assert_eq!(fetched, assigned);
    }

    #[tokio::test]
    async fn assign_unknown_section_leaves_assignment_alone() {
        let store = seeded();
        let err = assign_sections_to_test(&store, MATH, vec!["ghost".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        let fetched = fetch_test_sections(&store, MATH).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, "section-quant");
    }

    #[tokio::test]
    async fn deleting_a_section_detaches_it() {
        let store = seeded();
        delete_section(&store, "section-quant").await.unwrap();
        assert!(fetch_test_sections(&store, MATH).await.unwrap().is_empty());
    }
}
