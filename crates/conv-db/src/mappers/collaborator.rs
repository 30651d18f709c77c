//! Collaborator mapper

use conv_core::entities::{ConventionCollaborator, EditionPermission};
use conv_core::value_objects::{CollaboratorRights, EditionRights, Snowflake};

use crate::models::{CollaboratorModel, EditionPermissionModel};

impl From<EditionPermissionModel> for EditionPermission {
    fn from(model: EditionPermissionModel) -> Self {
        EditionPermission {
            edition_id: Snowflake::new(model.edition_id),
            rights: EditionRights::from_i32(model.rights),
        }
    }
}

/// Build a collaborator from its row and the override rows that belong to it
pub fn collaborator_with_permissions(
    model: CollaboratorModel,
    permissions: impl IntoIterator<Item = EditionPermissionModel>,
) -> ConventionCollaborator {
    let id = model.id;
    ConventionCollaborator {
        id: Snowflake::new(model.id),
        convention_id: Snowflake::new(model.convention_id),
        user_id: Snowflake::new(model.user_id),
        title: model.title,
        rights: CollaboratorRights::from_i32(model.rights),
        edition_permissions: permissions
            .into_iter()
            .filter(|p| p.collaborator_id == id)
            .map(EditionPermission::from)
            .collect(),
        added_by_id: Snowflake::new(model.added_by_id),
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_foreign_permission_rows_are_ignored() {
        let now = Utc::now();
        let model = CollaboratorModel {
            id: 1,
            convention_id: 10,
            user_id: 20,
            title: None,
            rights: CollaboratorRights::ADD_EDITION.to_i32(),
            added_by_id: 2,
            created_at: now,
            updated_at: now,
        };
        let rows = vec![
            EditionPermissionModel {
                collaborator_id: 1,
                edition_id: 100,
                rights: EditionRights::EDIT.to_i32(),
            },
            EditionPermissionModel {
                collaborator_id: 2,
                edition_id: 100,
                rights: EditionRights::DELETE.to_i32(),
            },
        ];

        let collaborator = collaborator_with_permissions(model, rows);
        assert_eq!(collaborator.edition_permissions.len(), 1);
        assert_eq!(
            collaborator.rights_for_edition(Snowflake::new(100)),
            EditionRights::EDIT
        );
        assert!(collaborator.has(CollaboratorRights::ADD_EDITION));
    }
}
