//! Permission resolution over conventions, editions and collaborators
//!
//! Rights are OR-ed from four sources: ownership (convention author, or
//! edition creator for edition-scoped rights), the global admin flag, the
//! collaborator's convention-wide flags and the collaborator's per-edition
//! overrides. Everything here is a pure function of already-loaded rows.

use crate::entities::{Convention, ConventionCollaborator, Edition, User};
use crate::value_objects::{CollaboratorRights, EditionRights};

/// Rows needed to decide what a user may do on a convention or edition
#[derive(Debug, Clone, Copy)]
pub struct AccessScope<'a> {
    pub user: &'a User,
    pub convention: &'a Convention,
    pub edition: Option<&'a Edition>,
    pub collaborator: Option<&'a ConventionCollaborator>,
}

impl<'a> AccessScope<'a> {
    pub fn convention(user: &'a User, convention: &'a Convention) -> Self {
        Self {
            user,
            convention,
            edition: None,
            collaborator: None,
        }
    }

    pub fn with_edition(mut self, edition: &'a Edition) -> Self {
        self.edition = Some(edition);
        self
    }

    pub fn with_collaborator(mut self, collaborator: Option<&'a ConventionCollaborator>) -> Self {
        self.collaborator = collaborator;
        self
    }

    fn is_author(&self) -> bool {
        self.convention.author_id == self.user.id
    }

    fn is_admin(&self) -> bool {
        self.user.is_global_admin
    }

    /// Edition belonging to this convention, if any
    fn edition(&self) -> Option<&'a Edition> {
        self.edition.filter(|e| e.convention_id == self.convention.id)
    }

    fn is_creator(&self) -> bool {
        self.edition().is_some_and(|e| e.creator_id == self.user.id)
    }

    /// The collaborator row, only when it really binds this user to this convention
    fn collaborator(&self) -> Option<&'a ConventionCollaborator> {
        self.collaborator.filter(|c| {
            c.convention_id == self.convention.id && c.user_id == self.user.id
        })
    }

    fn flags(&self) -> CollaboratorRights {
        self.collaborator()
            .map(|c| c.rights)
            .unwrap_or_else(CollaboratorRights::empty)
    }

    fn overrides(&self) -> EditionRights {
        match (self.collaborator(), self.edition()) {
            (Some(c), Some(e)) => c.rights_for_edition(e.id),
            _ => EditionRights::empty(),
        }
    }

    fn owns_convention(&self) -> bool {
        self.is_author() || self.is_admin()
    }

    fn owns_edition(&self) -> bool {
        self.edition().is_some() && (self.owns_convention() || self.is_creator())
    }
}

pub fn can_edit_convention(scope: &AccessScope<'_>) -> bool {
    scope.owns_convention() || scope.flags().contains(CollaboratorRights::EDIT_CONVENTION)
}

pub fn can_delete_convention(scope: &AccessScope<'_>) -> bool {
    scope.owns_convention() || scope.flags().contains(CollaboratorRights::DELETE_CONVENTION)
}

pub fn can_manage_collaborators(scope: &AccessScope<'_>) -> bool {
    scope.owns_convention() || scope.flags().contains(CollaboratorRights::MANAGE_COLLABORATORS)
}

pub fn can_add_edition(scope: &AccessScope<'_>) -> bool {
    scope.owns_convention() || scope.flags().contains(CollaboratorRights::ADD_EDITION)
}

/// Requires an edition in scope
pub fn can_edit_edition(scope: &AccessScope<'_>) -> bool {
    scope.owns_edition()
        || (scope.edition().is_some()
            && (scope.flags().contains(CollaboratorRights::EDIT_ALL_EDITIONS)
                || scope.overrides().contains(EditionRights::EDIT)))
}

/// Requires an edition in scope
pub fn can_delete_edition(scope: &AccessScope<'_>) -> bool {
    scope.owns_edition()
        || (scope.edition().is_some()
            && (scope.flags().contains(CollaboratorRights::DELETE_ALL_EDITIONS)
                || scope.overrides().contains(EditionRights::DELETE)))
}

/// Anyone who can edit the edition can also manage its volunteers
pub fn can_manage_volunteers(scope: &AccessScope<'_>) -> bool {
    if scope.edition().is_none() {
        return false;
    }
    scope.owns_edition()
        || scope.flags().contains(CollaboratorRights::MANAGE_VOLUNTEERS)
        || scope.overrides().contains(EditionRights::MANAGE_VOLUNTEERS)
        || can_edit_edition(scope)
}

/// Whether the management area of the edition should be reachable at all
pub fn can_access_edition_management(scope: &AccessScope<'_>) -> bool {
    if scope.edition().is_none() {
        return false;
    }
    scope.owns_edition()
        || !scope.flags().is_empty()
        || !scope.overrides().is_empty()
}

/// Combined edition rights, for display to the client
pub fn effective_edition_rights(scope: &AccessScope<'_>) -> EditionRights {
    let mut rights = EditionRights::empty();
    if can_edit_edition(scope) {
        rights |= EditionRights::EDIT;
    }
    if can_delete_edition(scope) {
        rights |= EditionRights::DELETE;
    }
    if can_manage_volunteers(scope) {
        rights |= EditionRights::MANAGE_VOLUNTEERS;
    }
    rights
}

/// A right checked by services before acting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    EditConvention,
    DeleteConvention,
    ManageCollaborators,
    AddEdition,
    EditEdition,
    DeleteEdition,
    ManageVolunteers,
    AccessManagement,
}

impl Capability {
    pub fn name(&self) -> &'static str {
        match self {
            Self::EditConvention => "EDIT_CONVENTION",
            Self::DeleteConvention => "DELETE_CONVENTION",
            Self::ManageCollaborators => "MANAGE_COLLABORATORS",
            Self::AddEdition => "ADD_EDITION",
            Self::EditEdition => "EDIT_EDITION",
            Self::DeleteEdition => "DELETE_EDITION",
            Self::ManageVolunteers => "MANAGE_VOLUNTEERS",
            Self::AccessManagement => "ACCESS_MANAGEMENT",
        }
    }

    pub fn allows(&self, scope: &AccessScope<'_>) -> bool {
        match self {
            Self::EditConvention => can_edit_convention(scope),
            Self::DeleteConvention => can_delete_convention(scope),
            Self::ManageCollaborators => can_manage_collaborators(scope),
            Self::AddEdition => can_add_edition(scope),
            Self::EditEdition => can_edit_edition(scope),
            Self::DeleteEdition => can_delete_edition(scope),
            Self::ManageVolunteers => can_manage_volunteers(scope),
            Self::AccessManagement => match scope.edition() {
                Some(_) => can_access_edition_management(scope),
                None => scope.owns_convention() || !scope.flags().is_empty(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::fixtures::edition;
    use crate::entities::EditionPermission;
    use crate::value_objects::Snowflake;
    use chrono::Utc;

    const AUTHOR: i64 = 1;
    const CREATOR: i64 = 2;
    const STRANGER: i64 = 3;
    const COLLAB: i64 = 4;

    fn user(id: i64) -> User {
        User::new(Snowflake::new(id), format!("u{id}@example.com"), format!("user{id}"))
    }

    fn convention() -> Convention {
        Convention::new(Snowflake::new(10), "JuggleFest".into(), Snowflake::new(AUTHOR))
    }

    fn collaborator(
        rights: CollaboratorRights,
        overrides: Vec<EditionPermission>,
    ) -> ConventionCollaborator {
        let now = Utc::now();
        ConventionCollaborator {
            id: Snowflake::new(50),
            convention_id: Snowflake::new(10),
            user_id: Snowflake::new(COLLAB),
            title: None,
            rights,
            edition_permissions: overrides,
            added_by_id: Snowflake::new(AUTHOR),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_author_has_everything() {
        let (u, c, e) = (user(AUTHOR), convention(), edition());
        let scope = AccessScope::convention(&u, &c).with_edition(&e);

        assert!(can_edit_convention(&scope));
        assert!(can_delete_convention(&scope));
        assert!(can_manage_collaborators(&scope));
        assert!(can_add_edition(&scope));
        assert_eq!(effective_edition_rights(&scope), EditionRights::all());
        assert!(can_access_edition_management(&scope));
    }

    #[test]
    fn test_global_admin_has_everything() {
        let (mut u, c, e) = (user(STRANGER), convention(), edition());
        u.is_global_admin = true;
        let scope = AccessScope::convention(&u, &c).with_edition(&e);

        assert!(can_delete_convention(&scope));
        assert!(can_delete_edition(&scope));
    }

    #[test]
    fn test_creator_rights_are_edition_scoped() {
        let (u, c, e) = (user(CREATOR), convention(), edition());
        let scope = AccessScope::convention(&u, &c).with_edition(&e);

        assert!(can_edit_edition(&scope));
        assert!(can_delete_edition(&scope));
        assert!(can_manage_volunteers(&scope));
        assert!(!can_edit_convention(&scope));
        assert!(!can_add_edition(&scope));
    }

    #[test]
    fn test_stranger_has_nothing() {
        let (u, c, e) = (user(STRANGER), convention(), edition());
        let scope = AccessScope::convention(&u, &c).with_edition(&e);

        assert!(!can_edit_convention(&scope));
        assert!(!can_edit_edition(&scope));
        assert!(!can_manage_volunteers(&scope));
        assert!(!can_access_edition_management(&scope));
        assert!(effective_edition_rights(&scope).is_empty());
    }

    #[test]
    fn test_collaborator_global_flags() {
        let (u, c, e) = (user(COLLAB), convention(), edition());
        let collab = collaborator(
            CollaboratorRights::EDIT_ALL_EDITIONS | CollaboratorRights::ADD_EDITION,
            vec![],
        );
        let scope = AccessScope::convention(&u, &c)
            .with_edition(&e)
            .with_collaborator(Some(&collab));

        assert!(can_add_edition(&scope));
        assert!(can_edit_edition(&scope));
        // editing implies volunteer management
        assert!(can_manage_volunteers(&scope));
        assert!(!can_delete_edition(&scope));
        assert!(!can_edit_convention(&scope));
    }

    #[test]
    fn test_per_edition_override() {
        let (u, c, e) = (user(COLLAB), convention(), edition());
        let collab = collaborator(
            CollaboratorRights::empty(),
            vec![EditionPermission {
                edition_id: e.id,
                rights: EditionRights::MANAGE_VOLUNTEERS,
            }],
        );
        let scope = AccessScope::convention(&u, &c)
            .with_edition(&e)
            .with_collaborator(Some(&collab));

        assert!(can_manage_volunteers(&scope));
        assert!(!can_edit_edition(&scope));
        assert!(can_access_edition_management(&scope));
        assert_eq!(effective_edition_rights(&scope), EditionRights::MANAGE_VOLUNTEERS);
    }

    #[test]
    fn test_override_for_other_edition_grants_nothing() {
        let (u, c, e) = (user(COLLAB), convention(), edition());
        let collab = collaborator(
            CollaboratorRights::empty(),
            vec![EditionPermission {
                edition_id: Snowflake::new(999),
                rights: EditionRights::all(),
            }],
        );
        let scope = AccessScope::convention(&u, &c)
            .with_edition(&e)
            .with_collaborator(Some(&collab));

        assert!(effective_edition_rights(&scope).is_empty());
        assert!(!can_access_edition_management(&scope));
    }

    #[test]
    fn test_collaborator_of_other_convention_grants_nothing() {
        let (u, c, e) = (user(COLLAB), convention(), edition());
        let mut collab = collaborator(CollaboratorRights::all(), vec![]);
        collab.convention_id = Snowflake::new(11);
        let scope = AccessScope::convention(&u, &c)
            .with_edition(&e)
            .with_collaborator(Some(&collab));

        assert!(!can_edit_convention(&scope));
        assert!(!can_edit_edition(&scope));
    }

    #[test]
    fn test_collaborator_row_of_other_user_grants_nothing() {
        let (u, c) = (user(STRANGER), convention());
        let collab = collaborator(CollaboratorRights::all(), vec![]);
        let scope = AccessScope::convention(&u, &c).with_collaborator(Some(&collab));

        assert!(!can_manage_collaborators(&scope));
    }

    #[test]
    fn test_edition_rights_need_an_edition() {
        let (u, c) = (user(COLLAB), convention());
        let collab = collaborator(CollaboratorRights::all(), vec![]);
        let scope = AccessScope::convention(&u, &c).with_collaborator(Some(&collab));

        assert!(!can_edit_edition(&scope));
        assert!(!can_manage_volunteers(&scope));
        assert!(Capability::AccessManagement.allows(&scope));
    }

    #[test]
    fn test_capability_dispatch() {
        let (u, c, e) = (user(COLLAB), convention(), edition());
        let collab = collaborator(CollaboratorRights::DELETE_ALL_EDITIONS, vec![]);
        let scope = AccessScope::convention(&u, &c)
            .with_edition(&e)
            .with_collaborator(Some(&collab));

        assert!(Capability::DeleteEdition.allows(&scope));
        assert!(!Capability::EditEdition.allows(&scope));
        assert_eq!(Capability::DeleteEdition.name(), "DELETE_EDITION");
    }
}
