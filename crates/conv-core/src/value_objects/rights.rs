//! Collaborator rights bitflags
//!
//! Two flag sets exist: convention-wide rights held by a collaborator, and
//! per-edition overrides that only apply to a single edition. Both are stored
//! as INTEGER columns.

use bitflags::bitflags;
use std::fmt;

use crate::error::DomainError;

bitflags! {
    /// Convention-wide rights granted to a collaborator
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CollaboratorRights: u32 {
        /// Edit convention name, description, logo
        const EDIT_CONVENTION      = 1 << 0;
        /// Delete the convention
        const DELETE_CONVENTION    = 1 << 1;
        /// Add, update, remove collaborators
        const MANAGE_COLLABORATORS = 1 << 2;
        /// Create new editions
        const ADD_EDITION          = 1 << 3;
        /// Edit every edition of the convention
        const EDIT_ALL_EDITIONS    = 1 << 4;
        /// Delete every edition of the convention
        const DELETE_ALL_EDITIONS  = 1 << 5;
        /// Manage volunteers of every edition
        const MANAGE_VOLUNTEERS    = 1 << 6;
    }
}

bitflags! {
    /// Rights a collaborator holds on one specific edition
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EditionRights: u32 {
        const EDIT              = 1 << 0;
        const DELETE            = 1 << 1;
        const MANAGE_VOLUNTEERS = 1 << 2;
    }
}

impl CollaboratorRights {
    const NAMES: [(Self, &'static str); 7] = [
        (Self::EDIT_CONVENTION, "EDIT_CONVENTION"),
        (Self::DELETE_CONVENTION, "DELETE_CONVENTION"),
        (Self::MANAGE_COLLABORATORS, "MANAGE_COLLABORATORS"),
        (Self::ADD_EDITION, "ADD_EDITION"),
        (Self::EDIT_ALL_EDITIONS, "EDIT_ALL_EDITIONS"),
        (Self::DELETE_ALL_EDITIONS, "DELETE_ALL_EDITIONS"),
        (Self::MANAGE_VOLUNTEERS, "MANAGE_VOLUNTEERS"),
    ];

    #[inline]
    pub fn to_i32(self) -> i32 {
        self.bits() as i32
    }

    /// Unknown bits coming from the database are dropped
    #[inline]
    pub fn from_i32(bits: i32) -> Self {
        Self::from_bits_truncate(bits as u32)
    }

    pub fn list(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Parse right names as returned by `list`
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, DomainError> {
        names.iter().try_fold(Self::empty(), |acc, name| {
            Self::NAMES
                .iter()
                .find(|(_, n)| *n == name.as_ref())
                .map(|(flag, _)| acc | *flag)
                .ok_or_else(|| DomainError::invalid_value("right", name.as_ref()))
        })
    }
}

impl EditionRights {
    const NAMES: [(Self, &'static str); 3] = [
        (Self::EDIT, "EDIT"),
        (Self::DELETE, "DELETE"),
        (Self::MANAGE_VOLUNTEERS, "MANAGE_VOLUNTEERS"),
    ];

    #[inline]
    pub fn to_i32(self) -> i32 {
        self.bits() as i32
    }

    #[inline]
    pub fn from_i32(bits: i32) -> Self {
        Self::from_bits_truncate(bits as u32)
    }

    pub fn list(&self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }

    /// Parse right names as returned by `list`
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, DomainError> {
        names.iter().try_fold(Self::empty(), |acc, name| {
            Self::NAMES
                .iter()
                .find(|(_, n)| *n == name.as_ref())
                .map(|(flag, _)| acc | *flag)
                .ok_or_else(|| DomainError::invalid_value("right", name.as_ref()))
        })
    }
}

impl fmt::Display for CollaboratorRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.list().join("|"))
    }
}

impl fmt::Display for EditionRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.list().join("|"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_roundtrip_truncates_unknown_bits() {
        let rights = CollaboratorRights::EDIT_CONVENTION | CollaboratorRights::ADD_EDITION;
        assert_eq!(CollaboratorRights::from_i32(rights.to_i32()), rights);
        assert_eq!(
            CollaboratorRights::from_i32(rights.to_i32() | (1 << 20)),
            rights
        );
    }

    #[test]
    fn test_list_names() {
        let rights = CollaboratorRights::MANAGE_VOLUNTEERS | CollaboratorRights::DELETE_CONVENTION;
        assert_eq!(rights.list(), vec!["DELETE_CONVENTION", "MANAGE_VOLUNTEERS"]);
        assert_eq!(
            (EditionRights::EDIT | EditionRights::DELETE).to_string(),
            "EDIT|DELETE",
        );
        assert!(EditionRights::empty().list().is_empty());
    }

    #[test]
    fn test_from_names() {
        assert_eq!(
            CollaboratorRights::from_names(&["ADD_EDITION", "EDIT_CONVENTION"]).unwrap(),
            CollaboratorRights::ADD_EDITION | CollaboratorRights::EDIT_CONVENTION
        );
        assert_eq!(
            EditionRights::from_names::<&str>(&[]).unwrap(),
            EditionRights::empty()
        );
        assert!(matches!(
            EditionRights::from_names(&["FLY"]),
            Err(DomainError::InvalidEnumValue { .. })
        ));
    }
}
