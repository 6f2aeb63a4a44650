//! Field-level capabilities of the role entity.

/// A persisted field of the role entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleField {
    /// Unique role name.
    Name,
    /// Short form of the name.
    Abbreviation,
    /// Free text summary.
    Description,
    /// References into the permission catalog.
    Permissions,
}

impl RoleField {
    /// Every role field in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Name,
        Self::Abbreviation,
        Self::Description,
        Self::Permissions,
    ];

    /// Returns the wire name of the field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Abbreviation => "abbreviation",
            Self::Description => "description",
            Self::Permissions => "permissions",
        }
    }

    /// Returns whether free text search looks at this field.
    #[must_use]
    pub fn is_searchable(self) -> bool {
        matches!(self, Self::Name | Self::Abbreviation | Self::Description)
    }

    /// Returns whether values of this field are usable as tags.
    #[must_use]
    pub fn is_taggable(self) -> bool {
        matches!(self, Self::Name | Self::Abbreviation)
    }

    /// Returns whether this field is included in exports.
    #[must_use]
    pub fn is_exportable(self) -> bool {
        matches!(self, Self::Name | Self::Abbreviation)
    }

    /// Returns whether references held by this field are resolved on read.
    #[must_use]
    pub fn is_autopopulated(self) -> bool {
        matches!(self, Self::Permissions)
    }

    /// Lists the searchable fields.
    pub fn searchable() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|field| field.is_searchable())
    }

    /// Lists the taggable fields.
    pub fn taggable() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(|field| field.is_taggable())
    }
}

#[cfg(test)]
mod tests {
    use super::RoleField;

    #[test]
    fn search_covers_every_text_field() {
        let searchable = RoleField::searchable().map(RoleField::as_str).collect::<Vec<_>>();
        assert_eq!(searchable, vec!["name", "abbreviation", "description"]);
    }

    #[test]
    fn only_name_and_abbreviation_are_taggable() {
        let taggable = RoleField::taggable().collect::<Vec<_>>();
        assert_eq!(taggable, vec![RoleField::Name, RoleField::Abbreviation]);
        assert!(!RoleField::Description.is_exportable());
    }

    #[test]
    fn permissions_alone_are_autopopulated() {
        let populated = RoleField::ALL
            .into_iter()
            .filter(|field| field.is_autopopulated())
            .collect::<Vec<_>>();
        assert_eq!(populated, vec![RoleField::Permissions]);
        assert!(!RoleField::Permissions.is_searchable());
    }
}
