//! Static emergency contact directory.
//!
//! The directory ships with the binary and never touches the store: drivers
//! need these numbers exactly when connectivity and persistence are least
//! reliable. Entries are ordered emergency first.

use serde::Serialize;

/// Category of an emergency contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContactKind {
    /// Emergency numbers, dialed first.
    #[serde(rename = "Urgence")]
    Urgence,

    /// Technical assistance and vehicle maintenance.
    #[serde(rename = "Support technique")]
    SupportTechnique,

    /// Dispatch supervision and route administration.
    #[serde(rename = "Administration")]
    Administration,
}

impl ContactKind {
    /// All kinds, in display order.
    pub const ALL: [Self; 3] = [Self::Urgence, Self::SupportTechnique, Self::Administration];
}

impl std::fmt::Display for ContactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Urgence => write!(f, "Urgence"),
            Self::SupportTechnique => write!(f, "Support technique"),
            Self::Administration => write!(f, "Administration"),
        }
    }
}

/// One emergency contact entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Contact {
    /// Stable identifier within the directory.
    pub id: &'static str,

    /// Person or service name.
    pub name: &'static str,

    /// Role shown under the name, e.g. "Répartiteur".
    #[serde(rename = "function")]
    pub role: &'static str,

    /// Dialable phone number.
    pub phone: &'static str,

    /// Contact email, when the service has one.
    pub email: Option<&'static str>,

    /// Directory category.
    #[serde(rename = "type")]
    pub kind: ContactKind,
}

/// The emergency contact directory, emergency numbers first.
pub const EMERGENCY_CONTACTS: &[Contact] = &[
    Contact {
        id: "1",
        name: "Gendarmerie Locale",
        role: "Forces de l'Ordre",
        phone: "17",
        email: None,
        kind: ContactKind::Urgence,
    },
    Contact {
        id: "2",
        name: "Service d'Urgence 24h/24",
        role: "Urgence Transport",
        phone: "02 99 54 12 00",
        email: Some("urgence@transport-bretagne.fr"),
        kind: ContactKind::Urgence,
    },
    Contact {
        id: "3",
        name: "Dispatcher Principal",
        role: "Répartiteur",
        phone: "02 99 54 12 10",
        email: Some("dispatch@transport-bretagne.fr"),
        kind: ContactKind::Urgence,
    },
    Contact {
        id: "4",
        name: "Support Technique",
        role: "Assistance Technique",
        phone: "02 99 54 12 15",
        email: Some("support@transport-bretagne.fr"),
        kind: ContactKind::SupportTechnique,
    },
    Contact {
        id: "5",
        name: "Service Maintenance",
        role: "Maintenance Véhicules",
        phone: "02 99 54 12 30",
        email: Some("maintenance@transport-bretagne.fr"),
        kind: ContactKind::SupportTechnique,
    },
    Contact {
        id: "6",
        name: "Centre de Contrôle",
        role: "Supervision Trafic",
        phone: "02 99 54 12 12",
        email: Some("controle@transport-bretagne.fr"),
        kind: ContactKind::Administration,
    },
    Contact {
        id: "7",
        name: "Marie Dubois",
        role: "Responsable de Parcours",
        phone: "02 99 54 12 25",
        email: Some("marie.dubois@transport-bretagne.fr"),
        kind: ContactKind::Administration,
    },
];

/// The full contact directory.
#[must_use]
pub fn emergency_contacts() -> &'static [Contact] {
    EMERGENCY_CONTACTS
}

/// Contacts of one category, in directory order.
#[must_use]
pub fn contacts_of_kind(kind: ContactKind) -> Vec<Contact> {
    EMERGENCY_CONTACTS
        .iter()
        .filter(|contact| contact.kind == kind)
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_directory_has_seven_entries() {
        assert_eq!(emergency_contacts().len(), 7);
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<&str> = emergency_contacts().iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), emergency_contacts().len());
    }

    #[test]
    fn test_every_contact_is_dialable() {
        for contact in emergency_contacts() {
            assert!(!contact.phone.is_empty(), "{} has no phone", contact.name);
            assert!(!contact.name.is_empty());
            assert!(!contact.role.is_empty());
        }
    }

    #[test]
    fn test_emergency_numbers_come_first() {
        let kinds: Vec<ContactKind> = emergency_contacts().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ContactKind::Urgence,
                ContactKind::Urgence,
                ContactKind::Urgence,
                ContactKind::SupportTechnique,
                ContactKind::SupportTechnique,
                ContactKind::Administration,
                ContactKind::Administration,
            ]
        );
    }

    #[test]
    fn test_gendarmerie_is_the_short_number() {
        let first = &emergency_contacts()[0];
        assert_eq!(first.name, "Gendarmerie Locale");
        assert_eq!(first.phone, "17");
        assert_eq!(first.email, None);
    }

    #[test]
    fn test_kind_display_matches_directory_labels() {
        assert_eq!(ContactKind::Urgence.to_string(), "Urgence");
        assert_eq!(ContactKind::SupportTechnique.to_string(), "Support technique");
        assert_eq!(ContactKind::Administration.to_string(), "Administration");
    }

    #[test]
    fn test_contact_serializes_with_wire_field_names() {
        let contact = emergency_contacts()[2];
        let json = serde_json::to_value(contact).unwrap();
        assert_eq!(json["function"], "Répartiteur");
        assert_eq!(json["type"], "Urgence");
        assert_eq!(json["email"], "dispatch@transport-bretagne.fr");
    }

    #[test]
    fn test_missing_email_serializes_as_null() {
        let contact = emergency_contacts()[0];
        let json = serde_json::to_value(contact).unwrap();
        assert!(json["email"].is_null());
    }

    #[test]
    fn test_contacts_of_kind_filters_in_order() {
        let support = contacts_of_kind(ContactKind::SupportTechnique);
        assert_eq!(support.len(), 2);
        assert_eq!(support[0].name, "Support Technique");
        assert_eq!(support[1].name, "Service Maintenance");
    }

    #[test]
    fn test_all_kinds_are_covered() {
        for kind in ContactKind::ALL {
            assert!(!contacts_of_kind(kind).is_empty());
        }
    }
}
