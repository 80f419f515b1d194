//! Required paperwork for a registration.

/// Documents every student must hand in, in display order.
pub const REQUIRED_DOCUMENTS: [&str; 6] = [
    "Pasfoto",
    "Rijbewijsuittreksel",
    "Leges bewijs",
    "Plakzegels",
    "Doktersverklaring",
    "Kopie ID/Rijbewijs",
];

pub fn is_required(doc_type: &str) -> bool {
    REQUIRED_DOCUMENTS.contains(&doc_type)
}

/// Checklist entries without a submitted document, in checklist order.
///
/// `submitted` holds the types of documents marked as submitted; anything
/// not on the checklist is ignored.
pub fn missing_documents<'a, I>(submitted: I) -> Vec<&'static str>
where
    I: IntoIterator<Item = &'a str>,
{
    let submitted: Vec<&str> = submitted.into_iter().collect();
    REQUIRED_DOCUMENTS
        .iter()
        .copied()
        .filter(|required| !submitted.contains(required))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_submitted_means_whole_checklist_missing() {
        assert_eq!(missing_documents(std::iter::empty()), REQUIRED_DOCUMENTS.to_vec());
    }

    #[test]
    fn missing_list_keeps_checklist_order() {
        let submitted = ["Doktersverklaring", "Pasfoto", "Plakzegels"];
        assert_eq!(
            missing_documents(submitted),
            vec!["Rijbewijsuittreksel", "Leges bewijs", "Kopie ID/Rijbewijs"]
        );
    }

    #[test]
    fn unknown_types_do_not_satisfy_the_checklist() {
        let submitted = ["Pasfoto", "Zwemdiploma", "pasfoto"];
        let missing = missing_documents(submitted);
        assert_eq!(missing.len(), 5);
        assert!(!missing.contains(&"Pasfoto"));
        assert!(!is_required("Zwemdiploma"));
    }

    #[test]
    fn complete_submission_leaves_nothing_missing() {
        assert!(missing_documents(REQUIRED_DOCUMENTS).is_empty());
    }
}
