//! Storage keys, one per form type.

/// Prefix shared by every key this crate writes
pub const KEY_PREFIX: &str = "custodial-";

/// Keys written by older clients; removed by
/// [`DraftStore::migrate_legacy_drafts`](super::DraftStore::migrate_legacy_drafts)
pub const LEGACY_KEYS: [&str; 2] = ["custodial_inspection_drafts", "building_form_drafts"];

/// Submissions waiting for the network; see
/// [`SubmissionQueue`](crate::client::offline::SubmissionQueue)
pub const SUBMISSION_QUEUE_KEY: &str = "custodial-submission-queue";

/// The draft slot for each form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DraftKey {
    Inspection,
    BuildingInspection,
    CustodialNote,
    UserPreferences,
}

impl DraftKey {
    pub const ALL: [DraftKey; 4] = [
        DraftKey::Inspection,
        DraftKey::BuildingInspection,
        DraftKey::CustodialNote,
        DraftKey::UserPreferences,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DraftKey::Inspection => "custodial-draft-inspection",
            DraftKey::BuildingInspection => "custodial-draft-building-inspection",
            DraftKey::CustodialNote => "custodial-draft-custodial-note",
            DraftKey::UserPreferences => "custodial-user-preferences",
        }
    }

    /// Every key a full reset clears, the submission queue and legacy keys
    /// included
    pub fn all_known() -> Vec<&'static str> {
        Self::ALL
            .iter()
            .map(|k| k.as_str())
            .chain([SUBMISSION_QUEUE_KEY])
            .chain(LEGACY_KEYS)
            .collect()
    }
}

impl AsRef<str> for DraftKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for DraftKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
