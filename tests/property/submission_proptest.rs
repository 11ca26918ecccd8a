//! Property-based tests for submission validation

use crate::common::room_inspection;
use custodial_sync::shared::error::SharedError;
use custodial_sync::shared::submission::{SubmissionPayload, FORM_TYPES};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_ratings_in_range_are_accepted(rating in 1u8..=5) {
        let mut value = serde_json::to_value(room_inspection("ASA")).unwrap();
        value["floors"] = rating.into();
        prop_assert!(SubmissionPayload::from_json(value).is_ok());
    }

    #[test]
    fn test_ratings_out_of_range_name_the_field(rating in 6u8..=255) {
        let mut value = serde_json::to_value(room_inspection("ASA")).unwrap();
        value["ceiling"] = rating.into();
        let err = SubmissionPayload::from_json(value).unwrap_err();
        prop_assert_eq!(err.field(), Some("ceiling"));
    }

    #[test]
    fn test_unknown_tags_are_rejected(tag in "[a-z_]{1,16}") {
        prop_assume!(!FORM_TYPES.contains(&tag.as_str()));
        let mut value = serde_json::to_value(room_inspection("ASA")).unwrap();
        value["type"] = tag.clone().into();
        prop_assert_eq!(
            SubmissionPayload::from_json(value),
            Err(SharedError::unknown_form_type(tag))
        );
    }
}
