//! Payload and configuration fixtures

use custodial_sync::client::Config;
use custodial_sync::shared::config::AppConfig;
use custodial_sync::shared::submission::{
    BuildingInspectionForm, BuildingRoom, CustodialNoteForm, Ratings, RoomInspectionForm,
    SubmissionPayload,
};

/// Client config pointing at `server_url`
pub fn config_for(server_url: &str) -> Config {
    Config::with_builder(AppConfig::builder().server_url(server_url))
        .expect("test server url is valid")
}

pub fn ratings(value: u8) -> Ratings {
    Ratings {
        floors: Some(value),
        trash: Some(value),
        restrooms: Some(value),
        ..Ratings::default()
    }
}

pub fn room_inspection(school: &str) -> SubmissionPayload {
    SubmissionPayload::SingleRoom(RoomInspectionForm {
        inspector_name: "Pat Rivera".into(),
        school: school.into(),
        date: "2025-03-01".into(),
        location_description: "Science lab".into(),
        room_number: Some("204".into()),
        location_category: Some("classroom".into()),
        ratings: ratings(4),
        notes: None,
        images: Vec::new(),
    })
}

pub fn building_inspection(school: &str) -> SubmissionPayload {
    SubmissionPayload::WholeBuilding(BuildingInspectionForm {
        inspector_name: "Pat Rivera".into(),
        school: school.into(),
        date: "2025-03-01".into(),
        building_name: Some("Main".into()),
        location_description: "Whole building".into(),
        rooms: vec![BuildingRoom {
            room_type: "restroom".into(),
            room_identifier: Some("1F-East".into()),
            ratings: ratings(3),
            notes: None,
            images: Vec::new(),
        }],
        verified_rooms: vec!["restroom".into()],
        is_completed: true,
        notes: None,
    })
}

pub fn custodial_note(school: &str) -> SubmissionPayload {
    SubmissionPayload::CustodialNote(CustodialNoteForm {
        school: school.into(),
        date: "2025-03-01".into(),
        location: "Gym".into(),
        location_description: "Locker room".into(),
        notes: "Drain is slow".into(),
        images: Vec::new(),
    })
}
