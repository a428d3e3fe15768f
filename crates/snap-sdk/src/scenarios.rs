//! End-to-end scenarios over the public API.

use std::rc::{Rc, Weak};
use std::sync::Arc;
use std::thread;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use crate::{
    inspect_enum, inspect_struct, Approver, Callable, ErrorKind, EvalError, Inspect, Node, ObjectBuilder,
    Overrides, Sequence, SnapConfig, ThreadingMode, TypeDescriptor,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn approver() -> Approver {
    init_tracing();
    Approver::new(ThreadingMode::Shared)
}

fn at(h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 5, 1)
        .and_then(|d| d.and_hms_opt(h, m, 0))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

struct Address {
    street: String,
    country: String,
}
inspect_struct!(Address { street => "Street", country => "Country" });

enum Title {
    Mr,
    Mrs,
}
inspect_enum!(Title { Mr, Mrs });

struct Person {
    title: Title,
    given_names: String,
    family_name: String,
    spouse: Option<Box<Person>>,
    address: Option<Address>,
    children: Vec<Person>,
}
inspect_struct!(Person {
    title => "Title",
    given_names => "GivenNames",
    family_name => "FamilyName",
    spouse => "Spouse",
    address => "Address",
    children => "Children",
});

fn person(given: &str) -> Person {
    Person {
        title: Title::Mr,
        given_names: given.to_string(),
        family_name: "Smith".to_string(),
        spouse: None,
        address: None,
        children: Vec::new(),
    }
}

fn john() -> Person {
    Person {
        spouse: Some(Box::new(Person {
            title: Title::Mrs,
            ..person("Jane")
        })),
        address: Some(Address {
            street: "1 Puddle Lane".to_string(),
            country: "USA".to_string(),
        }),
        ..person("John")
    }
}

struct Account {
    id: Uuid,
    id_text: String,
    owner_id: Uuid,
}
inspect_struct!(Account { id => "Id", id_text => "IdText", owner_id => "OwnerId" });

struct Meeting {
    start: NaiveDateTime,
    start_text: String,
    end: NaiveDateTime,
    note: String,
}
inspect_struct!(Meeting { start => "Start", start_text => "StartText", end => "End", note => "Note" });

struct Basket {
    items: Vec<String>,
    tags: Option<Vec<String>>,
}
inspect_struct!(Basket { items => "Items", tags => "Tags" });

struct Invoice {
    number: String,
    paid: bool,
}
inspect_struct!(Invoice { number => "Number", paid => "Paid" });

fn unpaid() -> Invoice {
    Invoice {
        number: "A-1".to_string(),
        paid: false,
    }
}

struct Sensor {
    name: String,
}

impl Inspect for Sensor {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<Self>()
    }

    fn inspect(&self) -> Node<'_> {
        ObjectBuilder::new(TypeDescriptor::of::<Self>())
            .field("Name", &self.name)
            .computed("Calibration", || {
                Err::<f64, _>(EvalError::not_supported("no calibration on this model"))
            })
            .computed("Reading", || Err::<f64, _>(EvalError::invalid_operation("sensor offline")))
            .computed("Legacy", || Ok(1))
            .deprecated()
            .build()
    }
}

struct Team {
    name: String,
    lead: Member,
}

struct Member {
    name: String,
    team: Weak<Team>,
}
inspect_struct!(Team { name => "Name", lead => "Lead" });
inspect_struct!(Member { name => "Name", team => "Team" });

struct Label {
    text: String,
}
inspect_struct!(Label { text => "Text" });

struct Pair {
    left: Rc<Label>,
    right: Rc<Label>,
}
inspect_struct!(Pair { left => "Left", right => "Right" });

struct Button {
    caption: String,
    on_click: Callable,
}
inspect_struct!(Button { caption => "Caption", on_click => "OnClick" });

impl Button {
    fn click() {}
}

struct Stamp {
    id: Uuid,
    created: chrono::DateTime<Utc>,
}
inspect_struct!(Stamp { id => "Id", created => "Created" });

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn person_lists_only_populated_fields_in_declaration_order() {
    let text = approver().serialize(&john()).unwrap();
    let expected = r#"
{
  "Title": "Mr",
  "GivenNames": "John",
  "FamilyName": "Smith",
  "Spouse": {
    "Title": "Mrs",
    "GivenNames": "Jane",
    "FamilyName": "Smith"
  },
  "Address": {
    "Street": "1 Puddle Lane",
    "Country": "USA"
  }
}"#;
    assert_eq!(text, expected.trim_start());
}

#[test]
fn guid_and_its_text_share_a_placeholder() {
    let id = Uuid::from_u128(0xabc);
    let account = Account {
        id,
        id_text: id.to_string(),
        owner_id: Uuid::from_u128(0xdef),
    };
    let text = approver().serialize(&account).unwrap();
    let expected = r#"
{
  "Id": "Guid_1",
  "IdText": "Guid_1",
  "OwnerId": "Guid_2"
}"#;
    assert_eq!(text, expected.trim_start());
}

#[test]
fn custom_formatted_timestamp_reuses_placeholder() {
    let approver = approver();
    approver.store().add_date_time_format("%d/%m/%Y %H:%M").unwrap();
    let meeting = Meeting {
        start: at(9, 30),
        start_text: "01/05/2024 09:30".to_string(),
        end: at(10, 0),
        note: "bring slides".to_string(),
    };
    let text = approver.serialize(&meeting).unwrap();
    let expected = r#"
{
  "Start": "DateTime_1",
  "StartText": "DateTime_1",
  "End": "DateTime_2",
  "Note": "bring slides"
}"#;
    assert_eq!(text, expected.trim_start());
}

#[test]
fn unregistered_format_stays_literal() {
    let meeting = Meeting {
        start: at(9, 30),
        start_text: "01/05/2024 09:30".to_string(),
        end: at(9, 30),
        note: String::new(),
    };
    let text = approver().serialize(&meeting).unwrap();
    assert!(text.contains("\"StartText\": \"01/05/2024 09:30\""));
    assert!(text.contains("\"End\": \"DateTime_1\""));
}

#[test]
fn scrubbing_can_be_disabled_per_call() {
    let meeting = Meeting {
        start: at(9, 30),
        start_text: String::new(),
        end: at(9, 30),
        note: String::new(),
    };
    let text = approver()
        .serialize_with(&meeting, &Overrides::new().scrub_date_times(false))
        .unwrap();
    assert!(text.contains("\"Start\": \"2024-05-01T09:30:00\""));
}

#[test]
fn empty_collection_presence_follows_flag() {
    let approver = approver();
    let basket = Basket {
        items: Vec::new(),
        tags: None,
    };
    assert_eq!(approver.serialize(&basket).unwrap(), "{}");

    let kept = approver
        .serialize_with(&basket, &Overrides::new().ignore_empty_collections(false))
        .unwrap();
    assert_eq!(kept, "{\n  \"Items\": []\n}");
}

#[test]
fn false_members_kept_once_ignore_false_is_off() {
    let approver = approver();
    assert_eq!(
        approver.serialize(&unpaid()).unwrap(),
        "{\n  \"Number\": \"A-1\"\n}"
    );

    let kept = "{\n  \"Number\": \"A-1\",\n  \"Paid\": false\n}";
    let per_call = approver
        .serialize_with(&unpaid(), &Overrides::new().ignore_false(false))
        .unwrap();
    assert_eq!(per_call, kept);

    approver.store().set_ignore_false(false).unwrap();
    assert_eq!(approver.serialize(&unpaid()).unwrap(), kept);
}

#[test]
fn named_values_share_one_walk() {
    let id = Uuid::from_u128(0xabc);
    let text = approver()
        .serialize_named(&[("id", &id), ("text", &id.to_string()), ("invoice", &unpaid())])
        .unwrap();
    let expected = r#"
{
  "id": "Guid_1",
  "text": "Guid_1",
  "invoice": {
    "Number": "A-1"
  }
}"#;
    assert_eq!(text, expected.trim_start());
}

#[test]
fn named_values_need_distinct_names() {
    let approver = approver();
    let err = approver
        .serialize_named(&[("value", &1i32), ("value", &2i32)])
        .unwrap_err();
    assert_eq!(err.to_string(), "value name given more than once: value");
}

#[test]
fn null_collection_governed_by_default_omission() {
    let approver = approver();
    approver
        .store()
        .set_extra_settings(|o| o.omit_defaults = false)
        .unwrap();
    let basket = Basket {
        items: vec!["apple".to_string()],
        tags: None,
    };
    let text = approver.serialize(&basket).unwrap();
    assert!(text.contains("\"Tags\": null"));
}

#[test]
fn ignorable_failures_drop_members_and_others_fail_the_call() {
    let approver = approver();
    let sensor = Sensor {
        name: "gauge".to_string(),
    };
    let err = approver.serialize(&sensor).unwrap_err();
    assert!(err.to_string().contains("Sensor.Reading"));

    approver
        .store()
        .ignore_errors_where(|e| e.message().contains("offline"))
        .unwrap();
    let text = approver.serialize(&sensor).unwrap();
    assert_eq!(text, "{\n  \"Name\": \"gauge\"\n}");
}

#[test]
fn ignore_rules_by_kind_type_instance_and_name() {
    let approver = approver();
    approver
        .store()
        .ignore_errors_of_kind(ErrorKind::InvalidOperation)
        .unwrap();
    approver.store().ignore_members_with_type::<Option<Address>>().unwrap();
    approver
        .store()
        .ignore_instance::<String, _>(|s| s == "Jane")
        .unwrap();
    approver.store().ignore_member_of::<Person>("FamilyName").unwrap();

    let text = approver.serialize(&john()).unwrap();
    assert_eq!(
        text,
        "{\n  \"Title\": \"Mr\",\n  \"GivenNames\": \"John\",\n  \"Spouse\": {\n    \"Title\": \"Mrs\"\n  }\n}"
    );
}

#[test]
fn invalid_member_names_rejected_at_registration() {
    let approver = approver();
    assert!(approver.store().ignore_member_of::<Person>("").is_err());
    assert!(approver.store().ignore_member_of::<Person>("Given Names").is_err());
}

#[test]
fn reset_restores_defaults() {
    let approver = approver();
    approver.store().ignore_member_of::<Person>("GivenNames").unwrap();
    assert!(!approver.serialize(&john()).unwrap().contains("GivenNames"));
    approver.store().reset().unwrap();
    assert!(approver.serialize(&john()).unwrap().contains("GivenNames"));
}

#[test]
fn back_references_are_not_followed() {
    let team = Rc::new_cyclic(|weak| Team {
        name: "core".to_string(),
        lead: Member {
            name: "ana".to_string(),
            team: weak.clone(),
        },
    });
    let text = approver().serialize(&team).unwrap();
    assert_eq!(
        text,
        "{\n  \"Name\": \"core\",\n  \"Lead\": {\n    \"Name\": \"ana\"\n  }\n}"
    );
}

#[test]
fn shared_values_outside_a_cycle_are_repeated() {
    let label = Rc::new(Label {
        text: "same".to_string(),
    });
    let pair = Pair {
        left: Rc::clone(&label),
        right: label,
    };
    let text = approver().serialize(&pair).unwrap();
    assert_eq!(text.matches("\"Text\": \"same\"").count(), 2);
}

#[test]
fn isolated_registrations_stay_on_their_thread() {
    init_tracing();
    let approver = Arc::new(Approver::new(ThreadingMode::Isolated));
    let worker = Arc::clone(&approver);
    let inside = thread::spawn(move || {
        worker.store().ignore_member_of::<Person>("GivenNames").unwrap();
        worker.serialize(&john()).unwrap()
    })
    .join()
    .unwrap();
    assert!(!inside.contains("GivenNames"));
    assert!(approver.serialize(&john()).unwrap().contains("GivenNames"));
}

#[test]
fn shared_registrations_are_visible_to_every_thread() {
    let approver = Arc::new(approver());
    let worker = Arc::clone(&approver);
    thread::spawn(move || {
        worker.store().ignore_member_of::<Person>("GivenNames").unwrap();
    })
    .join()
    .unwrap();
    assert!(!approver.serialize(&john()).unwrap().contains("GivenNames"));
}

#[test]
fn fresh_ids_and_clock_readings_serialize_identically() {
    let approver = approver();
    let stamp = || Stamp {
        id: Uuid::now_v7(),
        created: Utc::now(),
    };
    let first = approver.serialize(&stamp()).unwrap();
    let second = approver.serialize(&stamp()).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first,
        "{\n  \"Id\": \"Guid_1\",\n  \"Created\": \"DateTimeOffset_1\"\n}"
    );
}

#[test]
fn type_tags_follow_configuration() {
    init_tracing();
    let config = SnapConfig::from_toml_str("[serializer]\ntype_tags = \"always\"").unwrap();
    let approver = Approver::from_config(&config).unwrap();
    let text = approver.serialize(&person("Ann")).unwrap();
    assert!(text.starts_with(
        "{\n  \"$type\": \"Person\",\n  \"Title\": \"Mr\",\n  \"GivenNames\": \"Ann\""
    ));
}

#[test]
fn lazy_sequences_and_type_values_use_short_names() {
    let approver = approver();
    let evens = Sequence::capture((1..=6u32).filter(|n| n % 2 == 0));
    assert_eq!(approver.serialize(&evens).unwrap(), "[\n  2,\n  4,\n  6\n]");
    assert_eq!(
        approver.serialize(&evens.descriptor()).unwrap(),
        "\"Iterator<u32>\""
    );
    assert_eq!(
        approver
            .serialize(&TypeDescriptor::of::<Vec<Option<Person>>>())
            .unwrap(),
        "\"Vec<Person?>\""
    );
}

#[test]
fn callables_render_owner_and_method() {
    let button = Button {
        caption: "OK".to_string(),
        on_click: Callable::of(&Button::click),
    };
    let text = approver().serialize(&button).unwrap();
    assert!(text.contains("\"Target\": \"Button\""));
    assert!(text.contains("\"Method\": \"click\""));
}
