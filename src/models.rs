use super::guests::parse_guest_names;
use super::schema::rsvps;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Insertable, Selectable, Queryable, Serialize, Deserialize, Debug, Clone, PartialEq)]
#[diesel(table_name = rsvps)]
pub struct Rsvp {
    pub id: String,
    pub attending: bool,
    pub guests: Option<String>,
    pub allergies: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Rsvp {
    /// Names parsed from the raw guest string. Recomputed on every call.
    pub fn parsed_guests(&self) -> Vec<String> {
        parse_guest_names(self.guests.as_deref())
    }
}

/// What a form submission turns into before the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsvpInsert {
    pub attending: bool,
    pub guests: Option<String>,
    pub allergies: Option<String>,
}

impl RsvpInsert {
    /// Empty text becomes `None`. Allergies are only kept for guests who are attending.
    pub fn from_form(attending: bool, guests: Option<&str>, allergies: Option<&str>) -> Self {
        let guests = non_empty(guests);
        let allergies = if attending { non_empty(allergies) } else { None };

        RsvpInsert {
            attending,
            guests,
            allergies,
        }
    }
}

fn non_empty(s: Option<&str>) -> Option<String> {
    match s {
        Some(s) if !s.is_empty() => Some(s.to_string()),
        _ => None,
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RsvpWithGuests {
    #[serde(flatten)]
    pub rsvp: Rsvp,
    pub parsed_guests: Vec<String>,
}

impl From<Rsvp> for RsvpWithGuests {
    fn from(rsvp: Rsvp) -> Self {
        let parsed_guests = rsvp.parsed_guests();
        RsvpWithGuests { rsvp, parsed_guests }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(guests: Option<&str>) -> Rsvp {
        let ts = NaiveDate::from_ymd_opt(2026, 2, 1)
            .and_then(|d| d.and_hms_opt(18, 30, 0))
            .unwrap();
        Rsvp {
            id: "ABC123DEF456".to_string(),
            attending: true,
            guests: guests.map(str::to_string),
            allergies: None,
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn declining_drops_allergies() {
        let insert = RsvpInsert::from_form(false, Some("Jane Doe"), Some("peanuts"));
        assert_eq!(insert.guests.as_deref(), Some("Jane Doe"));
        assert_eq!(insert.allergies, None);
    }

    #[test]
    fn attending_keeps_allergies() {
        let insert = RsvpInsert::from_form(true, Some("john & jane"), Some("shellfish"));
        assert!(insert.attending);
        assert_eq!(insert.guests.as_deref(), Some("john & jane"));
        assert_eq!(insert.allergies.as_deref(), Some("shellfish"));
    }

    #[test]
    fn empty_fields_become_none() {
        let insert = RsvpInsert::from_form(true, Some(""), Some(""));
        assert_eq!(insert.guests, None);
        assert_eq!(insert.allergies, None);

        let insert = RsvpInsert::from_form(true, None, None);
        assert_eq!(insert.guests, None);
        assert_eq!(insert.allergies, None);
    }

    #[test]
    fn raw_text_is_not_trimmed() {
        let insert = RsvpInsert::from_form(true, Some("  john  "), None);
        assert_eq!(insert.guests.as_deref(), Some("  john  "));
    }

    #[test]
    fn parsed_guests_follow_raw_string() {
        let with = RsvpWithGuests::from(sample(Some("bob + carol")));
        assert_eq!(with.parsed_guests, vec!["Bob", "Carol"]);
        assert_eq!(with.rsvp.guests.as_deref(), Some("bob + carol"));

        let without = RsvpWithGuests::from(sample(None));
        assert!(without.parsed_guests.is_empty());
    }
}
